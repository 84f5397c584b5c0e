//! Placed entities and the board snapshot that owns them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorSource};
use crate::core::ProtoboardError;
use crate::footprint::Footprint;
use crate::geometry::{Coord, Rotation};
use crate::grid::Grid;

/// Inclusive cell rectangle. On a component it is relative to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn translate(&self, by: Coord) -> BoundingBox {
        BoundingBox::new(
            self.min_x.saturating_add(by.x),
            self.min_y.saturating_add(by.y),
            self.max_x.saturating_add(by.x),
            self.max_y.saturating_add(by.y),
        )
    }

    /// Smallest box covering every point, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = Coord>>(points: I) -> Option<BoundingBox> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox::new(p.x, p.y, p.x, p.y),
                Some(b) => BoundingBox::new(
                    b.min_x.min(p.x),
                    b.min_y.min(p.y),
                    b.max_x.max(p.x),
                    b.max_y.max(p.y),
                ),
            })
        })
    }

    pub fn to_array(&self) -> [i32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from([min_x, min_y, max_x, max_y]: [i32; 4]) -> Self {
        BoundingBox::new(min_x, min_y, max_x, max_y)
    }
}

/// A footprint placed on the board.
#[derive(Debug, Clone)]
pub struct ComponentInstance {
    reference: String,
    footprint: Arc<Footprint>,
    pub origin: Coord,
    pub rotation: Rotation,
    pub bbox: Option<BoundingBox>,
}

impl ComponentInstance {
    pub fn new(reference: impl Into<String>, footprint: Arc<Footprint>, origin: Coord) -> Self {
        Self {
            reference: reference.into(),
            footprint,
            origin,
            rotation: Rotation::Deg0,
            bbox: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn footprint(&self) -> &Arc<Footprint> {
        &self.footprint
    }

    /// Pin positions on the board for the current origin and rotation.
    pub fn placed_pins(&self) -> Vec<Coord> {
        self.footprint.pins_at(self.origin, self.rotation)
    }

    /// Explicit box (translated by origin) if set, else the span of the placed pins.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self.bbox {
            Some(b) => Some(b.translate(self.origin)),
            None => BoundingBox::from_points(self.placed_pins()),
        }
    }

    /// Shift the origin. Fails, leaving the origin unchanged, when the
    /// result would leave the `i32` range.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), ProtoboardError> {
        self.origin = self
            .origin
            .checked_add(Coord::new(dx, dy))
            .ok_or_else(|| {
                ProtoboardError::InvalidArgument(format!(
                    "moving {} by ({}, {}) leaves the coordinate range",
                    self.reference, dx, dy
                ))
            })?;
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Coord) {
        self.origin = origin;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn rotate_by(&mut self, rotation: Rotation) {
        self.rotation = self.rotation.then(rotation);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    A,
    B,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::A => write!(f, "a"),
            Endpoint::B => write!(f, "b"),
        }
    }
}

/// Point-to-point wire. May cross components and other jumpers freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jumper {
    pub id: String,
    pub net: String,
    pub a: Coord,
    pub b: Coord,
    pub color: Option<Color>,
}

impl Jumper {
    pub fn new(
        id: impl Into<String>,
        net: impl Into<String>,
        a: Coord,
        b: Coord,
    ) -> Result<Self, ProtoboardError> {
        let id = id.into();
        if a == b {
            return Err(ProtoboardError::InvalidArgument(format!(
                "jumper '{}': endpoints coincide at {}",
                id, a
            )));
        }
        Ok(Self {
            id,
            net: net.into(),
            a,
            b,
            color: None,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn endpoints(&self) -> [(Endpoint, Coord); 2] {
        [(Endpoint::A, self.a), (Endpoint::B, self.b)]
    }

    /// Pick a color if none is set yet. Returns true when one was assigned.
    pub fn ensure_color(&mut self, source: &mut dyn ColorSource) -> bool {
        if self.color.is_some() {
            return false;
        }
        self.color = Some(source.next_color());
        true
    }
}

/// Copper trace as an orthogonal polyline of grid points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub id: String,
    pub net: String,
    pub points: Vec<Coord>,
}

impl Trace {
    pub fn new(id: impl Into<String>, net: impl Into<String>, points: Vec<Coord>) -> Self {
        Self {
            id: id.into(),
            net: net.into(),
            points,
        }
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// In-memory board snapshot. Rule violations are allowed to exist here;
/// only identifier uniqueness is enforced.
#[derive(Debug, Clone)]
pub struct Board {
    pub grid: Grid,
    components: Vec<ComponentInstance>,
    jumpers: Vec<Jumper>,
    traces: Vec<Trace>,
}

impl Board {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            components: Vec::new(),
            jumpers: Vec::new(),
            traces: Vec::new(),
        }
    }

    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    pub fn jumpers(&self) -> &[Jumper] {
        &self.jumpers
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn add_component(&mut self, component: ComponentInstance) -> Result<(), ProtoboardError> {
        if self.component(component.reference()).is_some() {
            return Err(ProtoboardError::DuplicateId {
                kind: "component",
                id: component.reference().to_string(),
            });
        }
        self.components.push(component);
        Ok(())
    }

    pub fn component(&self, reference: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.reference() == reference)
    }

    pub fn component_mut(&mut self, reference: &str) -> Option<&mut ComponentInstance> {
        self.components.iter_mut().find(|c| c.reference() == reference)
    }

    pub fn add_jumper(&mut self, jumper: Jumper) -> Result<(), ProtoboardError> {
        if self.jumpers.iter().any(|j| j.id == jumper.id) {
            return Err(ProtoboardError::DuplicateId {
                kind: "jumper",
                id: jumper.id,
            });
        }
        tracing::debug!("adding jumper {} on net {}", jumper.id, jumper.net);
        self.jumpers.push(jumper);
        Ok(())
    }

    pub fn remove_jumper(&mut self, id: &str) -> Result<Jumper, ProtoboardError> {
        let idx = self
            .jumpers
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| ProtoboardError::NotFound {
                kind: "jumper",
                id: id.to_string(),
            })?;
        Ok(self.jumpers.remove(idx))
    }

    pub fn add_trace(&mut self, trace: Trace) -> Result<(), ProtoboardError> {
        if self.traces.iter().any(|t| t.id == trace.id) {
            return Err(ProtoboardError::DuplicateId {
                kind: "trace",
                id: trace.id,
            });
        }
        self.traces.push(trace);
        Ok(())
    }

    pub fn remove_trace(&mut self, id: &str) -> Result<Trace, ProtoboardError> {
        let idx = self
            .traces
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ProtoboardError::NotFound {
                kind: "trace",
                id: id.to_string(),
            })?;
        Ok(self.traces.remove(idx))
    }

    /// Give every uncolored jumper a color. Already-colored jumpers keep theirs.
    pub fn assign_jumper_colors(&mut self, source: &mut dyn ColorSource) -> usize {
        let assigned = self
            .jumpers
            .iter_mut()
            .map(|j| j.ensure_color(&mut *source))
            .filter(|&assigned| assigned)
            .count();
        if assigned > 0 {
            tracing::debug!("assigned colors to {} jumpers", assigned);
        }
        assigned
    }
}
