//! Footprints: reusable pin patterns shared by every placed instance.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::ProtoboardError;
use crate::geometry::{Coord, Rotation};

/// A labeled contact, offset from the footprint origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub name: String,
    pub offset: Coord,
}

impl Pin {
    pub fn new(name: impl Into<String>, offset: Coord) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl FromStr for Axis {
    type Err = ProtoboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(ProtoboardError::InvalidArgument(format!(
                "axis must be 'x' or 'y' (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Generate `count` evenly spaced pins along one axis.
///
/// Pin `i` sits at `start + i * pitch` along `axis` and is named
/// `start_index + i`. A zero pitch stacks every pin on `start`; that is legal
/// here and only shows up later as a placement conflict.
pub fn line_pins(
    start: Coord,
    axis: Axis,
    count: i32,
    pitch: i32,
    start_index: i32,
) -> Result<Vec<Pin>, ProtoboardError> {
    if count <= 0 {
        return Err(ProtoboardError::InvalidArgument(format!(
            "pin count must be > 0 (got {})",
            count
        )));
    }
    if pitch == 0 && count > 1 {
        tracing::warn!("line of {} pins at {} has zero pitch", count, start);
    }

    (0..count)
        .map(|i| {
            let step = match axis {
                Axis::X => Coord::new(i.checked_mul(pitch)?, 0),
                Axis::Y => Coord::new(0, i.checked_mul(pitch)?),
            };
            let offset = start.checked_add(step)?;
            let name = start_index.checked_add(i)?;
            Some(Pin::new(name.to_string(), offset))
        })
        .collect::<Option<Vec<Pin>>>()
        .ok_or_else(|| {
            ProtoboardError::InvalidArgument(format!(
                "line of {} pins from {} with pitch {} leaves the coordinate range",
                count, start, pitch
            ))
        })
}

fn default_pitch() -> i32 {
    1
}

fn default_start_index() -> i32 {
    1
}

/// Serializable description of one `line_pins` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLine {
    pub start: Coord,
    pub axis: String,
    pub count: i32,
    #[serde(default = "default_pitch")]
    pub pitch: i32,
    #[serde(default = "default_start_index")]
    pub start_index: i32,
}

impl PinLine {
    pub fn new(start: Coord, axis: Axis, count: i32) -> Self {
        Self {
            start,
            axis: axis.to_string(),
            count,
            pitch: default_pitch(),
            start_index: default_start_index(),
        }
    }

    pub fn with_pitch(mut self, pitch: i32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_start_index(mut self, start_index: i32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn pins(&self) -> Result<Vec<Pin>, ProtoboardError> {
        let axis: Axis = self.axis.parse()?;
        line_pins(self.start, axis, self.count, self.pitch, self.start_index)
    }
}

/// Immutable pin pattern. Instances hold it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub name: String,
    pins: Vec<Pin>,
}

impl Footprint {
    pub fn new(name: impl Into<String>, pins: Vec<Pin>) -> Self {
        Self {
            name: name.into(),
            pins,
        }
    }

    /// Build a footprint from pin lines, concatenated in order.
    pub fn from_lines(name: impl Into<String>, lines: &[PinLine]) -> Result<Self, ProtoboardError> {
        let name = name.into();
        if lines.is_empty() {
            return Err(ProtoboardError::InvalidArgument(format!(
                "footprint '{}' has no lines",
                name
            )));
        }
        let mut pins = Vec::new();
        for line in lines {
            let generated = line.pins().map_err(|e| match e {
                ProtoboardError::InvalidArgument(msg) => {
                    ProtoboardError::InvalidArgument(format!("footprint '{}': {}", name, msg))
                }
                other => other,
            })?;
            pins.extend(generated);
        }
        Ok(Self { name, pins })
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Absolute pin positions for a placement at `origin` with `rotation`.
    pub fn pins_at(&self, origin: Coord, rotation: Rotation) -> Vec<Coord> {
        self.pins
            .iter()
            .map(|pin| origin.saturating_add(pin.offset.rotate(rotation)))
            .collect()
    }
}

/// Footprints keyed by name, shared out as `Arc` handles.
#[derive(Debug, Clone, Default)]
pub struct FootprintLibrary {
    footprints: BTreeMap<String, Arc<Footprint>>,
}

impl FootprintLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a footprint, replacing any previous definition with the same name.
    pub fn insert(&mut self, footprint: Footprint) -> Arc<Footprint> {
        let handle = Arc::new(footprint);
        self.footprints
            .insert(handle.name.clone(), Arc::clone(&handle));
        handle
    }

    pub fn get(&self, name: &str) -> Result<Arc<Footprint>, ProtoboardError> {
        self.footprints
            .get(name)
            .cloned()
            .ok_or_else(|| ProtoboardError::UnknownFootprint(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.footprints.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }
}
