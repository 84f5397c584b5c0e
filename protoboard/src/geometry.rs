//! Integer grid coordinates and quarter-turn rotations.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::core::ProtoboardError;

/// A cell on the board grid. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotate about the origin by a quarter-turn multiple.
    ///
    /// Negation saturates, so `i32::MIN` maps to `i32::MAX`.
    pub fn rotate(self, rotation: Rotation) -> Coord {
        let (x, y) = (self.x, self.y);
        match rotation {
            Rotation::Deg0 => self,
            Rotation::Deg90 => Coord::new(y.saturating_neg(), x),
            Rotation::Deg180 => Coord::new(x.saturating_neg(), y.saturating_neg()),
            Rotation::Deg270 => Coord::new(y, x.saturating_neg()),
        }
    }

    /// Rotate by a raw degree value; only 0, 90, 180 and 270 are accepted.
    pub fn rotate_degrees(self, degrees: i32) -> Result<Coord, ProtoboardError> {
        Ok(self.rotate(Rotation::try_from(degrees)?))
    }

    /// `None` when either component leaves the `i32` range.
    pub fn checked_add(self, other: Coord) -> Option<Coord> {
        Some(Coord::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }

    /// Clamps each component to the `i32` range. A clamped cell is never
    /// inside a grid, so bounds checks still flag it.
    pub fn saturating_add(self, other: Coord) -> Coord {
        Coord::new(
            self.x.saturating_add(other.x),
            self.y.saturating_add(other.y),
        )
    }

    /// `(target - self)` per component, widened to `i64` so it cannot overflow.
    pub fn offset_to(self, target: Coord) -> (i64, i64) {
        (
            i64::from(target.x) - i64::from(self.x),
            i64::from(target.y) - i64::from(self.y),
        )
    }
}

/// Plain `i32` addition. Callers that take untrusted values use
/// [`Coord::checked_add`] or [`Coord::saturating_add`].
impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord::new(self.x + other.x, self.y + other.y)
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for [i32; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Counter-clockwise rotation in quarter turns. Serialized as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Apply `other` after `self`.
    pub fn then(self, other: Rotation) -> Rotation {
        let total = (self.degrees() + other.degrees()) % 360;
        Self::ALL[(total / 90) as usize]
    }
}

impl TryFrom<i32> for Rotation {
    type Error = ProtoboardError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(ProtoboardError::InvalidArgument(format!(
                "rotation must be one of 0, 90, 180, 270 (got {})",
                other
            ))),
        }
    }
}

impl From<Rotation> for i32 {
    fn from(r: Rotation) -> Self {
        r.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}
