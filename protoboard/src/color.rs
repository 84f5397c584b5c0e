//! Jumper wire colors and the injectable source that picks them.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::ProtoboardError;

/// Channel floor/ceiling for generated colors; keeps wires away from
/// near-black against the dark board background.
pub const CHANNEL_MIN: u8 = 64;
pub const CHANNEL_MAX: u8 = 255;

/// RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ProtoboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtoboardError::InvalidArgument(format!("invalid color '{}'", s));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(invalid)
        };
        match hex.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            3 => {
                let short = |i: usize| {
                    hex.get(i..i + 1)
                        .and_then(|h| u8::from_str_radix(h, 16).ok())
                        .map(|v| v * 17)
                        .ok_or_else(invalid)
                };
                Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ProtoboardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Supplies colors for jumpers that do not have one yet.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

impl<F> ColorSource for F
where
    F: FnMut() -> Color,
{
    fn next_color(&mut self) -> Color {
        self()
    }
}

/// Uniform random channels in `[CHANNEL_MIN, CHANNEL_MAX]`.
pub struct RandomColorSource {
    rng: StdRng,
}

impl RandomColorSource {
    /// Deterministic sequence, for tests and reproducible boards.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ColorSource for RandomColorSource {
    fn next_color(&mut self) -> Color {
        let r = self.rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX);
        let g = self.rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX);
        let b = self.rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX);
        Color::rgb(r, g, b)
    }
}
