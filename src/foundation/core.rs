use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{OvertextError, OvertextResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Logical canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> OvertextResult<Self> {
        if width == 0 || height == 0 {
            return Err(OvertextError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}

/// Opaque straight RGB color as carried by the color pickers (`#rrggbb`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl HexColor {
    /// Pure black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Construct from channel values.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB` or the `#RGB` shorthand (case-insensitive).
    pub fn parse(s: &str) -> OvertextResult<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        fn nibble(c: u8) -> Option<u8> {
            (c as char).to_digit(16).map(|d| d as u8)
        }

        let bytes = hex.as_bytes();
        let digits: Option<Vec<u8>> = bytes.iter().map(|&c| nibble(c)).collect();
        let Some(d) = digits else {
            return Err(OvertextError::validation(format!(
                "invalid hex color \"{s}\""
            )));
        };

        match d.len() {
            3 => Ok(Self::rgb(d[0] * 17, d[1] * 17, d[2] * 17)),
            6 => Ok(Self::rgb(
                d[0] * 16 + d[1],
                d[2] * 16 + d[3],
                d[4] * 16 + d[5],
            )),
            _ => Err(OvertextError::validation(format!(
                "hex color must be #RGB or #RRGGBB, got \"{s}\""
            ))),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = OvertextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
