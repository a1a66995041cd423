//! Drawing parameters and controller configuration.
//!
//! `DrawingParameters` is the only tunable config record of the canvas.
//! Sizes and line widths are in screen pixels; scene items divide them by
//! the current magnification at draw time so they stay visually constant.

use crate::error::CanvasError;
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Color ───────────────────────────────────────────────────────────────

/// 8-bit sRGB color with alpha, written as CSS hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, CanvasError> {
        let invalid = || CanvasError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let nibbles = digits
            .bytes()
            .map(nibble)
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;

        match *nibbles.as_slice() {
            [r, g, b] => Ok(Self::rgb(r * 17, g * 17, b * 17)),
            [r, g, b, a] => Ok(Self::rgba(r * 17, g * 17, b * 17, a * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
            [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::rgba(
                r1 << 4 | r0,
                g1 << 4 | g0,
                b1 << 4 | b0,
                a1 << 4 | a0,
            )),
            _ => Err(invalid()),
        }
    }

    /// CSS hex string; the alpha pair is only emitted when not opaque.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Drawing parameters ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DrawingParameters {
    pub node_fill_color: Color,
    /// Side (square) or diameter (circle) of a node marker.
    pub node_size: f64,
    pub handle_color: Color,
    pub handle_line_width: f64,
    pub hover_node_size: f64,
    pub hover_node_color: Color,
    pub hover_node_line_width: f64,
    pub path_stroke_color: Color,
    pub path_line_width: f64,
}

impl Default for DrawingParameters {
    fn default() -> Self {
        Self {
            node_fill_color: Color::rgb(0xFF, 0xFF, 0xFF),
            node_size: 8.0,
            handle_color: Color::rgb(0x88, 0x88, 0x88),
            handle_line_width: 1.0,
            hover_node_size: 14.0,
            hover_node_color: Color::rgb(0x44, 0x88, 0xFF),
            hover_node_line_width: 2.0,
            path_stroke_color: Color::rgb(0xBB, 0xBB, 0xBB),
            path_line_width: 1.0,
        }
    }
}

impl DrawingParameters {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| CanvasError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Every size and width must be positive and finite.
    pub fn validate(&self) -> Result<(), CanvasError> {
        let sizes = [
            ("nodeSize", self.node_size),
            ("handleLineWidth", self.handle_line_width),
            ("hoverNodeSize", self.hover_node_size),
            ("hoverNodeLineWidth", self.hover_node_line_width),
            ("pathLineWidth", self.path_line_width),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(CanvasError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

// ─── Controller config ───────────────────────────────────────────────────

/// Initial state for a canvas controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Screen position (CSS px, relative to the canvas) of the logical origin.
    pub origin: Point,
    pub magnification: f64,
    pub drawing: DrawingParameters,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(0.0, 800.0),
            magnification: 1.0,
            drawing: DrawingParameters::default(),
        }
    }
}
