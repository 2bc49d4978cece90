//! Toolbar state: the active tool and the stroke style for new segments.
//!
//! `ToolState` is mutated only by toolbar handlers. Changing the color or
//! width never touches pixels that are already on the surface; the values are
//! read per segment by the stroke renderer.

#[cfg(test)]
#[path = "tools_test.rs"]
mod tools_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// An opaque RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self { r: 0xff, g: 0xff, b: 0xff };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`.
    #[must_use]
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        let nibbles: Vec<u8> = hex.bytes().map(nibble).collect::<Option<_>>()?;
        match nibbles.as_slice() {
            &[r, g, b] => Some(Self::rgb(r * 0x11, g * 0x11, b * 0x11)),
            &[r1, r0, g1, g0, b1, b0] => Some(Self::rgb((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0)),
            _ => None,
        }
    }

    /// Canonical lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| ConfigError::InvalidColor(s.to_owned()))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Freehand drawing with the configured stroke color (default).
    #[default]
    Brush,
    /// Overpaints with the surface background color.
    Eraser,
    /// Pan the viewport and drag/resize cards.
    Select,
}

impl Tool {
    /// Parse a toolbar value. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brush" => Some(Self::Brush),
            "eraser" => Some(Self::Eraser),
            "select" => Some(Self::Select),
            _ => None,
        }
    }

    /// Whether this tool paints on the raster surface.
    #[must_use]
    pub fn draws(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser)
    }

    /// CSS cursor shown over the frame while this tool is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        if self.draws() { "crosshair" } else { "default" }
    }
}

/// Active tool plus the stroke style applied to subsequent segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

impl Default for ToolState {
    fn default() -> Self {
        Self { tool: Tool::default(), stroke_color: Color::BLACK, stroke_width: 3.0 }
    }
}

impl ToolState {
    #[must_use]
    pub fn new(stroke_color: Color, stroke_width: f64) -> Self {
        Self { tool: Tool::default(), stroke_color, stroke_width }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Set the brush color from a hex string. Returns `false` and keeps the
    /// current color when the value does not parse.
    pub fn set_color(&mut self, raw: &str) -> bool {
        let Some(color) = Color::parse_hex(raw) else {
            log::warn!("ignoring stroke color {raw:?}");
            return false;
        };
        self.stroke_color = color;
        true
    }

    /// Set the stroke width. Non-positive or non-finite widths are ignored.
    pub fn set_width(&mut self, width: f64) -> bool {
        if !width.is_finite() || width <= 0.0 {
            log::warn!("ignoring stroke width {width}");
            return false;
        }
        self.stroke_width = width;
        true
    }

    /// Color a new segment is painted with, given the surface background.
    ///
    /// Returns `None` for tools that do not paint.
    #[must_use]
    pub fn paint_color(&self, background: Color) -> Option<Color> {
        match self.tool {
            Tool::Brush => Some(self.stroke_color),
            Tool::Eraser => Some(background),
            Tool::Select => None,
        }
    }
}
