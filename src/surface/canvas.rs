//! Drawing surface trait and shared drawing types.
//!
//! The [`DrawingSurface`] trait is the whole vocabulary the composer is
//! allowed to use: fill, dashed stroke, measure, fill text, encode. Keeping it
//! this small is what makes a cover reproducible from its inputs.
//!
//! The production implementation is
//! [`RasterSurface`](super::raster::RasterSurface). Tests use the recording
//! surface in [`tests`], which logs calls and measures text with a fixed
//! per-character advance.

use crate::fonts::{FontDescriptor, FontError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a cover canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// GitHub/Open Graph social preview size.
    pub const DEFAULT: CanvasSize = CanvasSize {
        width: 1280,
        height: 640,
    };

    /// Size used by earlier site generations. Selected in `cover.toml` with
    /// `[canvas] preset = "legacy"`.
    pub const LEGACY: CanvasSize = CanvasSize {
        width: 1200,
        height: 600,
    };
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Opaque RGB colour, written as `#RRGGBB` or `#RGB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid colour '{0}': expected #RRGGBB or #RGB")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16);
        match hex.len() {
            6 => Ok(Color::rgb(
                channel(0, 2).map_err(|_| err())?,
                channel(2, 2).map_err(|_| err())?,
                channel(4, 2).map_err(|_| err())?,
            )),
            // #abc expands to #aabbcc
            3 => Ok(Color::rgb(
                channel(0, 1).map_err(|_| err())? * 17,
                channel(1, 1).map_err(|_| err())? * 17,
                channel(2, 1).map_err(|_| err())? * 17,
            )),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Alternating on/off run lengths in pixels, starting with "on".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashPattern(pub Vec<u32>);

impl DashPattern {
    /// An empty or all-zero pattern means a solid line.
    pub fn is_solid(&self) -> bool {
        self.0.iter().all(|&run| run == 0)
    }

    /// Pattern period. Odd-length patterns repeat twice, as in canvas APIs,
    /// so `[5]` behaves like `[5, 5]`.
    pub fn period(&self) -> u32 {
        let sum: u32 = self.0.iter().sum();
        if self.0.len() % 2 == 1 { sum * 2 } else { sum }
    }

    /// Whether the pixel at `distance` along the stroke is painted.
    pub fn is_on(&self, distance: i64) -> bool {
        if self.is_solid() {
            return true;
        }
        let period = self.period() as i64;
        let mut pos = distance.rem_euclid(period);
        let runs = self.0.iter().chain(self.0.iter()).copied();
        for (i, run) in runs.enumerate() {
            let run = run as i64;
            if pos < run {
                return i % 2 == 0;
            }
            pos -= run;
        }
        false
    }
}

impl Default for DashPattern {
    fn default() -> Self {
        Self(vec![60, 10])
    }
}

/// Horizontal placement of a text line relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Which edge of the line box sits on the `y` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAnchor {
    Top,
    Bottom,
}

/// Text measurement, the only capability the layout engine needs.
pub trait TextMeasure {
    /// Rendered advance width of `text` in pixels.
    fn measure_text_width(&self, text: &str, font: &FontDescriptor) -> Result<f32, SurfaceError>;
}

/// A fixed-size raster canvas.
///
/// One surface is created per cover and dropped after encoding; surfaces are
/// never shared between jobs.
pub trait DrawingSurface: TextMeasure {
    fn size(&self) -> CanvasSize;

    fn fill_background(&mut self, color: Color);

    /// Dashed rectangle inset by `inset` on every side, stroke centred on
    /// the rectangle edge.
    fn stroke_border(&mut self, inset: u32, line_width: u32, dash: &DashPattern, color: Color);

    #[allow(clippy::too_many_arguments)]
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &FontDescriptor,
        color: Color,
        align: HAlign,
        anchor: VAnchor,
    ) -> Result<(), SurfaceError>;

    /// Serialize the canvas as PNG.
    fn encode_to_bytes(&self) -> Result<Vec<u8>, SurfaceError>;
}
