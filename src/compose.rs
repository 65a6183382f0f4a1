//! Cover composition.
//!
//! Every cover has the same fixed structure:
//!
//! ```text
//! ┌ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┐   dashed border, inset
//!          Title, display face, wrapped            top-anchored at title.top
//! │              and centred                   │
//!
//! │   Abstract, text face, wrapped and centred │   top-anchored at abstract.top
//!
//! │                blog.example.com            │   bottom-anchored at signature.bottom
//! └ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┘
//! ```
//!
//! Top-anchored regions grow downward from their origin. The signature is
//! bottom-anchored: its last line sits on the anchor and earlier lines stack
//! upward, so it stays flush with the border however many lines it wraps to.
//!
//! Nothing here reads clocks, randomness or locale, so the same page, fonts and
//! layout always produce the same draw calls.

use crate::fonts::FontDescriptor;
use crate::layout::wrap;
use crate::surface::{
    CanvasSize, Color, DashPattern, DrawingSurface, HAlign, SurfaceError, VAnchor,
};
use crate::types::PageMetadata;

/// Dashed frame drawn around the cover.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderStyle {
    pub inset: u32,
    pub line_width: u32,
    pub dash: DashPattern,
    pub color: Color,
}

/// Font, colour and vertical anchor of one text region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStyle {
    pub font: FontDescriptor,
    pub color: Color,
    /// Top edge of the first line (`Top`) or bottom edge of the last (`Bottom`).
    pub y: f32,
    pub anchor: VAnchor,
}

/// All constants that shape a cover. Built from [`CoverConfig`](crate::config::CoverConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct CoverLayout {
    pub canvas: CanvasSize,
    pub background: Color,
    pub border: BorderStyle,
    /// Horizontal margin on each side of the text column.
    pub text_inset: u32,
    /// Extra space between consecutive lines of a region.
    pub line_gap: f32,
    pub title: RegionStyle,
    pub summary: RegionStyle,
    pub signature: RegionStyle,
    /// Site signature printed at the bottom of every cover.
    pub signature_text: String,
}

impl Default for CoverLayout {
    fn default() -> Self {
        crate::config::CoverConfig::default().layout()
    }
}

impl CoverLayout {
    /// Width budget of every text region.
    pub fn max_text_width(&self) -> f32 {
        self.canvas.width.saturating_sub(2 * self.text_inset) as f32
    }

    /// Fonts referenced by the layout, in drawing order.
    pub fn fonts(&self) -> [&FontDescriptor; 3] {
        [&self.title.font, &self.summary.font, &self.signature.font]
    }
}

/// Wrapped lines ready to be placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub lines: Vec<String>,
    pub font: FontDescriptor,
    pub color: Color,
    pub origin: (f32, f32),
    pub line_height: f32,
    pub align: HAlign,
    pub anchor: VAnchor,
}

impl TextRegion {
    /// Wrap `text` for `style` and centre it on the canvas.
    pub fn layout<S: DrawingSurface + ?Sized>(
        surface: &S,
        text: &str,
        style: &RegionStyle,
        layout: &CoverLayout,
    ) -> Result<Self, SurfaceError> {
        let lines = wrap(surface, text, &style.font, layout.max_text_width())?;
        Ok(Self {
            lines,
            font: style.font.clone(),
            color: style.color,
            origin: (layout.canvas.width as f32 / 2.0, style.y),
            line_height: style.font.size_px + layout.line_gap,
            align: HAlign::Center,
            anchor: style.anchor,
        })
    }

    /// Anchor point of each line, in line order.
    pub fn line_positions(&self) -> Vec<(f32, f32)> {
        let (x, y) = self.origin;
        let last = self.lines.len().saturating_sub(1);
        (0..self.lines.len())
            .map(|i| match self.anchor {
                VAnchor::Top => (x, y + i as f32 * self.line_height),
                VAnchor::Bottom => (x, y - (last - i) as f32 * self.line_height),
            })
            .collect()
    }

    fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        for (line, (x, y)) in self.lines.iter().zip(self.line_positions()) {
            surface.fill_text(line, x, y, &self.font, self.color, self.align, self.anchor)?;
        }
        Ok(())
    }
}

/// Draw the cover for `page` onto a fresh surface.
///
/// Every font alias is checked before the first pixel is touched, so an
/// unknown alias leaves the surface untouched.
pub fn compose<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    page: &PageMetadata,
    layout: &CoverLayout,
) -> Result<(), SurfaceError> {
    for font in layout.fonts() {
        surface.measure_text_width("", font)?;
    }

    surface.fill_background(layout.background);
    let border = &layout.border;
    surface.stroke_border(border.inset, border.line_width, &border.dash, border.color);

    let regions = [
        (page.title.as_str(), &layout.title),
        (page.summary.as_str(), &layout.summary),
        (layout.signature_text.as_str(), &layout.signature),
    ];
    for (text, style) in regions {
        TextRegion::layout(surface, text, style, layout)?.draw(surface)?;
    }
    Ok(())
}
