//! Software raster surface in pure Rust, no system graphics libraries.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Pixel buffer | `image::RgbImage` |
//! | Glyph layout + kerning | `rusttype::Font::layout` |
//! | Glyph coverage | `rusttype::PositionedGlyph::draw` |
//! | Dashed border | custom span fill along the rectangle perimeter |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Rasterization is integer-exact given the same font data, so identical
//! draw calls always produce identical bytes.

use super::canvas::{
    CanvasSize, Color, DashPattern, DrawingSurface, HAlign, SurfaceError, TextMeasure, VAnchor,
};
use crate::fonts::{FontDescriptor, FontRegistry};
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgb, RgbImage};
use rusttype::{Font, Scale, point};

/// Raster backend drawing into an in-memory RGB buffer.
pub struct RasterSurface<'f> {
    fonts: &'f FontRegistry,
    pixels: RgbImage,
}

impl<'f> RasterSurface<'f> {
    /// Create a white canvas of the given size.
    pub fn new(size: CanvasSize, fonts: &'f FontRegistry) -> Self {
        Self {
            fonts,
            pixels: RgbImage::from_pixel(size.width, size.height, Rgb([255, 255, 255])),
        }
    }

    /// Read-only access to the pixels, mainly for inspection in tests.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Fill the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the canvas.
    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let (w, h) = (self.pixels.width() as i64, self.pixels.height() as i64);
        let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
        let (y0, y1) = (y0.clamp(0, h), y1.clamp(0, h));
        let px = Rgb([color.r, color.g, color.b]);
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// Blend `color` over the pixel at `(x, y)` with the given coverage.
    fn blend(&mut self, x: i32, y: i32, coverage: f32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.pixels.width() || y as u32 >= self.pixels.height()
        {
            return;
        }
        let a = coverage.clamp(0.0, 1.0);
        if a == 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst.0 = [
            mix(color.r, dst.0[0]),
            mix(color.g, dst.0[1]),
            mix(color.b, dst.0[2]),
        ];
    }
}

/// Advance width of `text`: pen position after the last glyph, kerning included.
fn advance_width(face: &Font<'static>, scale: Scale, text: &str) -> f32 {
    face.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

impl TextMeasure for RasterSurface<'_> {
    fn measure_text_width(&self, text: &str, font: &FontDescriptor) -> Result<f32, SurfaceError> {
        let face = self.fonts.face(&font.family)?;
        Ok(advance_width(face, Scale::uniform(font.size_px), text))
    }
}

impl DrawingSurface for RasterSurface<'_> {
    fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    fn fill_background(&mut self, color: Color) {
        let (w, h) = (self.pixels.width() as i64, self.pixels.height() as i64);
        self.fill_rect(0, 0, w, h, color);
    }

    fn stroke_border(&mut self, inset: u32, line_width: u32, dash: &DashPattern, color: Color) {
        if line_width == 0 {
            return;
        }
        let CanvasSize { width, height } = self.size();
        let (left, top) = (inset as i64, inset as i64);
        let right = width as i64 - inset as i64;
        let bottom = height as i64 - inset as i64;
        if right <= left || bottom <= top {
            return;
        }

        // The stroke straddles the edge: `before` pixels outside, the rest inside.
        let before = line_width as i64 / 2;
        let after = line_width as i64 - before;
        let (rect_w, rect_h) = (right - left, bottom - top);

        // Clockwise from the top-left corner. Each edge runs `before` past both
        // corners so the joins are filled like a miter.
        let mut along = 0i64;
        for x in (left - before)..(right + after) {
            if dash.is_on(along + (x - left)) {
                self.fill_rect(x, top - before, x + 1, top + after, color);
            }
        }
        along += rect_w;
        for y in (top - before)..(bottom + after) {
            if dash.is_on(along + (y - top)) {
                self.fill_rect(right - before, y, right + after, y + 1, color);
            }
        }
        along += rect_h;
        for x in ((left - before)..(right + after)).rev() {
            if dash.is_on(along + (right - x)) {
                self.fill_rect(x, bottom - before, x + 1, bottom + after, color);
            }
        }
        along += rect_w;
        for y in ((top - before)..(bottom + after)).rev() {
            if dash.is_on(along + (bottom - y)) {
                self.fill_rect(left - before, y, left + after, y + 1, color);
            }
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: &FontDescriptor,
        color: Color,
        align: HAlign,
        anchor: VAnchor,
    ) -> Result<(), SurfaceError> {
        let fonts = self.fonts;
        let face = fonts.face(&font.family)?;
        let scale = Scale::uniform(font.size_px);
        let metrics = face.v_metrics(scale);

        let width = advance_width(face, scale, text);
        let start_x = match align {
            HAlign::Left => x,
            HAlign::Center => x - width / 2.0,
            HAlign::Right => x - width,
        };
        // descent is negative, so a bottom anchor lifts the baseline above `y`
        let baseline = match anchor {
            VAnchor::Top => y + metrics.ascent,
            VAnchor::Bottom => y + metrics.descent,
        };

        let glyphs: Vec<_> = face
            .layout(text, scale, point(start_x.round(), baseline.round()))
            .collect();
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    self.blend(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage, color);
                });
            }
        }
        Ok(())
    }

    fn encode_to_bytes(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(
                self.pixels.as_raw(),
                self.pixels.width(),
                self.pixels.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| SurfaceError::Encode(format!("PNG encode failed: {e}")))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{BODY_FONT, TITLE_FONT};
    use crate::test_helpers::system_font_registry;

    const INK: Color = Color::rgb(0x1a, 0x53, 0x5c);
    const WHITE: Color = Color::rgb(255, 255, 255);

    fn small() -> CanvasSize {
        CanvasSize {
            width: 200,
            height: 100,
        }
    }

    fn rgb(surface: &RasterSurface, x: u32, y: u32) -> Color {
        let p = surface.pixels().get_pixel(x, y);
        Color::rgb(p.0[0], p.0[1], p.0[2])
    }

    #[test]
    fn background_fills_every_pixel() {
        let fonts = FontRegistry::default();
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(INK);
        assert!(surface.pixels().pixels().all(|p| p.0 == [0x1a, 0x53, 0x5c]));
    }

    #[test]
    fn solid_border_is_centred_on_inset_edge() {
        let fonts = FontRegistry::default();
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(WHITE);
        surface.stroke_border(10, 4, &DashPattern(vec![]), INK);

        // Top edge spans y = 8..12
        assert_eq!(rgb(&surface, 100, 7), WHITE);
        assert_eq!(rgb(&surface, 100, 8), INK);
        assert_eq!(rgb(&surface, 100, 11), INK);
        assert_eq!(rgb(&surface, 100, 12), WHITE);
        // Left edge spans x = 8..12
        assert_eq!(rgb(&surface, 9, 50), INK);
        // Right edge straddles x = 190
        assert_eq!(rgb(&surface, 189, 50), INK);
        assert_eq!(rgb(&surface, 192, 50), WHITE);
        // Corner join is filled
        assert_eq!(rgb(&surface, 8, 8), INK);
        // Interior untouched
        assert_eq!(rgb(&surface, 100, 50), WHITE);
    }

    #[test]
    fn dashed_border_leaves_gaps() {
        let fonts = FontRegistry::default();
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(WHITE);
        surface.stroke_border(10, 2, &DashPattern(vec![20, 10]), INK);

        // Along the top edge, distance 0..20 is on, 20..30 is off
        assert_eq!(rgb(&surface, 10 + 5, 10), INK);
        assert_eq!(rgb(&surface, 10 + 25, 10), WHITE);
        assert_eq!(rgb(&surface, 10 + 35, 10), INK);
    }

    #[test]
    fn border_larger_than_canvas_is_a_no_op() {
        let fonts = FontRegistry::default();
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(WHITE);
        surface.stroke_border(60, 10, &DashPattern::default(), INK);
        assert!(surface.pixels().pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn unknown_font_is_an_error() {
        let fonts = FontRegistry::default();
        let mut surface = RasterSurface::new(small(), &fonts);
        let font = FontDescriptor::new(TITLE_FONT, 20.0);
        assert!(surface.measure_text_width("hi", &font).is_err());
        assert!(
            surface
                .fill_text("hi", 0.0, 0.0, &font, INK, HAlign::Left, VAnchor::Top)
                .is_err()
        );
    }

    #[test]
    fn encodes_valid_png_of_canvas_size() {
        let fonts = FontRegistry::default();
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(INK);
        let bytes = surface.encode_to_bytes().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 100));
    }

    #[test]
    fn measured_width_grows_with_text_and_size() {
        let Some(fonts) = system_font_registry() else {
            eprintln!("no system TrueType font found, skipping");
            return;
        };
        let surface = RasterSurface::new(small(), &fonts);
        let small_font = FontDescriptor::new(BODY_FONT, 20.0);
        let big_font = FontDescriptor::new(BODY_FONT, 40.0);

        let short = surface.measure_text_width("cover", &small_font).unwrap();
        let long = surface.measure_text_width("cover image", &small_font).unwrap();
        let big = surface.measure_text_width("cover", &big_font).unwrap();
        assert!(short > 0.0);
        assert!(long > short);
        assert!((big - 2.0 * short).abs() < 1.0);
        assert_eq!(surface.measure_text_width("", &small_font).unwrap(), 0.0);
    }

    #[test]
    fn centred_text_inks_around_x() {
        let Some(fonts) = system_font_registry() else {
            eprintln!("no system TrueType font found, skipping");
            return;
        };
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(WHITE);
        let font = FontDescriptor::new(TITLE_FONT, 32.0);
        surface
            .fill_text("HHHH", 100.0, 20.0, &font, INK, HAlign::Center, VAnchor::Top)
            .unwrap();

        let inked: Vec<u32> = surface
            .pixels()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [255, 255, 255])
            .map(|(x, _, _)| x)
            .collect();
        assert!(!inked.is_empty());
        let min = *inked.iter().min().unwrap();
        let max = *inked.iter().max().unwrap();
        let mid = (min + max) / 2;
        assert!((90..=110).contains(&mid), "ink centred at {mid}");
        // Nothing is drawn above the top anchor
        assert!(
            surface
                .pixels()
                .enumerate_pixels()
                .filter(|(_, y, _)| *y < 20)
                .all(|(_, _, p)| p.0 == [255, 255, 255])
        );
    }

    #[test]
    fn bottom_anchor_keeps_ink_above_y() {
        let Some(fonts) = system_font_registry() else {
            eprintln!("no system TrueType font found, skipping");
            return;
        };
        let mut surface = RasterSurface::new(small(), &fonts);
        surface.fill_background(WHITE);
        let font = FontDescriptor::new(BODY_FONT, 24.0);
        surface
            .fill_text("Hxg", 10.0, 80.0, &font, INK, HAlign::Left, VAnchor::Bottom)
            .unwrap();
        assert!(
            surface
                .pixels()
                .enumerate_pixels()
                .filter(|(_, y, _)| *y > 82)
                .all(|(_, _, p)| p.0 == [255, 255, 255])
        );
    }
}
