//! Drawing surfaces. Pure Rust, no native graphics stack.
//!
//! | Primitive | Raster backend |
//! |---|---|
//! | **Background** | solid fill of the `image::RgbImage` buffer |
//! | **Border** | dashed rectangle stroke, walked clockwise |
//! | **Measure** | `rusttype` advance widths with kerning |
//! | **Text** | `rusttype` glyph coverage blended over the buffer |
//! | **Encode** | PNG via `image::codecs::png` |
//!
//! The module is split into:
//! - **Canvas**: [`DrawingSurface`] / [`TextMeasure`] traits and drawing types
//! - **Raster**: [`RasterSurface`], the production backend

pub mod canvas;
pub mod raster;

pub use canvas::{
    CanvasSize, Color, DashPattern, DrawingSurface, HAlign, ParseColorError, SurfaceError,
    TextMeasure, VAnchor,
};
pub use raster::RasterSurface;
