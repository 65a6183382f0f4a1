//! # Social Cover
//!
//! Generates social preview images for blog posts: a fixed-size PNG with the
//! post's title and abstract inside a dashed border, signed with the site
//! name. One cover per post, named after the post's source file, so templates
//! can link `og:image` without any lookup table.
//!
//! # Architecture: One Pipeline Per Page
//!
//! ```text
//! 1. Resolve   input path   →  /media/{stem}-cover.png   (or skip)
//! 2. Compose   metadata     →  draw calls on a fresh surface
//! 3. Write     surface      →  PNG bytes → atomic rename into place
//! ```
//!
//! Pages share nothing mutable. The font registry and layout are read-only
//! once built, each page draws onto its own surface, and a batch renders on
//! the rayon pool with per-page results.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Maps a page's source path to the cover's site path and file path |
//! | [`fonts`] | Loads font files and binds them to the `TitleFont` / `BodyFont` aliases |
//! | [`surface`] | Drawing surface trait and its raster implementation |
//! | [`layout`] | Greedy word wrap against measured text width |
//! | [`compose`] | Places background, border and the three text regions |
//! | [`writer`] | Encodes the surface and writes it atomically |
//! | [`cover`] | Per-page generation and parallel batches |
//! | [`config`] | `cover.toml` loading, validation and merging onto stock defaults |
//! | [`scan`] | Discovers markdown posts and reads their front matter |
//! | [`types`] | `PageMetadata`, the record every page hands the generator |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Surface Behind a Trait
//!
//! Composition only talks to [`surface::DrawingSurface`]. The raster
//! implementation draws with `rusttype` onto an `image` buffer; tests use a
//! recording surface with fixed-width glyphs, so wrapping and placement are
//! checked exactly without font files.
//!
//! ## Fonts Checked Up Front
//!
//! An unknown font alias is an error before anything is drawn, and the CLI
//! refuses to start when a font file is missing or unreadable. A cover is
//! never rendered in a fallback face.
//!
//! ## Bottom-Anchored Signature
//!
//! The signature's last line sits on its anchor and earlier lines stack
//! upward, so a long signature grows away from the border instead of
//! through it.
//!
//! ## Deterministic Output
//!
//! Identical page, fonts and config produce byte-identical PNGs. Nothing in
//! the pipeline reads clocks, randomness or locale, and the PNG encoder
//! writes no timestamps.

pub mod compose;
pub mod config;
pub mod cover;
pub mod fonts;
pub mod layout;
pub mod output;
pub mod paths;
pub mod scan;
pub mod surface;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
