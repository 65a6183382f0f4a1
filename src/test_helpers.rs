//! Shared test utilities for the social-cover test suite.
//!
//! Rasterizing real text needs a real font file. None is vendored, so tests
//! that draw glyphs look for a common system face and skip themselves when
//! the machine has none:
//!
//! ```rust
//! let Some(fonts) = system_font_registry() else {
//!     eprintln!("no system TrueType font found, skipping");
//!     return;
//! };
//! ```

use crate::fonts::{BODY_FONT, FontRegistry, TITLE_FONT};
use std::path::{Path, PathBuf};

// =========================================================================
// Fonts
// =========================================================================

/// Well-known locations of a TrueType face on Linux and macOS.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// First system font found, if any.
pub fn system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Registry with both standard aliases bound to the system font.
pub fn system_font_registry() -> Option<FontRegistry> {
    let path = system_font()?;
    let registry = FontRegistry::builder()
        .file(TITLE_FONT, &path)
        .and_then(|b| b.file(BODY_FONT, &path))
        .unwrap()
        .build();
    Some(registry)
}

// =========================================================================
// Source tree fixtures
// =========================================================================

/// Write a markdown post with `title` and `abstract` front matter.
///
/// `rel` is relative to `root`; parent directories are created.
pub fn write_post(root: &Path, rel: &str, title: &str, summary: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let content = format!("---\ntitle: \"{title}\"\nabstract: \"{summary}\"\n---\n\nBody text.\n");
    std::fs::write(&path, content).unwrap();
    path
}
