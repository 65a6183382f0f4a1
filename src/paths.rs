//! Cover path derivation.
//!
//! Every page with a concrete source file gets exactly one cover, named after
//! the file's stem:
//!
//! - `src/posts/my-post.md` → `/media/my-post-cover.png`
//! - `C:\blog\posts\hello.world.md` → `/media/hello.world-cover.png`
//! - `./src/index.njk` → `/media/index-cover.png`
//!
//! The site-relative path is canonical. The filesystem path is derived from
//! it by joining its components under the output root, so the same input
//! resolves identically whichever platform produced the path string.

use std::path::{Path, PathBuf};

/// Directory (relative to the site root) that covers are written into.
pub const MEDIA_DIR: &str = "media";

/// Suffix appended to the base name of every cover file.
pub const COVER_SUFFIX: &str = "-cover.png";

/// Where a page's cover lives, both on the site and on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// URL path rooted at the site root, e.g. `/media/my-post-cover.png`.
    pub site_path: String,
    /// Absolute (or output-root relative) location of the PNG file.
    pub file_path: PathBuf,
}

/// Split the final component of a path into `(stem, extension)`.
///
/// Both `/` and `\` are treated as separators. The extension is whatever
/// follows the last `.` of the file name; a name with no dot, or whose only
/// dot is the leading one (`.draft`), has no extension.
pub fn split_file_name(path: &str) -> (&str, Option<&str>) {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
    }
}

/// Resolve the cover paths for a page.
///
/// Returns `None` when there is nothing to name the cover after: no input
/// path, an empty one, or one ending in a separator. Pages like generated
/// index listings have no source file and simply get no cover.
pub fn resolve(input_path: Option<&str>, output_root: &Path) -> Option<ResolvedPaths> {
    let input = input_path.map(str::trim).filter(|p| !p.is_empty())?;
    let (stem, _) = split_file_name(input);
    if stem.is_empty() {
        return None;
    }

    let site_path = format!("/{MEDIA_DIR}/{stem}{COVER_SUFFIX}");
    let file_path = site_path
        .split('/')
        .filter(|c| !c.is_empty())
        .fold(output_root.to_path_buf(), |acc, c| acc.join(c));

    Some(ResolvedPaths {
        site_path,
        file_path,
    })
}
