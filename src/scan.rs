//! Post discovery.
//!
//! Walks the site's source tree for markdown posts and turns each one into a
//! [`PageMetadata`] record the cover generator can consume.
//!
//! ## Directory Structure
//!
//! ```text
//! src/                             # Source root (--source)
//! ├── index.njk                    # Not markdown, ignored
//! └── posts/                       # Scanned when present, else the whole root
//!     ├── index.md                 # Listing page, no cover
//!     ├── my-first-post.md         # → /media/my-first-post-cover.png
//!     └── 2019/
//!         └── moving-to-rust.md    # Nested directories are fine
//! ```
//!
//! ## Front Matter
//!
//! ```text
//! ---
//! title: "Moving to Rust"
//! abstract: Why the build tooling got rewritten
//! tags: [rust, tooling]
//! ---
//! ```
//!
//! Only flat `key: value` scalars are read; other keys are ignored.
//!
//! | Field | First available wins |
//! |---|---|
//! | title | `title` → first level-one heading → file stem with dashes as spaces |
//! | abstract | `abstract` → `description` → empty |
//!
//! Posts with `draft: true` are skipped.

use crate::types::PageMetadata;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Unterminated front matter in {0}")]
    FrontMatter(PathBuf),
}

/// A discovered post: where it came from and what the cover will show.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// File location as found on disk.
    pub path: PathBuf,
    pub page: PageMetadata,
}

/// Find every markdown post under `source`.
///
/// Scans `source/posts` when it exists, otherwise `source` itself. Posts are
/// returned sorted by path so builds are reproducible.
pub fn scan(source: &Path) -> Result<Vec<Post>, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::SourceNotFound(source.to_path_buf()));
    }
    let posts_dir = source.join("posts");
    let root = if posts_dir.is_dir() {
        posts_dir
    } else {
        source.to_path_buf()
    };

    let mut posts = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) || is_listing(path) {
            continue;
        }
        let content = fs::read_to_string(path)?;
        match parse_post(path, &content)? {
            Some(page) => posts.push(Post {
                path: path.to_path_buf(),
                page,
            }),
            None => tracing::debug!(path = %path.display(), "skipping draft"),
        }
    }
    Ok(posts)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// `index.md` renders a listing, not a post with its own cover.
fn is_listing(path: &Path) -> bool {
    path.file_stem().is_some_and(|s| s == "index")
}

/// Build page metadata from a post's content. `None` for drafts.
pub fn parse_post(path: &Path, content: &str) -> Result<Option<PageMetadata>, ScanError> {
    let (front, body) =
        split_front_matter(content).ok_or_else(|| ScanError::FrontMatter(path.to_path_buf()))?;

    if front.get("draft").is_some_and(|v| v == "true") {
        return Ok(None);
    }

    let title = front
        .get("title")
        .filter(|t| !t.is_empty())
        .cloned()
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| title_from_stem(path));
    let summary = front
        .get("abstract")
        .or_else(|| front.get("description"))
        .cloned()
        .unwrap_or_default();

    Ok(Some(PageMetadata {
        title,
        summary,
        input_path: Some(pipeline_path(path)),
    }))
}

/// Split leading `---` front matter from the body.
///
/// Content without front matter yields an empty map and the whole content.
/// Returns `None` when the opening fence is never closed.
fn split_front_matter(content: &str) -> Option<(BTreeMap<String, String>, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == "---" => {}
        _ => return Some((BTreeMap::new(), content)),
    }

    let mut front = BTreeMap::new();
    let mut consumed = content.split_inclusive('\n').next().map_or(0, str::len);
    for line in lines {
        consumed += line.len();
        let trimmed = line.trim_end();
        if trimmed == "---" {
            return Some((front, &content[consumed..]));
        }
        // Indented lines and list items belong to nested values we don't read
        if line.starts_with([' ', '\t', '-', '#']) {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            front.insert(key.trim().to_string(), unquote(value.trim()));
        }
    }
    None
}

/// Strip one level of matching single or double quotes.
fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    value.to_string()
}

/// Plain text of the first level-one heading, ATX or setext.
fn first_heading(body: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_heading = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = text.trim();
                if !title.is_empty() {
                    return Some(title.to_string());
                }
                in_heading = false;
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_heading => text.push(' '),
            _ => {}
        }
    }
    None
}

fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('-', " "))
        .unwrap_or_default()
}

/// Path as the page pipeline reports it: relative, `./`-prefixed, forward slashes.
fn pipeline_path(path: &Path) -> String {
    let cwd = std::env::current_dir().ok();
    let relative = cwd
        .as_deref()
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if relative.is_absolute() || joined.starts_with('.') {
        joined.replacen("//", "/", 1)
    } else {
        format!("./{joined}")
    }
}
