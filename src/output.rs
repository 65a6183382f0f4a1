//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every post is shown by its positional index and title. Filesystem paths
//! and the cover each post maps to are secondary context on indented lines,
//! so the output reads as an inventory of covers rather than a file listing.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 Moving to Rust
//!     Source: posts/2019/moving-to-rust.md
//!     Cover: /media/moving-to-rust-cover.png
//!     Why the build tooling got rewritten
//!
//! Fonts
//!     TitleFont: fonts/title.ttf
//!     BodyFont: fonts/body.otf (missing)
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Moving to Rust → /media/moving-to-rust-cover.png
//!     Source: ./src/posts/2019/moving-to-rust.md
//! 002 Tags (no source file, skipped)
//! 003 Broken post FAILED
//!     Source: ./src/posts/broken.md
//!     Error: Failed to write out/media/broken-cover.png: Permission denied
//!
//! Covers: 1 rendered, 1 skipped, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure,
//! apart from the font listing noting which files exist.

use crate::cover::{BatchSummary, CoverEvent};
use crate::paths::resolve;
use crate::scan::Post;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the discovered posts and the cover each one will get.
pub fn format_scan_output(posts: &[Post], source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];
    if posts.is_empty() {
        lines.push("    (none)".to_string());
    }

    for (i, post) in posts.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.page.title));
        let source = post.path.strip_prefix(source_root).unwrap_or(&post.path);
        lines.push(format!("    Source: {}", source.display()));

        // Output root is irrelevant for the site path
        match resolve(post.page.input_path.as_deref(), Path::new("")) {
            Some(paths) => lines.push(format!("    Cover: {}", paths.site_path)),
            None => lines.push("    Cover: (none)".to_string()),
        }

        let summary = truncate_desc(post.page.summary.trim(), 60);
        if !summary.is_empty() {
            lines.push(format!("    {}", summary));
        }
    }
    lines
}

/// Format the font bindings, flagging files that do not exist.
pub fn format_font_check(files: &BTreeMap<String, PathBuf>) -> Vec<String> {
    let mut lines = vec!["Fonts".to_string()];
    for (alias, path) in files {
        let missing = if path.is_file() { "" } else { " (missing)" };
        lines.push(format!("    {}: {}{}", alias, path.display(), missing));
    }
    lines
}

/// Print check output to stdout.
pub fn print_scan_output(posts: &[Post], source_root: &Path, fonts: &BTreeMap<String, PathBuf>) {
    for line in format_scan_output(posts, source_root) {
        println!("{}", line);
    }
    println!();
    for line in format_font_check(fonts) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single cover progress event as display lines.
pub fn format_cover_event(event: &CoverEvent) -> Vec<String> {
    match event {
        CoverEvent::Rendered {
            index,
            title,
            input_path,
            site_path,
        } => vec![
            format!("{} {} \u{2192} {}", format_index(*index), title, site_path),
            format!("    Source: {}", input_path),
        ],
        CoverEvent::Skipped { index, title } => vec![format!(
            "{} {} (no source file, skipped)",
            format_index(*index),
            title
        )],
        CoverEvent::Failed {
            index,
            title,
            input_path,
            error,
        } => {
            let mut lines = vec![format!("{} {} FAILED", format_index(*index), title)];
            if let Some(source) = input_path {
                lines.push(format!("    Source: {}", source));
            }
            lines.push(format!("    Error: {}", error));
            lines
        }
    }
}

/// Format the closing totals line of a batch.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    vec![String::new(), format!("Covers: {}", summary)]
}

/// Print batch totals to stdout.
pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
