//! Greedy word wrap.
//!
//! Packs as many words onto a line as fit strictly inside the width budget,
//! then starts the next line. One forward pass, one measurement per word after
//! the first, no backtracking. The result is deterministic for a given text,
//! font and width, which is all the cover composer needs; paragraph-optimal
//! breaking is out of scope.
//!
//! Words are never split. A word wider than the budget gets a line of its own
//! and is allowed to overflow.

use crate::fonts::FontDescriptor;
use crate::surface::{SurfaceError, TextMeasure};

/// Break `text` into lines narrower than `max_width` pixels.
///
/// Whitespace runs (including newlines) collapse to single spaces. Empty or
/// all-whitespace text yields a single empty line.
pub fn wrap<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    font: &FontDescriptor,
    max_width: f32,
) -> Result<Vec<String>, SurfaceError> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Ok(vec![String::new()]);
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();
    for word in words {
        let candidate = format!("{current} {word}");
        if measure.measure_text_width(&candidate, font)? < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    if tracing::enabled!(tracing::Level::DEBUG) {
        for line in lines.iter().filter(|l| !l.contains(' ')) {
            let width = measure.measure_text_width(line, font)?;
            if width > max_width {
                tracing::debug!(word = %line, width, max_width, "word overflows line width");
            }
        }
    }

    Ok(lines)
}
