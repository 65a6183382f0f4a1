//! Page metadata exchanged with the surrounding site pipeline.
//!
//! Records arrive either from a JSON manifest written by another tool or from
//! the markdown [`scan`](crate::scan). Field names follow the JSON the site
//! templates already use (`inputPath`), with snake_case accepted as well.

use serde::{Deserialize, Serialize};

/// What the cover generator needs to know about one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    /// Short summary shown under the title.
    #[serde(rename = "abstract", default)]
    pub summary: String,
    /// Source file the page was generated from. Pages without one get no cover.
    #[serde(
        rename = "inputPath",
        alias = "input_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_path: Option<String>,
}

impl PageMetadata {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        input_path: Option<&str>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            input_path: input_path.map(str::to_string),
        }
    }
}
