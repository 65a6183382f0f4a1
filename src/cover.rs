//! Per-page cover generation.
//!
//! A [`CoverGenerator`] owns everything that is shared across pages (the font
//! registry, the layout constants, the output root) and runs the pipeline for
//! one page at a time:
//!
//! ```text
//! resolve(input_path) ──None──▶ skipped, no cover
//!        │
//!        ▼
//! RasterSurface::new → compose → write ──▶ "/media/{stem}-cover.png"
//! ```
//!
//! Each call creates and drops its own surface, so pages are independent and
//! [`generate_all`](CoverGenerator::generate_all) renders them in parallel on
//! the rayon pool. Results come back in input order.
//!
//! Covers are named after the source file's stem only, so `2019/intro.md` and
//! `2020/intro.md` would share `/media/intro-cover.png`. A batch refuses every
//! page of such a group instead of letting the last writer win.

use crate::compose::{CoverLayout, compose};
use crate::fonts::{FontError, FontRegistry};
use crate::paths::resolve;
use crate::surface::{DrawingSurface, RasterSurface, SurfaceError};
use crate::types::PageMetadata;
use crate::writer::{self, WriteError};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Drawing failed: {0}")]
    Surface(#[from] SurfaceError),
    #[error("{0}")]
    Write(#[from] WriteError),
    #[error("{site_path} would be written by several pages: {}", .inputs.join(", "))]
    DuplicatePath {
        site_path: String,
        inputs: Vec<String>,
    },
}

/// Progress events emitted while a batch renders.
///
/// Sent from worker threads as each page finishes, so arrival order is not
/// input order; `index` is the page's 1-based position in the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverEvent {
    Rendered {
        index: usize,
        title: String,
        input_path: String,
        site_path: String,
    },
    Skipped {
        index: usize,
        title: String,
    },
    Failed {
        index: usize,
        title: String,
        input_path: Option<String>,
        error: String,
    },
}

/// Result of one page in a batch.
#[derive(Debug)]
pub struct CoverOutcome {
    pub page: PageMetadata,
    /// `Ok(None)` when the page has no source file and was skipped.
    pub result: Result<Option<String>, CoverError>,
}

/// Totals for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[CoverOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut acc, o| {
                match &o.result {
                    Ok(Some(_)) => acc.rendered += 1,
                    Ok(None) => acc.skipped += 1,
                    Err(_) => acc.failed += 1,
                }
                acc
            })
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rendered, {} skipped, {} failed",
            self.rendered, self.skipped, self.failed
        )
    }
}

/// Renders covers for pages of one site.
#[derive(Debug)]
pub struct CoverGenerator {
    fonts: Arc<FontRegistry>,
    layout: CoverLayout,
    output_root: PathBuf,
}

impl CoverGenerator {
    /// Fails if the layout names a font alias the registry does not hold.
    pub fn new(
        fonts: Arc<FontRegistry>,
        layout: CoverLayout,
        output_root: impl Into<PathBuf>,
    ) -> Result<Self, CoverError> {
        for font in layout.fonts() {
            fonts.face(&font.family)?;
        }
        Ok(Self {
            fonts,
            layout,
            output_root: output_root.into(),
        })
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn layout(&self) -> &CoverLayout {
        &self.layout
    }

    /// Render the cover for one page.
    ///
    /// Returns the site-relative path of the written PNG, or `None` when the
    /// page has no source file to name the cover after.
    #[tracing::instrument(skip(self, page), fields(title = %page.title))]
    pub fn generate(&self, page: &PageMetadata) -> Result<Option<String>, CoverError> {
        let Some(paths) = resolve(page.input_path.as_deref(), &self.output_root) else {
            tracing::debug!("no input path, skipping cover");
            return Ok(None);
        };
        let mut surface = RasterSurface::new(self.layout.canvas, &self.fonts);
        compose(&mut surface, page, &self.layout)?;
        Ok(Some(writer::write(&surface, &paths)?))
    }

    /// Render the cover bytes without touching the filesystem.
    pub fn render_png(&self, page: &PageMetadata) -> Result<Vec<u8>, CoverError> {
        let mut surface = RasterSurface::new(self.layout.canvas, &self.fonts);
        compose(&mut surface, page, &self.layout)?;
        Ok(surface.encode_to_bytes()?)
    }

    /// Render every page in parallel.
    ///
    /// Failures are per page: one unwritable cover does not stop the others.
    /// Pages whose covers would land on the same path all fail with
    /// [`CoverError::DuplicatePath`] and nothing is written for them.
    pub fn generate_all(
        &self,
        pages: &[PageMetadata],
        events: Option<Sender<CoverEvent>>,
    ) -> Vec<CoverOutcome> {
        let collisions = duplicate_claims(pages);
        pages
            .par_iter()
            .zip(collisions)
            .enumerate()
            .map(|(i, (page, collision))| {
                let result = match collision {
                    Some((site_path, inputs)) => {
                        Err(CoverError::DuplicatePath { site_path, inputs })
                    }
                    None => self.generate(page),
                };
                if let Err(e) = &result {
                    tracing::warn!(title = %page.title, error = %e, "cover failed");
                }
                if let Some(tx) = &events {
                    tx.send(event_for(i + 1, page, &result)).ok();
                }
                CoverOutcome {
                    page: page.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// For each page, the shared site path and every input claiming it, when
/// more than one page resolves to the same cover.
fn duplicate_claims(pages: &[PageMetadata]) -> Vec<Option<(String, Vec<String>)>> {
    // The site path does not depend on the output root
    let site_paths: Vec<Option<String>> = pages
        .iter()
        .map(|p| resolve(p.input_path.as_deref(), Path::new("")).map(|r| r.site_path))
        .collect();

    let mut claims: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (page, site_path) in pages.iter().zip(&site_paths) {
        if let (Some(site_path), Some(input)) = (site_path, &page.input_path) {
            claims.entry(site_path.as_str()).or_default().push(input.clone());
        }
    }

    site_paths
        .iter()
        .map(|site_path| {
            let site_path = site_path.as_deref()?;
            let inputs = claims.get(site_path).filter(|inputs| inputs.len() > 1)?;
            Some((site_path.to_string(), inputs.clone()))
        })
        .collect()
}

fn event_for(
    index: usize,
    page: &PageMetadata,
    result: &Result<Option<String>, CoverError>,
) -> CoverEvent {
    let title = page.title.clone();
    match result {
        Ok(Some(site_path)) => CoverEvent::Rendered {
            index,
            title,
            input_path: page.input_path.clone().unwrap_or_default(),
            site_path: site_path.clone(),
        },
        Ok(None) => CoverEvent::Skipped { index, title },
        Err(e) => CoverEvent::Failed {
            index,
            title,
            input_path: page.input_path.clone(),
            error: e.to_string(),
        },
    }
}
