//! Font registry, the one shared resource of a build.
//!
//! A [`FontRegistry`] binds family aliases (`"TitleFont"`, `"BodyFont"`) to
//! parsed font faces. It is built once before any cover is drawn and has no
//! mutation API afterwards: generation jobs receive it behind an `Arc` and
//! only ever read from it, so concurrent jobs need no locking and an alias can
//! never be rebound under content that was already drawn with it.

use rusttype::Font;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Alias of the large display face used for titles.
pub const TITLE_FONT: &str = "TitleFont";

/// Alias of the wide-coverage text face used for the abstract and signature.
pub const BODY_FONT: &str = "BodyFont";

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font '{alias}' from {}: {source}", path.display())]
    Io {
        alias: String,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Font '{alias}' at {} is not a valid TrueType/OpenType font", path.display())]
    Parse { alias: String, path: PathBuf },
    #[error("No font registered under alias '{0}'")]
    UnknownAlias(String),
}

/// A font family alias at a pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    pub size_px: f32,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size_px: f32) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

/// Immutable alias → font map.
#[derive(Clone, Default)]
pub struct FontRegistry {
    faces: BTreeMap<String, Font<'static>>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("aliases", &self.faces.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FontRegistry {
    /// Load every font file in `files` and bind it to its alias.
    ///
    /// Fails on the first file that cannot be read or parsed.
    pub fn load(files: &BTreeMap<String, PathBuf>) -> Result<Self, FontError> {
        let mut builder = FontRegistryBuilder::default();
        for (alias, path) in files {
            builder = builder.file(alias, path)?;
        }
        Ok(builder.build())
    }

    pub fn builder() -> FontRegistryBuilder {
        FontRegistryBuilder::default()
    }

    /// Look up the face bound to `alias`.
    pub fn face(&self, alias: &str) -> Result<&Font<'static>, FontError> {
        self.faces
            .get(alias)
            .ok_or_else(|| FontError::UnknownAlias(alias.to_string()))
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.faces.contains_key(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }
}

/// Collects faces before freezing them into a [`FontRegistry`].
///
/// Binding the same alias twice keeps the last face; nothing can be bound
/// once [`build`](Self::build) has been called.
#[derive(Default)]
pub struct FontRegistryBuilder {
    faces: BTreeMap<String, Font<'static>>,
}

impl FontRegistryBuilder {
    /// Read and parse a font file.
    pub fn file(self, alias: &str, path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            alias: alias.to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        self.bytes(alias, data, path)
    }

    /// Parse in-memory font data; `origin` only labels errors.
    pub fn bytes(mut self, alias: &str, data: Vec<u8>, origin: &Path) -> Result<Self, FontError> {
        let font = Font::try_from_vec(data).ok_or_else(|| FontError::Parse {
            alias: alias.to_string(),
            path: origin.to_path_buf(),
        })?;
        tracing::debug!(alias, origin = %origin.display(), "registered font");
        self.faces.insert(alias.to_string(), font);
        Ok(self)
    }

    pub fn build(self) -> FontRegistry {
        FontRegistry { faces: self.faces }
    }
}
