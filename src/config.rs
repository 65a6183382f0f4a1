//! Cover configuration module.
//!
//! Handles loading, validating, and merging `cover.toml`. Every value has a
//! stock default matching the GitHub social preview design, so the file is
//! optional and only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! preset = "standard"       # 1280x640; "legacy" is 1200x600
//! # width = 1280            # Explicit sizes override the preset
//! # height = 640
//!
//! [fonts]
//! title = "fonts/title.ttf" # Display face, bound to "TitleFont"
//! body = "fonts/body.otf"   # Wide-coverage face, bound to "BodyFont"
//!
//! [colors]
//! background = "#FFFFFF"
//! text = "#1A535C"          # Border, title and abstract
//! accent = "#FF6B6B"        # Site signature
//!
//! [border]
//! inset = 50
//! line_width = 10
//! dash = [60, 10]           # on/off run lengths in pixels
//!
//! [text]
//! inset = 75                # Horizontal margin of the text column
//! line_gap = 15
//!
//! [title]
//! # top = 60                # Default: 1.2 × border.inset
//! size = 80
//!
//! [abstract]
//! # top = 320               # Default: half the canvas height
//! size = 40
//!
//! [signature]
//! # bottom = 580            # Default: height − 1.2 × border.inset
//! size = 33
//! text = "blog.example.com"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Region anchors left unset follow the canvas, so switching to the legacy
//! preset keeps every region inside the border. Relative font paths are
//! resolved against the directory holding `cover.toml`. Unknown keys are
//! rejected to catch typos early.

use crate::compose::{BorderStyle, CoverLayout, RegionStyle};
use crate::fonts::{BODY_FONT, FontDescriptor, TITLE_FONT};
use crate::surface::{CanvasSize, Color, DashPattern, VAnchor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Cover configuration loaded from `cover.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverConfig {
    pub canvas: CanvasConfig,
    pub fonts: FontsConfig,
    pub colors: ColorsConfig,
    pub border: BorderConfig,
    pub text: TextConfig,
    pub title: TopRegionConfig,
    #[serde(rename = "abstract")]
    pub summary: TopRegionConfig,
    pub signature: SignatureConfig,
    pub processing: ProcessingConfig,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            fonts: FontsConfig::default(),
            colors: ColorsConfig::default(),
            border: BorderConfig::default(),
            text: TextConfig::default(),
            title: TopRegionConfig::title(),
            summary: TopRegionConfig::summary(),
            signature: SignatureConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

/// Largest accepted canvas edge in pixels.
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Named canvas sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasPreset {
    /// [`CanvasSize::DEFAULT`], the current social preview size.
    #[default]
    Standard,
    /// [`CanvasSize::LEGACY`], used by earlier site generations.
    Legacy,
}

impl CanvasPreset {
    pub fn size(self) -> CanvasSize {
        match self {
            CanvasPreset::Standard => CanvasSize::DEFAULT,
            CanvasPreset::Legacy => CanvasSize::LEGACY,
        }
    }
}

/// Canvas dimensions: a preset, optionally overridden edge by edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub preset: CanvasPreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl CanvasConfig {
    pub fn size(&self) -> CanvasSize {
        let preset = self.preset.size();
        CanvasSize {
            width: self.width.unwrap_or(preset.width),
            height: self.height.unwrap_or(preset.height),
        }
    }
}

/// Font files bound to the two standard aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Display face for titles.
    pub title: PathBuf,
    /// Wide glyph coverage face (CJK included) for abstract and signature.
    pub body: PathBuf,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            title: PathBuf::from("fonts/title.ttf"),
            body: PathBuf::from("fonts/body.otf"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsConfig {
    pub background: Color,
    /// Border, title and abstract colour.
    pub text: Color,
    /// Signature colour.
    pub accent: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            text: Color::rgb(0x1A, 0x53, 0x5C),
            accent: Color::rgb(0xFF, 0x6B, 0x6B),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    pub inset: u32,
    pub line_width: u32,
    pub dash: Vec<u32>,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            inset: 50,
            line_width: 10,
            dash: DashPattern::default().0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Horizontal margin on each side of the text column.
    pub inset: u32,
    /// Space added to the font size to get the line height.
    pub line_gap: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            inset: 75,
            line_gap: 15,
        }
    }
}

/// A region that grows downward from `top`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopRegionConfig {
    /// Unset: derived from the canvas, see [`CoverConfig::title_top`] and
    /// [`CoverConfig::summary_top`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    /// Font size in pixels.
    pub size: u32,
}

impl TopRegionConfig {
    pub fn title() -> Self {
        Self { top: None, size: 80 }
    }

    pub fn summary() -> Self {
        Self { top: None, size: 40 }
    }
}

/// The bottom-anchored site signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignatureConfig {
    /// Unset: derived from the canvas, see [`CoverConfig::signature_bottom`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    pub size: u32,
    pub text: String,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            bottom: None,
            size: 33,
            text: "blog.example.com".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel cover workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

impl CoverConfig {
    /// Vertical clearance the border keeps from the canvas edge: 1.2 × inset.
    fn border_margin(&self) -> u32 {
        self.border.inset.saturating_mul(6) / 5
    }

    /// Top of the title region.
    pub fn title_top(&self) -> u32 {
        self.title.top.unwrap_or_else(|| self.border_margin())
    }

    /// Top of the abstract region; mid-height unless set.
    pub fn summary_top(&self) -> u32 {
        self.summary.top.unwrap_or(self.canvas.size().height / 2)
    }

    /// Bottom of the signature's last line.
    pub fn signature_bottom(&self) -> u32 {
        self.signature.bottom.unwrap_or_else(|| {
            self.canvas
                .size()
                .height
                .saturating_sub(self.border_margin())
        })
    }

    /// Validate that the layout fits inside the border on the canvas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasSize { width, height } = self.canvas.size();
        if width == 0 || height == 0 {
            return Err(ConfigError::Validation(
                "canvas width and height must be non-zero".into(),
            ));
        }
        if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
            return Err(ConfigError::Validation(format!(
                "canvas {width}x{height} exceeds the {MAX_CANVAS_EDGE}px limit"
            )));
        }
        if self.text.inset.saturating_mul(2) >= width {
            return Err(ConfigError::Validation(
                "text.inset leaves no room for text on this canvas".into(),
            ));
        }
        if self.border.inset.saturating_mul(2) >= width.min(height) {
            return Err(ConfigError::Validation(
                "border.inset must be less than half the canvas".into(),
            ));
        }
        if self.border.line_width >= self.border.inset.max(1) {
            return Err(ConfigError::Validation(format!(
                "border.line_width ({}) must be less than border.inset ({})",
                self.border.line_width, self.border.inset
            )));
        }
        if !self.border.dash.is_empty() && self.border.dash.iter().all(|&d| d == 0) {
            return Err(ConfigError::Validation(
                "border.dash must contain a non-zero run (use [] for a solid line)".into(),
            ));
        }
        if self.text.line_gap >= height {
            return Err(ConfigError::Validation(format!(
                "text.line_gap ({}) must be less than the {height}px canvas",
                self.text.line_gap
            )));
        }
        for (name, size) in [
            ("title.size", self.title.size),
            ("abstract.size", self.summary.size),
            ("signature.size", self.signature.size),
        ] {
            if size == 0 {
                return Err(ConfigError::Validation(format!("{name} must be positive")));
            }
            if size >= height {
                return Err(ConfigError::Validation(format!(
                    "{name} ({size}) must be less than the {height}px canvas"
                )));
            }
        }

        // Anchors must clear the stroke, which straddles the inset line
        let inner_top = self.border.inset + self.border.line_width.div_ceil(2);
        let inner_bottom = height.saturating_sub(inner_top);
        for (name, y) in [
            ("title.top", self.title_top()),
            ("abstract.top", self.summary_top()),
            ("signature.bottom", self.signature_bottom()),
        ] {
            if y <= inner_top || y >= inner_bottom {
                return Err(ConfigError::Validation(format!(
                    "{name} ({y}) must lie inside the border ({inner_top}..{inner_bottom})"
                )));
            }
        }
        Ok(())
    }

    /// Font files keyed by alias, ready for [`FontRegistry::load`](crate::fonts::FontRegistry::load).
    ///
    /// Relative paths are resolved against `base_dir`.
    pub fn font_files(&self, base_dir: &Path) -> BTreeMap<String, PathBuf> {
        [(TITLE_FONT, &self.fonts.title), (BODY_FONT, &self.fonts.body)]
            .into_iter()
            .map(|(alias, path)| (alias.to_string(), base_dir.join(path)))
            .collect()
    }

    /// Translate the config into the composer's layout constants.
    pub fn layout(&self) -> CoverLayout {
        let top_region = |config: &TopRegionConfig, region: u32, family: &str| RegionStyle {
            font: FontDescriptor::new(family, config.size as f32),
            color: self.colors.text,
            y: region as f32,
            anchor: VAnchor::Top,
        };
        CoverLayout {
            canvas: self.canvas.size(),
            background: self.colors.background,
            border: BorderStyle {
                inset: self.border.inset,
                line_width: self.border.line_width,
                dash: DashPattern(self.border.dash.clone()),
                color: self.colors.text,
            },
            text_inset: self.text.inset,
            line_gap: self.text.line_gap as f32,
            title: top_region(&self.title, self.title_top(), TITLE_FONT),
            summary: top_region(&self.summary, self.summary_top(), BODY_FONT),
            signature: RegionStyle {
                font: FontDescriptor::new(BODY_FONT, self.signature.size as f32),
                color: self.colors.accent,
                y: self.signature_bottom() as f32,
                anchor: VAnchor::Bottom,
            },
            signature_text: self.signature.text.clone(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto, so a partial
/// `[abstract]` table still picks up the abstract's own defaults.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CoverConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CoverConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CoverConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to stock defaults.
///
/// Returns the config together with the directory that relative font paths
/// should be resolved against.
pub fn load_config(path: &Path) -> Result<(CoverConfig, PathBuf), ConfigError> {
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using stock defaults");
        return Ok((resolve_config(None)?, base_dir));
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    Ok((resolve_config(Some(overlay))?, base_dir))
}

/// Returns a fully-commented stock `cover.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Cover Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Canvas size in pixels. "standard" is 1280x640, the GitHub/Open Graph
# preview size; "legacy" is the 1200x600 of older site generations.
# width/height override the preset (at most 8192 each).
# ---------------------------------------------------------------------------
[canvas]
preset = "standard"
# width = 1280
# height = 640

# ---------------------------------------------------------------------------
# Fonts (TrueType or OpenType). Relative paths are resolved against the
# directory holding this file.
# ---------------------------------------------------------------------------
[fonts]
# Display face for the title ("TitleFont").
title = "fonts/title.ttf"
# Text face for abstract and signature ("BodyFont"). Pick one with wide glyph
# coverage if posts are written in non-Latin scripts.
body = "fonts/body.otf"

# ---------------------------------------------------------------------------
# Colors (#RRGGBB or #RGB)
# ---------------------------------------------------------------------------
[colors]
background = "#FFFFFF"
text = "#1A535C"      # Border, title, abstract
accent = "#FF6B6B"    # Site signature

# ---------------------------------------------------------------------------
# Dashed border
# ---------------------------------------------------------------------------
[border]
# Distance from the canvas edge to the middle of the stroke.
inset = 50
# Must be less than inset.
line_width = 10
# On/off run lengths in pixels. [] draws a solid line.
dash = [60, 10]

# ---------------------------------------------------------------------------
# Text column
# ---------------------------------------------------------------------------
[text]
# Horizontal margin on each side; lines wrap at width - 2 * inset.
inset = 75
# Line height is font size + line_gap.
line_gap = 15

# ---------------------------------------------------------------------------
# Regions. Sizes are in pixels and must be smaller than the canvas height.
# Unset anchors follow the canvas and border; values shown are for the
# standard canvas. Every anchor must lie inside the border.
# ---------------------------------------------------------------------------
[title]
# top = 60          # 1.2 x border.inset
size = 80

[abstract]
# top = 320         # half the canvas height
size = 40

# The signature is anchored by its bottom edge and grows upward.
[signature]
# bottom = 580      # canvas height - 1.2 x border.inset
size = 33
text = "blog.example.com"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel cover workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stock_defaults_resolve() {
        let config = resolve_config(None).unwrap();
        assert_eq!(config.canvas.size(), CanvasSize::DEFAULT);
        assert_eq!(config.title_top(), 60);
        assert_eq!(config.summary_top(), 320);
        assert_eq!(config.summary.size, 40);
        assert_eq!(config.signature_bottom(), 580);
        assert_eq!(config.border.dash, vec![60, 10]);
        assert_eq!(config.colors.text.to_string(), "#1A535C");
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let from_file = resolve_config(Some(value)).unwrap();
        let defaults = resolve_config(None).unwrap();
        assert_eq!(from_file.layout(), defaults.layout());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let overlay: toml::Value = toml::from_str(
            r##"
[colors]
accent = "#000000"

[abstract]
size = 36
"##,
        )
        .unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.colors.accent, Color::rgb(0, 0, 0));
        assert_eq!(config.colors.text, Color::rgb(0x1A, 0x53, 0x5C));
        assert_eq!(config.summary.size, 36);
        // The top of the abstract region keeps its own default, not the title's
        assert_eq!(config.summary_top(), 320);
    }

    /// Every anchor clears the inner edge of the border stroke.
    fn assert_anchors_inside_border(layout: &CoverLayout) {
        let border = &layout.border;
        let inner_top = (border.inset + border.line_width.div_ceil(2)) as f32;
        let inner_bottom = layout.canvas.height as f32 - inner_top;
        for y in [layout.title.y, layout.summary.y, layout.signature.y] {
            assert!(
                y > inner_top && y < inner_bottom,
                "anchor {y} outside border {inner_top}..{inner_bottom}"
            );
        }
    }

    #[test]
    fn legacy_canvas_override() {
        let overlay: toml::Value = toml::from_str(
            r##"
[canvas]
width = 1200
height = 600
"##,
        )
        .unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        let layout = config.layout();
        assert_eq!(layout.canvas, CanvasSize::LEGACY);
        assert_eq!(layout.title.y, 60.0);
        assert_eq!(layout.summary.y, 300.0);
        assert_eq!(layout.signature.y, 540.0);
        assert_anchors_inside_border(&layout);
    }

    #[test]
    fn legacy_preset_selects_legacy_canvas() {
        let overlay: toml::Value = toml::from_str("[canvas]\npreset = \"legacy\"\n").unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.canvas.size(), CanvasSize::LEGACY);
        assert_anchors_inside_border(&config.layout());

        let overlay: toml::Value =
            toml::from_str("[canvas]\npreset = \"legacy\"\nheight = 630\n").unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(
            config.canvas.size(),
            CanvasSize {
                width: 1200,
                height: 630
            }
        );
    }

    #[test]
    fn default_anchors_follow_border_inset() {
        let overlay: toml::Value = toml::from_str("[border]\ninset = 30\n").unwrap();
        let layout = resolve_config(Some(overlay)).unwrap().layout();
        assert_eq!(layout.title.y, 36.0);
        assert_eq!(layout.signature.y, 604.0);
        assert_anchors_inside_border(&layout);
    }

    #[test]
    fn explicit_anchors_override_derived_ones() {
        let overlay: toml::Value =
            toml::from_str("[title]\ntop = 90\n\n[signature]\nbottom = 560\n").unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.title_top(), 90);
        assert_eq!(config.summary_top(), 320);
        assert_eq!(config.signature_bottom(), 560);
    }

    #[test]
    fn anchors_on_or_outside_border_rejected() {
        let overlay: toml::Value = toml::from_str(
            "[canvas]\npreset = \"legacy\"\n\n[signature]\nbottom = 580\n",
        )
        .unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));

        let mut config = CoverConfig::default();
        config.title.top = Some(50);
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.signature.bottom = Some(590);
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_values_rejected() {
        let mut config = CoverConfig::default();
        config.border.line_width = 4_000_000_000;
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.border.line_width = 50;
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.canvas.width = Some(100_000);
        config.canvas.height = Some(100_000);
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.canvas.width = Some(MAX_CANVAS_EDGE);
        config.canvas.height = Some(MAX_CANVAS_EDGE);
        assert!(config.validate().is_ok());

        let mut config = CoverConfig::default();
        config.signature.size = 640;
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.text.line_gap = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let overlay: toml::Value = toml::from_str("[title]\nweight = 700\n").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_colour_rejected() {
        let overlay: toml::Value = toml::from_str("[colors]\ntext = \"teal\"\n").unwrap();
        assert!(resolve_config(Some(overlay)).is_err());
    }

    #[test]
    fn validation_catches_layout_outside_canvas() {
        let mut config = CoverConfig::default();
        config.signature.bottom = Some(700);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = CoverConfig::default();
        config.text.inset = 640;
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.border.dash = vec![0, 0];
        assert!(config.validate().is_err());

        let mut config = CoverConfig::default();
        config.title.size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn solid_border_is_valid() {
        let mut config = CoverConfig::default();
        config.border.dash = vec![];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn layout_maps_regions_to_aliases_and_anchors() {
        let layout = resolve_config(None).unwrap().layout();
        assert_eq!(layout.title.font, FontDescriptor::new(TITLE_FONT, 80.0));
        assert_eq!(layout.summary.font, FontDescriptor::new(BODY_FONT, 40.0));
        assert_eq!(layout.signature.font, FontDescriptor::new(BODY_FONT, 33.0));
        assert_eq!(layout.signature.anchor, VAnchor::Bottom);
        assert_eq!(layout.signature.color, Color::rgb(0xFF, 0x6B, 0x6B));
        assert_eq!(layout.line_gap, 15.0);
    }

    #[test]
    fn font_files_resolve_against_base_dir() {
        let config = CoverConfig::default();
        let files = config.font_files(Path::new("/site"));
        assert_eq!(files[TITLE_FONT], Path::new("/site/fonts/title.ttf"));
        assert_eq!(files[BODY_FONT], Path::new("/site/fonts/body.otf"));

        let mut config = CoverConfig::default();
        config.fonts.body = PathBuf::from("/usr/share/fonts/noto.otf");
        let files = config.font_files(Path::new("/site"));
        assert_eq!(files[BODY_FONT], Path::new("/usr/share/fonts/noto.otf"));
    }

    #[test]
    fn effective_threads_clamps_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        let huge = ProcessingConfig {
            max_processes: Some(100_000),
        };
        assert_eq!(effective_threads(&huge), cores);
        let zero = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&zero), 1);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let (config, base) = load_config(&tmp.path().join("cover.toml")).unwrap();
        assert_eq!(config.canvas.size(), CanvasSize::DEFAULT);
        assert_eq!(base, tmp.path());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cover.toml");
        fs::write(
            &path,
            r##"
[signature]
text = "notes.example.org"

[processing]
max_processes = 2
"##,
        )
        .unwrap();

        let (config, _) = load_config(&path).unwrap();
        assert_eq!(config.signature.text, "notes.example.org");
        assert_eq!(config.signature_bottom(), 580);
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_invalid_toml_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cover.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }
}
