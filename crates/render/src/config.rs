//! Renderer configuration and default palette loading.

use deck_core::format::DEFAULT_MAX_CODE_LINES;
use deck_core::{Error, Result, ThemePalette};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings shared by every generation request of one [`crate::Renderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// JSON file holding the fallback palette (`colors` and `fonts`).
    pub default_theme_path: PathBuf,

    /// Directory scanned for `.pptx`/`.potx` templates; relative template
    /// paths are also looked up here.
    pub templates_dir: PathBuf,

    /// Directory used when a deck does not name one.
    pub default_output_dir: PathBuf,

    /// Code lines per slide before a code slide is split.
    pub max_code_lines_per_slide: usize,

    /// Footer text when the footer spec gives none.
    pub footer_fallback_text: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            default_theme_path: PathBuf::from("themes/default_theme.json"),
            templates_dir: PathBuf::from("themes"),
            default_output_dir: PathBuf::from("output"),
            max_code_lines_per_slide: DEFAULT_MAX_CODE_LINES,
            footer_fallback_text: "Generated by deck-forge".to_string(),
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_theme_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_theme_path = path.into();
        self
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_output_dir = dir.into();
        self
    }

    /// Set the code chunk size (minimum 1).
    pub fn with_max_code_lines(mut self, lines: usize) -> Self {
        self.max_code_lines_per_slide = lines.max(1);
        self
    }

    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_fallback_text = text.into();
        self
    }
}

/// Load a palette file of the form `{"colors": {...}, "fonts": {...}}`.
pub fn load_palette(path: &Path) -> Result<ThemePalette> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        Error::InvalidTheme(format!("Failed to parse palette {}: {}", path.display(), e))
    })
}
