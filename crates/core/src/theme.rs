//! Palettes and the per-deck theme engine.
//!
//! The engine decides the background of every slide and whether a title bar
//! is drawn. Its section rotation counter is deck-scoped: create one engine
//! per generation (or call [`ThemeEngine::reset`]) and never share it between
//! decks rendered concurrently.

use crate::document::{DocumentTheme, Rgb};
use crate::types::LayoutType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Five named brand colors, as 6-digit hex strings (leading `#` optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

/// Heading and body fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontPalette {
    /// PowerPoint-safe heading font.
    pub heading: String,

    /// PowerPoint-safe body font.
    pub body: String,

    /// Original web heading font.
    #[serde(default)]
    pub heading_web: Option<String>,

    /// Original web body font.
    #[serde(default)]
    pub body_web: Option<String>,
}

/// A logo that may be stamped on every slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoSpec {
    /// Original URL of the logo.
    pub url: String,

    /// Local cached file path.
    #[serde(default)]
    pub cached_path: Option<PathBuf>,

    /// Width in pixels.
    #[serde(default)]
    pub width: Option<u32>,

    /// Height in pixels.
    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub alt_text: Option<String>,
}

/// The colors, fonts and optional logo applied to a rendered deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub colors: ColorPalette,
    pub fonts: FontPalette,
    #[serde(default)]
    pub logo: Option<LogoSpec>,
    /// Where the palette came from (a scraped URL), if known.
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Normalized theme selection for a deck.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeSpec {
    /// Scraped or directly specified palette.
    pub palette: Option<ThemePalette>,

    /// Template document to load layouts from.
    pub template: Option<PathBuf>,
}

/// Parse a hex color string into RGB.
///
/// A leading `#` is stripped. Anything that is not exactly six hex digits
/// resolves to black; scraped colors are unreliable, so this never fails.
pub fn hex_to_color(hex: &str) -> Rgb {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Rgb::BLACK;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => Rgb::new(r, g, b),
        _ => Rgb::BLACK,
    }
}

/// Font used when no palette is available.
const FALLBACK_FONT: &str = "Calibri";

/// Section backgrounds cycle through this many palette colors.
const SECTION_ROTATION_LEN: usize = 3;

/// Stateful theme decisions for one deck.
#[derive(Debug, Clone)]
pub struct ThemeEngine {
    palette: Option<ThemePalette>,
    section_counter: usize,
}

impl ThemeEngine {
    /// Create an engine for one deck. Without a palette, colors fall back to
    /// literal black and white.
    pub fn new(palette: Option<ThemePalette>) -> Self {
        Self {
            palette,
            section_counter: 0,
        }
    }

    /// Restart the section rotation.
    pub fn reset(&mut self) {
        self.section_counter = 0;
    }

    /// The active palette, if any.
    pub fn palette(&self) -> Option<&ThemePalette> {
        self.palette.as_ref()
    }

    /// Background color for the next slide of the given layout.
    ///
    /// SECTION slides rotate through accent, primary, secondary; each call
    /// for a SECTION slide advances the rotation.
    pub fn background_for(&mut self, layout: LayoutType) -> Rgb {
        match layout {
            LayoutType::Title => self.primary(),
            LayoutType::Section => {
                let color = match self.section_counter % SECTION_ROTATION_LEN {
                    0 => self.accent(),
                    1 => self.primary(),
                    _ => self.secondary(),
                };
                self.section_counter += 1;
                color
            }
            _ => self.background(),
        }
    }

    /// Whether a primary-colored bar is drawn across the top of the slide.
    pub fn should_draw_title_bar(layout: LayoutType) -> bool {
        matches!(
            layout,
            LayoutType::TitleContent
                | LayoutType::TwoCol
                | LayoutType::Table
                | LayoutType::Chart
                | LayoutType::ImageFocus
        )
    }

    /// Text color that stays readable on the layout's background.
    ///
    /// TITLE and SECTION slides sit on a brand color, so their text is white.
    pub fn foreground_for(&self, layout: LayoutType) -> Rgb {
        match layout {
            LayoutType::Title | LayoutType::Section => Rgb::WHITE,
            _ => self.text(),
        }
    }

    /// Number of SECTION slides painted so far.
    pub fn sections_painted(&self) -> usize {
        self.section_counter
    }

    pub fn primary(&self) -> Rgb {
        self.color(|c| &c.primary, Rgb::BLACK)
    }

    pub fn secondary(&self) -> Rgb {
        self.color(|c| &c.secondary, Rgb::BLACK)
    }

    pub fn accent(&self) -> Rgb {
        self.color(|c| &c.accent, Rgb::BLACK)
    }

    /// Palette background; white-like when unset.
    pub fn background(&self) -> Rgb {
        self.color(|c| &c.background, Rgb::WHITE)
    }

    pub fn text(&self) -> Rgb {
        self.color(|c| &c.text, Rgb::BLACK)
    }

    pub fn heading_font(&self) -> &str {
        self.palette
            .as_ref()
            .map(|p| p.fonts.heading.as_str())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(FALLBACK_FONT)
    }

    pub fn body_font(&self) -> &str {
        self.palette
            .as_ref()
            .map(|p| p.fonts.body.as_str())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or(FALLBACK_FONT)
    }

    /// Theme part contents for the output document.
    pub fn document_theme(&self) -> DocumentTheme {
        DocumentTheme {
            name: "Deck Theme".to_string(),
            dark: self.text(),
            light: self.background(),
            primary: self.primary(),
            secondary: self.secondary(),
            accent: self.accent(),
            heading_font: self.heading_font().to_string(),
            body_font: self.body_font().to_string(),
        }
    }

    fn color(&self, pick: impl Fn(&ColorPalette) -> &String, unset: Rgb) -> Rgb {
        match &self.palette {
            Some(palette) => {
                let hex = pick(&palette.colors);
                if hex.trim().is_empty() {
                    unset
                } else {
                    hex_to_color(hex)
                }
            }
            None => unset,
        }
    }
}
