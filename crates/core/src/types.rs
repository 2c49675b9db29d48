//! Canonical deck model produced by the specification normalizer.

use crate::theme::ThemeSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A complete, normalized description of a presentation.
#[derive(Debug, Clone)]
pub struct DeckSpecification {
    /// Presentation title (never empty).
    pub title: String,

    /// Optional presentation subtitle.
    pub subtitle: Option<String>,

    /// Optional author, written into the document properties.
    pub author: Option<String>,

    /// Where colors, fonts and layouts come from.
    pub theme: ThemeSpec,

    /// Slides in presentation order (never empty).
    pub slides: Vec<SlideSpecification>,

    /// Output file options.
    pub output: OutputSpec,

    /// Optional footer overlay.
    pub footer: Option<FooterSpec>,
}

/// The purpose of a slide, mapped to a concrete layout at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutType {
    Title,
    #[default]
    TitleContent,
    Section,
    TwoCol,
    ImageFocus,
    Table,
    Chart,
    Code,
    Blank,
}

impl LayoutType {
    /// Every layout type, in declaration order.
    pub const ALL: [LayoutType; 9] = [
        LayoutType::Title,
        LayoutType::TitleContent,
        LayoutType::Section,
        LayoutType::TwoCol,
        LayoutType::ImageFocus,
        LayoutType::Table,
        LayoutType::Chart,
        LayoutType::Code,
        LayoutType::Blank,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::TitleContent => "TITLE_CONTENT",
            Self::Section => "SECTION",
            Self::TwoCol => "TWO_COL",
            Self::ImageFocus => "IMAGE_FOCUS",
            Self::Table => "TABLE",
            Self::Chart => "CHART",
            Self::Code => "CODE",
            Self::Blank => "BLANK",
        }
    }

    /// Look up a layout by its canonical name (exact match).
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == name)
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single slide after normalization.
#[derive(Debug, Clone, Default)]
pub struct SlideSpecification {
    /// Explicit slide title.
    pub title: Option<String>,

    /// Explicit slide subtitle.
    pub subtitle: Option<String>,

    /// Logical layout of the slide.
    pub layout: LayoutType,

    /// Canonical content items, in order.
    pub content: Vec<ContentItem>,

    /// Optional speaker notes.
    pub speaker_notes: Option<String>,
}

impl SlideSpecification {
    /// Create an empty slide with the given layout.
    pub fn new(layout: LayoutType) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Set the slide title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a content item.
    pub fn with_content(mut self, item: ContentItem) -> Self {
        self.content.push(item);
        self
    }
}

/// Where a content item belongs on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPosition {
    Title,
    Subtitle,
    #[default]
    Body,
}

impl ContentPosition {
    /// Parse a position tag, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "title" => Some(Self::Title),
            "subtitle" => Some(Self::Subtitle),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

/// The declared kind of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Bullets,
    Image,
    Table,
    Chart,
    Code,
    TwoColumn,
}

impl ContentKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bullets => "bullets",
            Self::Image => "image",
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Code => "code",
            Self::TwoColumn => "two_column",
        }
    }

    /// Parse a `type` tag, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "bullets" => Some(Self::Bullets),
            "image" => Some(Self::Image),
            "table" => Some(Self::Table),
            "chart" => Some(Self::Chart),
            "code" => Some(Self::Code),
            "two_column" | "two-column" | "twocolumn" => Some(Self::TwoColumn),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical piece of slide content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    /// Logical region the item targets.
    pub position: ContentPosition,

    /// The payload.
    pub body: ContentBody,
}

impl ContentItem {
    /// A body text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ContentBody::Text(text.into()))
    }

    /// A body bullet list.
    pub fn bullets<I, S>(bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ContentBody::Bullets(
            bullets.into_iter().map(Into::into).collect(),
        ))
    }

    /// A body item with the given payload.
    pub fn new(body: ContentBody) -> Self {
        Self {
            position: ContentPosition::Body,
            body,
        }
    }

    /// Retarget the item to another region.
    pub fn with_position(mut self, position: ContentPosition) -> Self {
        self.position = position;
        self
    }

    /// The declared kind of the payload.
    pub fn kind(&self) -> ContentKind {
        self.body.kind()
    }
}

/// Tagged payload of a content item.
///
/// `Missing` and `Malformed` keep degraded input in canonical form so that
/// the compositor can decide between a warning and a per-slide failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBody {
    Text(String),
    Bullets(Vec<String>),
    Image(ImageSpec),
    Table(TableSpec),
    Chart(ChartSpec),
    Code(CodeSpec),
    TwoColumn(TwoColumnSpec),
    /// The declared payload was absent or empty.
    Missing(ContentKind),
    /// The declared payload was present but had the wrong shape.
    Malformed { kind: ContentKind, reason: String },
}

impl ContentBody {
    /// The declared kind of this payload.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Bullets(_) => ContentKind::Bullets,
            Self::Image(_) => ContentKind::Image,
            Self::Table(_) => ContentKind::Table,
            Self::Chart(_) => ContentKind::Chart,
            Self::Code(_) => ContentKind::Code,
            Self::TwoColumn(_) => ContentKind::TwoColumn,
            Self::Missing(kind) | Self::Malformed { kind, .. } => *kind,
        }
    }
}

/// Image reference (rendered as a textual placeholder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Image URL or local path.
    pub url: String,

    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,

    /// Caption shown under the image.
    #[serde(default)]
    pub caption: Option<String>,

    /// Desired width in pixels.
    #[serde(default)]
    pub width: Option<u32>,

    /// Desired height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
}

/// Tabular data (rendered as a textual placeholder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Column headers.
    pub headers: Vec<String>,

    /// Data rows.
    pub rows: Vec<Vec<String>>,

    /// Optional table style name.
    #[serde(default)]
    pub style: Option<String>,
}

/// Chart description (rendered as a textual placeholder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Chart type (bar, line, pie, ...).
    #[serde(rename = "type")]
    pub chart_type: String,

    /// Optional chart title.
    #[serde(default)]
    pub title: Option<String>,

    /// Chart data series.
    pub data: serde_json::Map<String, serde_json::Value>,

    /// X-axis label.
    #[serde(default)]
    pub x_axis_label: Option<String>,

    /// Y-axis label.
    #[serde(default)]
    pub y_axis_label: Option<String>,
}

/// A block of source code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSpec {
    /// The source text, line breaks preserved.
    pub code: String,

    /// Optional language name.
    #[serde(default)]
    pub language: Option<String>,

    /// Optional heading drawn above the code panel.
    #[serde(default)]
    pub title: Option<String>,
}

/// Lines for a side-by-side layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TwoColumnSpec {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

/// Output file options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Output filename, used verbatim when given.
    #[serde(default)]
    pub filename: Option<String>,

    /// Output directory; the renderer's configured default when absent.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Output format extension.
    #[serde(default = "default_output_format")]
    pub format: String,
}

fn default_output_format() -> String {
    "pptx".to_string()
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            filename: None,
            directory: None,
            format: default_output_format(),
        }
    }
}

/// Footer overlay options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterSpec {
    /// Left-aligned footer text; a fallback text is used when absent.
    #[serde(default)]
    pub text: Option<String>,

    /// Show the 1-based slide number on the right.
    #[serde(default = "default_true")]
    pub show_slide_numbers: bool,

    /// Show the generation date in the middle.
    #[serde(default)]
    pub show_date: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FooterSpec {
    fn default() -> Self {
        Self {
            text: None,
            show_slide_numbers: true,
            show_date: false,
        }
    }
}

/// The envelope returned for every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Whether a document was written.
    pub ok: bool,

    /// Path of the written document.
    pub output: Option<String>,

    /// Number of slides successfully rendered.
    pub slides_generated: usize,

    /// Non-fatal issues, in the order they occurred.
    pub warnings: Vec<String>,

    /// Human-readable failure message when `ok` is false.
    pub error: Option<String>,

    /// Reserved for asset-download reporting; always empty.
    pub assets_downloaded: Vec<String>,
}

impl RenderResult {
    /// A successful envelope.
    pub fn success(output: impl Into<String>, slides_generated: usize, warnings: Vec<String>) -> Self {
        Self {
            ok: true,
            output: Some(output.into()),
            slides_generated,
            warnings,
            error: None,
            assets_downloaded: Vec::new(),
        }
    }

    /// A failure envelope; no slides are reported.
    pub fn failure(error: impl Into<String>, warnings: Vec<String>) -> Self {
        Self {
            ok: false,
            output: None,
            slides_generated: 0,
            warnings,
            error: Some(error.into()),
            assets_downloaded: Vec::new(),
        }
    }
}
