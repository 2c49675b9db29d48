//! Specification normalization.
//!
//! Coerces a loosely-shaped JSON deck description into the canonical
//! [`DeckSpecification`]. Content accepts several shorthand forms:
//!
//! - a bare string is a text item
//! - a mapping with `left`/`right` is a two-column item
//! - a mapping with `items` is a bullet list
//! - a mapping without `type` is inferred as bullets or text
//!
//! Shape problems inside a declared payload are kept as
//! [`ContentBody::Malformed`] so they fail one slide later instead of the
//! whole request. Only structural problems return an error here.

use crate::error::{Error, Result};
use crate::theme::{ColorPalette, FontPalette, LogoSpec, ThemePalette, ThemeSpec};
use crate::types::{
    ChartSpec, CodeSpec, ContentBody, ContentItem, ContentKind, ContentPosition,
    DeckSpecification, FooterSpec, ImageSpec, LayoutType, OutputSpec, SlideSpecification,
    TableSpec, TwoColumnSpec,
};
use log::{debug, warn};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Regex matching the separators folded to underscores in layout names.
static LAYOUT_SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \-]").unwrap());

/// A canonical deck plus the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct NormalizedDeck {
    pub deck: DeckSpecification,
    pub warnings: Vec<String>,
}

/// Normalizer for raw deck specifications.
#[derive(Debug, Clone, Default)]
pub struct SpecNormalizer {
    /// Whether unrecognized layout names are rejected instead of degraded.
    strict_layouts: bool,
}

impl SpecNormalizer {
    /// Create a normalizer that degrades unknown layouts to TITLE_CONTENT.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unknown layout names with a structural error.
    pub fn with_strict_layouts(mut self, strict: bool) -> Self {
        self.strict_layouts = strict;
        self
    }

    /// Normalize a complete deck description.
    pub fn normalize_deck(&self, value: &Value) -> Result<NormalizedDeck> {
        let root = value
            .as_object()
            .ok_or_else(|| Error::invalid_spec("deck specification must be an object"))?;
        let mut warnings = Vec::new();

        let title = required_string(root, "title", "deck")?;
        let subtitle = optional_string(root, "subtitle", "deck")?;
        let author = optional_string(root, "author", "deck")?;

        let theme = match root.get("theme") {
            None | Some(Value::Null) => ThemeSpec::default(),
            Some(theme) => normalize_theme(theme, &mut warnings)?,
        };

        let raw_slides = match root.get("slides") {
            Some(Value::Array(slides)) => slides,
            Some(_) => return Err(Error::invalid_spec("slides must be a list")),
            None => return Err(Error::invalid_spec("slides is required")),
        };
        if raw_slides.is_empty() {
            return Err(Error::invalid_spec("slides must contain at least one slide"));
        }

        let mut slides = Vec::with_capacity(raw_slides.len());
        for (idx, raw) in raw_slides.iter().enumerate() {
            slides.push(self.normalize_slide(raw, idx + 1, &mut warnings)?);
        }

        let output: OutputSpec = optional_object(root, "output")?.unwrap_or_default();
        let footer: Option<FooterSpec> = optional_object(root, "footer")?;

        debug!(
            "Normalized deck '{}' with {} slides ({} warnings)",
            title,
            slides.len(),
            warnings.len()
        );

        Ok(NormalizedDeck {
            deck: DeckSpecification {
                title,
                subtitle,
                author,
                theme,
                slides,
                output,
                footer,
            },
            warnings,
        })
    }

    fn normalize_slide(
        &self,
        value: &Value,
        number: usize,
        warnings: &mut Vec<String>,
    ) -> Result<SlideSpecification> {
        let context = format!("slide {number}");
        let slide = value
            .as_object()
            .ok_or_else(|| Error::invalid_spec(format!("{context} must be an object")))?;

        let layout = match optional_string(slide, "layout", &context)? {
            None => LayoutType::default(),
            Some(name) => match Self::normalize_layout(&name) {
                Some(layout) => layout,
                None if self.strict_layouts => {
                    return Err(Error::invalid_spec(format!(
                        "{context} has unknown layout '{name}'"
                    )));
                }
                None => {
                    let message = format!(
                        "Slide {number}: unknown layout '{name}', using {}",
                        LayoutType::TitleContent
                    );
                    warn!("{}", message);
                    warnings.push(message);
                    LayoutType::TitleContent
                }
            },
        };

        let content = match slide.get("content") {
            None => Vec::new(),
            Some(raw) => self
                .normalize_content(raw)
                .map_err(|e| Error::invalid_spec(format!("{context}: {}", strip_prefix(&e))))?,
        };

        Ok(SlideSpecification {
            title: optional_string(slide, "title", &context)?,
            subtitle: optional_string(slide, "subtitle", &context)?,
            layout,
            content,
            speaker_notes: optional_string(slide, "speaker_notes", &context)?,
        })
    }

    /// Normalize a slide's `content` field into canonical items.
    ///
    /// Accepts a single string, a single mapping or a list of either. Empty
    /// strings are dropped. Anything else is a structural error.
    pub fn normalize_content(&self, value: &Value) -> Result<Vec<ContentItem>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(entries) => {
                let mut items = Vec::with_capacity(entries.len());
                for (idx, entry) in entries.iter().enumerate() {
                    let item = normalize_entry(entry).map_err(|e| {
                        Error::invalid_spec(format!("content[{idx}]: {}", strip_prefix(&e)))
                    })?;
                    items.extend(item);
                }
                Ok(items)
            }
            other => Ok(normalize_entry(other)?.into_iter().collect()),
        }
    }

    /// Map a layout name onto a [`LayoutType`].
    ///
    /// Matching is case-insensitive and treats spaces and hyphens as
    /// underscores, so "two-col" and "Two Col" both name TWO_COL.
    pub fn normalize_layout(name: &str) -> Option<LayoutType> {
        let upper = name.trim().to_uppercase();
        let canonical = LAYOUT_SEPARATOR_REGEX.replace_all(&upper, "_");
        LayoutType::from_canonical(&canonical)
    }
}

/// Error text without the variant prefix, for nesting context.
fn strip_prefix(error: &Error) -> String {
    match error {
        Error::InvalidSpecification(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn normalize_entry(value: &Value) -> Result<Option<ContentItem>> {
    match value {
        Value::String(text) => {
            if text.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(ContentItem::text(text.as_str())))
            }
        }
        Value::Object(map) => normalize_mapping(map).map(Some),
        Value::Null => Err(Error::invalid_spec("content entry must not be null")),
        other => Err(Error::invalid_spec(format!(
            "content entry must be a mapping or a string, got {}",
            json_type_name(other)
        ))),
    }
}

fn normalize_mapping(map: &Map<String, Value>) -> Result<ContentItem> {
    let position = match map.get("position") {
        None | Some(Value::Null) => ContentPosition::Body,
        Some(Value::String(name)) => ContentPosition::from_name(name)
            .ok_or_else(|| Error::invalid_spec(format!("unknown content position '{name}'")))?,
        Some(other) => {
            return Err(Error::invalid_spec(format!(
                "content position must be a string, got {}",
                json_type_name(other)
            )));
        }
    };

    let explicit = match map.get("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(
            ContentKind::from_name(name)
                .ok_or_else(|| Error::invalid_spec(format!("unknown content type '{name}'")))?,
        ),
        Some(other) => {
            return Err(Error::invalid_spec(format!(
                "content type must be a string, got {}",
                json_type_name(other)
            )));
        }
    };

    let has_columns = map.contains_key("left") || map.contains_key("right");
    let kind = if has_columns {
        ContentKind::TwoColumn
    } else if let Some(kind) = explicit {
        kind
    } else if map.contains_key("bullets") || map.contains_key("items") {
        ContentKind::Bullets
    } else {
        ContentKind::Text
    };

    let body = match kind {
        ContentKind::Text => text_body(map),
        ContentKind::Bullets => bullets_body(map),
        ContentKind::Image => image_body(map),
        ContentKind::Table => typed_body::<TableSpec>(map, "table", ContentKind::Table, ContentBody::Table),
        ContentKind::Chart => typed_body::<ChartSpec>(map, "chart", ContentKind::Chart, ContentBody::Chart),
        ContentKind::Code => code_body(map),
        ContentKind::TwoColumn => two_column_body(map),
    };

    Ok(ContentItem { position, body })
}

fn text_body(map: &Map<String, Value>) -> ContentBody {
    match map.get("text") {
        None | Some(Value::Null) => ContentBody::Missing(ContentKind::Text),
        Some(Value::String(text)) if text.trim().is_empty() => {
            ContentBody::Missing(ContentKind::Text)
        }
        Some(Value::String(text)) => ContentBody::Text(text.clone()),
        Some(other) => malformed(ContentKind::Text, "text", other),
    }
}

fn bullets_body(map: &Map<String, Value>) -> ContentBody {
    // `items` is only an alias when `bullets` is absent.
    let raw = map.get("bullets").or_else(|| map.get("items"));
    match raw {
        None | Some(Value::Null) => ContentBody::Missing(ContentKind::Bullets),
        Some(value) => match string_lines(value) {
            Some(lines) if lines.is_empty() => ContentBody::Missing(ContentKind::Bullets),
            Some(lines) => ContentBody::Bullets(lines),
            None => malformed(ContentKind::Bullets, "bullets", value),
        },
    }
}

fn image_body(map: &Map<String, Value>) -> ContentBody {
    match map.get("image") {
        Some(Value::String(url)) if !url.trim().is_empty() => ContentBody::Image(ImageSpec {
            url: url.clone(),
            alt_text: None,
            caption: None,
            width: None,
            height: None,
        }),
        _ => typed_body::<ImageSpec>(map, "image", ContentKind::Image, ContentBody::Image),
    }
}

fn code_body(map: &Map<String, Value>) -> ContentBody {
    match map.get("code") {
        None | Some(Value::Null) => ContentBody::Missing(ContentKind::Code),
        Some(Value::String(code)) if code.trim().is_empty() => {
            ContentBody::Missing(ContentKind::Code)
        }
        Some(Value::String(code)) => ContentBody::Code(CodeSpec {
            code: unix_line_endings(code),
            language: map.get("language").and_then(Value::as_str).map(str::to_string),
            title: map.get("title").and_then(Value::as_str).map(str::to_string),
        }),
        Some(value @ Value::Object(_)) => match serde_json::from_value::<CodeSpec>(value.clone()) {
            Ok(spec) if spec.code.trim().is_empty() => ContentBody::Missing(ContentKind::Code),
            Ok(spec) => ContentBody::Code(CodeSpec {
                code: unix_line_endings(&spec.code),
                ..spec
            }),
            Err(e) => ContentBody::Malformed {
                kind: ContentKind::Code,
                reason: e.to_string(),
            },
        },
        Some(other) => malformed(ContentKind::Code, "code", other),
    }
}

/// Code pasted from Windows tools arrives with `\r\n` or bare `\r`.
fn unix_line_endings(code: &str) -> String {
    code.replace("\r\n", "\n").replace('\r', "\n")
}

fn two_column_body(map: &Map<String, Value>) -> ContentBody {
    let mut columns = TwoColumnSpec::default();
    for (key, column) in [("left", &mut columns.left), ("right", &mut columns.right)] {
        match map.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => {
                column.extend(
                    text.lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(str::to_string),
                );
            }
            Some(value) => match string_lines(value) {
                Some(lines) => column.extend(lines),
                None => return malformed(ContentKind::TwoColumn, key, value),
            },
        }
    }

    if columns.left.is_empty() && columns.right.is_empty() {
        ContentBody::Missing(ContentKind::TwoColumn)
    } else {
        ContentBody::TwoColumn(columns)
    }
}

/// Deserialize a nested payload object, keeping failures as malformed bodies.
fn typed_body<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &str,
    kind: ContentKind,
    wrap: fn(T) -> ContentBody,
) -> ContentBody {
    match map.get(key) {
        None | Some(Value::Null) => ContentBody::Missing(kind),
        Some(value @ Value::Object(_)) => match serde_json::from_value::<T>(value.clone()) {
            Ok(spec) => wrap(spec),
            Err(e) => ContentBody::Malformed {
                kind,
                reason: e.to_string(),
            },
        },
        Some(other) => malformed(kind, key, other),
    }
}

fn malformed(kind: ContentKind, key: &str, value: &Value) -> ContentBody {
    ContentBody::Malformed {
        kind,
        reason: format!("expected {key} to be {}, got {}", expected_shape(kind), json_type_name(value)),
    }
}

fn expected_shape(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Text => "a string",
        ContentKind::Bullets | ContentKind::TwoColumn => "a list of strings",
        ContentKind::Code => "a string or an object",
        ContentKind::Image | ContentKind::Table | ContentKind::Chart => "an object",
    }
}

/// A string or list of strings as lines. Blank entries are dropped.
fn string_lines(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(text) if text.trim().is_empty() => Some(Vec::new()),
        Value::String(text) => Some(vec![text.clone()]),
        Value::Array(entries) => entries
            .iter()
            .filter(|entry| !matches!(entry, Value::String(s) if s.trim().is_empty()))
            .map(|entry| match entry {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn normalize_theme(value: &Value, warnings: &mut Vec<String>) -> Result<ThemeSpec> {
    let theme = value
        .as_object()
        .ok_or_else(|| Error::InvalidTheme("theme must be an object".to_string()))?;

    let scraped: Option<ThemePalette> = theme_part(theme, "scraped")?;
    let colors: Option<ColorPalette> = theme_part(theme, "colors")?;
    let fonts: Option<FontPalette> = theme_part(theme, "fonts")?;
    let logo: Option<LogoSpec> = theme_part(theme, "logo")?;

    let direct = match (colors, fonts) {
        (Some(colors), Some(fonts)) => Some(ThemePalette {
            colors,
            fonts,
            logo: logo.clone(),
            source_url: None,
        }),
        (Some(_), None) => {
            return Err(Error::InvalidTheme(
                "colors were given without fonts; provide both or neither".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(Error::InvalidTheme(
                "fonts were given without colors; provide both or neither".to_string(),
            ));
        }
        (None, None) => None,
    };

    let palette = match (scraped, direct) {
        (Some(mut scraped), direct) => {
            if direct.is_some() {
                let message =
                    "Both a scraped theme and direct colors were given; using the scraped theme"
                        .to_string();
                warn!("{}", message);
                warnings.push(message);
            }
            if scraped.logo.is_none() {
                scraped.logo = logo;
            }
            Some(scraped)
        }
        (None, direct) => direct,
    };

    let template = match theme.get("template") {
        None | Some(Value::Null) => None,
        Some(Value::String(path)) if path.trim().is_empty() => None,
        Some(Value::String(path)) => Some(PathBuf::from(path)),
        Some(other) => {
            return Err(Error::InvalidTheme(format!(
                "template must be a path string, got {}",
                json_type_name(other)
            )));
        }
    };

    Ok(ThemeSpec { palette, template })
}

fn theme_part<T: DeserializeOwned>(theme: &Map<String, Value>, key: &str) -> Result<Option<T>> {
    match theme.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| Error::InvalidTheme(format!("{key}: {e}"))),
    }
}

fn required_string(map: &Map<String, Value>, key: &str, context: &str) -> Result<String> {
    match optional_string(map, key, context)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::invalid_spec(format!("{context} {key} is required"))),
    }
}

fn optional_string(map: &Map<String, Value>, key: &str, context: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::invalid_spec(format!(
            "{context} {key} must be a string, got {}",
            json_type_name(other)
        ))),
    }
}

fn optional_object<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Result<Option<T>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| Error::invalid_spec(format!("{key}: {e}"))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::group_body_content;
    use serde_json::json;

    fn content(value: Value) -> Vec<ContentItem> {
        SpecNormalizer::new().normalize_content(&value).unwrap()
    }

    fn deck(slides: Value) -> Value {
        json!({ "title": "Deck", "slides": slides })
    }

    #[test]
    fn test_bare_strings_become_text_and_group_into_bullets() {
        let items = content(json!(["a", "b"]));
        assert_eq!(items, vec![ContentItem::text("a"), ContentItem::text("b")]);
        assert_eq!(group_body_content(items), vec![ContentItem::bullets(["a", "b"])]);
    }

    #[test]
    fn test_items_alias_becomes_bullets() {
        assert_eq!(content(json!({"items": ["x"]})), vec![ContentItem::bullets(["x"])]);
    }

    #[test]
    fn test_bullets_key_wins_over_items() {
        let items = content(json!({"bullets": ["b"], "items": ["i"]}));
        assert_eq!(items, vec![ContentItem::bullets(["b"])]);
    }

    #[test]
    fn test_untyped_mapping_defaults_to_text() {
        assert_eq!(content(json!({"text": "hello"})), vec![ContentItem::text("hello")]);
    }

    #[test]
    fn test_empty_strings_are_dropped() {
        assert!(content(json!(["", "   "])).is_empty());
        assert!(content(json!("")).is_empty());
        assert!(content(Value::Null).is_empty());
    }

    #[test]
    fn test_left_right_mapping_is_two_column() {
        let items = content(json!({"left": ["A: one"], "right": "B\nC"}));
        assert_eq!(
            items[0].body,
            ContentBody::TwoColumn(TwoColumnSpec {
                left: vec!["A: one".into()],
                right: vec!["B".into(), "C".into()],
            })
        );

        let typed = content(json!({"type": "text", "left": ["x"]}));
        assert_eq!(typed[0].kind(), ContentKind::TwoColumn);
    }

    #[test]
    fn test_position_tag_is_kept() {
        let items = content(json!({"type": "text", "text": "Hi", "position": "Title"}));
        assert_eq!(items[0].position, ContentPosition::Title);
    }

    #[test]
    fn test_missing_payload_is_kept_as_missing() {
        let items = content(json!({"type": "image"}));
        assert_eq!(items[0].body, ContentBody::Missing(ContentKind::Image));
    }

    #[test]
    fn test_wrong_payload_shape_is_malformed() {
        let items = content(json!({"type": "chart", "chart": "pie"}));
        assert!(matches!(
            items[0].body,
            ContentBody::Malformed { kind: ContentKind::Chart, .. }
        ));

        let items = content(json!({"type": "table", "table": {"headers": ["a"]}}));
        assert!(matches!(
            items[0].body,
            ContentBody::Malformed { kind: ContentKind::Table, .. }
        ));
    }

    #[test]
    fn test_code_with_sibling_metadata() {
        let items = content(json!({"type": "code", "code": "x = 1", "language": "python"}));
        assert_eq!(
            items[0].body,
            ContentBody::Code(CodeSpec {
                code: "x = 1".into(),
                language: Some("python".into()),
                title: None,
            })
        );
    }

    #[test]
    fn test_code_line_endings_are_unified() {
        let items = content(json!({"type": "code", "code": "a = 1\r\nb = 2\rc = 3"}));
        match &items[0].body {
            ContentBody::Code(code) => assert_eq!(code.code, "a = 1\nb = 2\nc = 3"),
            other => panic!("unexpected body {:?}", other),
        }

        let items = content(json!({"type": "code", "code": {"code": "x\r\ny"}}));
        match &items[0].body {
            ContentBody::Code(code) => assert_eq!(code.code, "x\ny"),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_image_url_shorthand() {
        let items = content(json!({"type": "image", "image": "https://x/y.png"}));
        assert!(matches!(&items[0].body, ContentBody::Image(img) if img.url == "https://x/y.png"));
    }

    #[test]
    fn test_structural_content_errors() {
        let normalizer = SpecNormalizer::new();
        assert!(normalizer.normalize_content(&json!([42])).is_err());
        assert!(normalizer.normalize_content(&json!([["nested"]])).is_err());
        let err = normalizer
            .normalize_content(&json!({"type": "video"}))
            .unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("video"));
    }

    #[test]
    fn test_normalize_layout_names() {
        assert_eq!(SpecNormalizer::normalize_layout("title"), Some(LayoutType::Title));
        assert_eq!(SpecNormalizer::normalize_layout("two-col"), Some(LayoutType::TwoCol));
        assert_eq!(
            SpecNormalizer::normalize_layout(" Title Content "),
            Some(LayoutType::TitleContent)
        );
        assert_eq!(SpecNormalizer::normalize_layout("image_focus"), Some(LayoutType::ImageFocus));
        assert_eq!(SpecNormalizer::normalize_layout("titel"), None);
    }

    #[test]
    fn test_unknown_layout_degrades_with_warning() {
        let normalized = SpecNormalizer::new()
            .normalize_deck(&deck(json!([{"layout": "titel"}, {"layout": "section"}])))
            .unwrap();
        assert_eq!(normalized.deck.slides[0].layout, LayoutType::TitleContent);
        assert_eq!(normalized.deck.slides[1].layout, LayoutType::Section);
        assert_eq!(normalized.warnings.len(), 1);
        assert!(normalized.warnings[0].contains("titel"));
    }

    #[test]
    fn test_strict_layouts_reject_unknown_names() {
        let result = SpecNormalizer::new()
            .with_strict_layouts(true)
            .normalize_deck(&deck(json!([{"layout": "titel"}])));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_layout_is_silent_default() {
        let normalized = SpecNormalizer::new().normalize_deck(&deck(json!([{}]))).unwrap();
        assert_eq!(normalized.deck.slides[0].layout, LayoutType::TitleContent);
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn test_deck_structural_errors() {
        let normalizer = SpecNormalizer::new();
        assert!(normalizer.normalize_deck(&json!("deck")).is_err());
        assert!(normalizer.normalize_deck(&json!({"slides": [{}]})).is_err());
        assert!(normalizer.normalize_deck(&json!({"title": "", "slides": [{}]})).is_err());
        assert!(normalizer.normalize_deck(&deck(json!([]))).is_err());
        assert!(normalizer.normalize_deck(&deck(json!("slide"))).is_err());
        assert!(normalizer.normalize_deck(&deck(json!([5]))).is_err());
    }

    #[test]
    fn test_direct_colors_and_fonts_synthesize_palette() {
        let value = json!({
            "title": "Deck",
            "theme": {
                "colors": {
                    "primary": "#E3342F", "secondary": "#FFE9D3", "accent": "#1CCBD0",
                    "background": "#FFFFFF", "text": "#111827"
                },
                "fonts": {"heading": "Calibri", "body": "Tahoma"}
            },
            "slides": [{"title": "One"}]
        });
        let normalized = SpecNormalizer::new().normalize_deck(&value).unwrap();
        let palette = normalized.deck.theme.palette.unwrap();
        assert_eq!(palette.colors.primary, "#E3342F");
        assert_eq!(palette.fonts.body, "Tahoma");
        assert!(palette.source_url.is_none());
    }

    #[test]
    fn test_colors_without_fonts_is_theme_error() {
        let value = json!({
            "title": "Deck",
            "theme": {"colors": {
                "primary": "#000000", "secondary": "#000000", "accent": "#000000",
                "background": "#FFFFFF", "text": "#000000"
            }},
            "slides": [{}]
        });
        let err = SpecNormalizer::new().normalize_deck(&value).unwrap_err();
        assert!(matches!(err, Error::InvalidTheme(_)));
    }

    #[test]
    fn test_output_and_footer_sections() {
        let value = json!({
            "title": "Deck",
            "slides": [{}],
            "output": {"directory": "out"},
            "footer": {"text": "ACME"}
        });
        let normalized = SpecNormalizer::new().normalize_deck(&value).unwrap();
        assert_eq!(normalized.deck.output.directory, Some(PathBuf::from("out")));
        assert_eq!(normalized.deck.output.format, "pptx");
        let footer = normalized.deck.footer.unwrap();
        assert_eq!(footer.text.as_deref(), Some("ACME"));
        assert!(footer.show_slide_numbers);
    }

    #[test]
    fn test_slide_error_names_slide() {
        let err = SpecNormalizer::new()
            .normalize_deck(&deck(json!([{}, {"content": [true]}])))
            .unwrap_err();
        assert!(err.to_string().contains("slide 2"));
    }
}
