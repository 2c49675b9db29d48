//! Content compositor: lowers one slide specification onto a slide.
//!
//! Order of work on a slide:
//!
//! - title bar and title (overlay on the bar, or the native placeholder)
//! - subtitle
//! - body items, after loose text items are grouped into bullets
//! - cleanup of placeholders that received nothing
//!
//! Backgrounds are painted by the caller because they advance the theme's
//! section rotation. Footer and logo are separate calls so the caller can
//! number slides after failures are skipped.

use crate::placeholders::PlaceholderTable;
use deck_core::document::{Alignment, Anchor, Emu, Paragraph, PictureData, RunStyle, TextFrame, TextRun};
use deck_core::format::{group_body_content, split_for_bold};
use deck_core::theme::LogoSpec;
use deck_core::types::{ChartSpec, CodeSpec, FooterSpec, ImageSpec, TableSpec, TwoColumnSpec};
use deck_core::{
    ContentBody, ContentItem, ContentPosition, Error, LayoutType, Rect, Result, Rgb, Slide,
    SlideSpecification, ThemeEngine,
};
use log::{debug, warn};
use std::path::Path;

/// Height of the primary-colored bar across the top of the slide.
const TITLE_BAR_HEIGHT: f64 = 1.0;

/// Title overlay drawn on the bar.
const TITLE_OVERLAY_TOP: f64 = 0.15;
const TITLE_OVERLAY_HEIGHT: f64 = 0.7;
const TITLE_OVERLAY_SIZE: f64 = 28.0;

/// Native title sizes.
const TITLE_SLIDE_SIZE: f64 = 44.0;
const HEADING_SIZE: f64 = 36.0;

const SUBTITLE_SIZE: f64 = 20.0;
const BODY_SIZE: f64 = 18.0;
const COLUMN_SIZE: f64 = 16.0;
const CODE_TITLE_SIZE: f64 = 14.0;
const CODE_SIZE: f64 = 12.0;
const FOOTER_SIZE: f64 = 10.0;

/// Horizontal page margin and the gutter between columns.
const MARGIN: f64 = 0.5;
const GUTTER: f64 = 0.5;

/// Content starts below the title area and stops above the bottom margin.
const CONTENT_TOP: f64 = 1.5;
const BOTTOM_MARGIN: f64 = 0.5;

const CODE_TITLE_TOP: f64 = 1.45;
const CODE_PANEL_TOP_WITH_TITLE: f64 = 1.9;
/// Space kept free under the code panel for the footer band.
const CODE_PANEL_BOTTOM: f64 = 0.8;
const CODE_PANEL_INSET: f64 = 0.1;
const CODE_PANEL_FILL: Rgb = Rgb::new(0xF5, 0xF5, 0xF5);
const CODE_FONT: &str = "Courier New";

const FOOTER_FROM_BOTTOM: f64 = 0.6;
const FOOTER_HEIGHT: f64 = 0.4;
const FOOTER_TEXT_WIDTH: f64 = 6.0;
const FOOTER_TEXT_WIDTH_WITH_DATE: f64 = 3.25;
const FOOTER_DATE_WIDTH: f64 = 2.5;
const FOOTER_NUMBER_WIDTH: f64 = 1.5;
const FOOTER_NUMBER_FROM_RIGHT: f64 = 2.0;

const LOGO_TOP: f64 = 0.5;
const LOGO_WIDTH: f64 = 1.5;

const COLUMN_BULLET: &str = "\u{2022} ";

/// Fills slides for one deck using its theme engine.
pub struct SlideCompositor<'a> {
    theme: &'a ThemeEngine,
    width: f64,
    height: f64,
}

/// Mutable state of one composition.
struct Pass<'s> {
    slide: &'s mut Slide,
    layout: LayoutType,
    number: usize,
    table: PlaceholderTable,
    /// Shape receiving body paragraphs, chosen on first use.
    body_target: Option<u32>,
    warnings: Vec<String>,
}

impl Pass<'_> {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn set_text(&mut self, id: u32, frame: TextFrame) {
        if let Some(shape) = self.slide.shape_mut(id) {
            shape.text = Some(frame);
        }
    }
}

impl<'a> SlideCompositor<'a> {
    /// Create a compositor for a canvas of the given size.
    pub fn new(theme: &'a ThemeEngine, width: Emu, height: Emu) -> Self {
        Self {
            theme,
            width: width.to_inches(),
            height: height.to_inches(),
        }
    }

    /// Fill `slide` from `spec`. `number` is the 1-based slide index used in
    /// warnings.
    ///
    /// A malformed content payload fails the whole slide before anything is
    /// drawn; every other problem degrades to a returned warning.
    pub fn compose(
        &self,
        slide: &mut Slide,
        spec: &SlideSpecification,
        number: usize,
    ) -> Result<Vec<String>> {
        for item in &spec.content {
            if let ContentBody::Malformed { kind, reason } = &item.body {
                return Err(Error::malformed(kind.as_str(), reason.as_str()));
            }
        }

        let table = PlaceholderTable::build(slide);
        let mut pass = Pass {
            slide,
            layout: spec.layout,
            number,
            table,
            body_target: None,
            warnings: Vec::new(),
        };

        let (positioned_title, positioned_subtitle, body) = split_positions(&spec.content);
        let title = non_empty(spec.title.as_deref()).or(positioned_title);
        let subtitle = non_empty(spec.subtitle.as_deref()).or(positioned_subtitle);

        self.draw_title(&mut pass, title.as_deref());
        if let Some(subtitle) = subtitle.as_deref() {
            self.draw_subtitle(&mut pass, subtitle);
        }

        for item in group_body_content(body) {
            self.draw_item(&mut pass, &item)?;
        }

        pass.slide.notes = non_empty(spec.speaker_notes.as_deref());
        let removed = pass.slide.remove_empty_placeholders();
        debug!(
            "Composed slide {} ({}): {} shapes, {} empty placeholders removed",
            number,
            spec.layout,
            pass.slide.shapes.len(),
            removed
        );
        Ok(pass.warnings)
    }

    fn draw_title(&self, pass: &mut Pass<'_>, title: Option<&str>) {
        if ThemeEngine::should_draw_title_bar(pass.layout) {
            let bar = Rect::inches(0.0, 0.0, self.width, TITLE_BAR_HEIGHT);
            pass.slide.add_rectangle(bar, self.theme.primary());
            if let Some(id) = pass.table.title.take() {
                pass.slide.remove_shape(id);
            }

            if let Some(title) = title {
                let style = RunStyle::new()
                    .font(self.theme.heading_font())
                    .size(TITLE_OVERLAY_SIZE)
                    .bold(true)
                    .color(Rgb::WHITE);
                let frame = TextFrame::new()
                    .anchored(Anchor::Middle)
                    .with_paragraph(Paragraph::plain(title, style));
                pass.slide.add_text_box(
                    Rect::inches(MARGIN, TITLE_OVERLAY_TOP, self.content_width(), TITLE_OVERLAY_HEIGHT),
                    frame,
                );
            }
            return;
        }

        let Some(title) = title else {
            return;
        };
        let size = if pass.layout == LayoutType::Title {
            TITLE_SLIDE_SIZE
        } else {
            HEADING_SIZE
        };
        let style = RunStyle::new()
            .font(self.theme.heading_font())
            .size(size)
            .color(self.theme.foreground_for(pass.layout));
        let frame = TextFrame::new().with_paragraph(Paragraph::plain(title, style));

        match pass.table.title {
            Some(id) => pass.set_text(id, frame),
            None => {
                pass.warn(format!(
                    "Slide {}: layout has no title placeholder, drawing the title as a text box",
                    pass.number
                ));
                pass.slide.add_text_box(
                    Rect::inches(MARGIN, 0.3, self.content_width(), 1.0),
                    frame,
                );
            }
        }
    }

    fn draw_subtitle(&self, pass: &mut Pass<'_>, subtitle: &str) {
        let style = RunStyle::new()
            .font(self.theme.body_font())
            .size(SUBTITLE_SIZE)
            .color(self.theme.foreground_for(pass.layout));
        let frame = TextFrame::new().with_paragraph(Paragraph::plain(subtitle, style));

        match pass.table.subtitle {
            Some(id) => pass.set_text(id, frame),
            None => {
                pass.warn(format!(
                    "Slide {}: layout has no subtitle placeholder, drawing the subtitle as a text box",
                    pass.number
                ));
                let top = if ThemeEngine::should_draw_title_bar(pass.layout) {
                    TITLE_BAR_HEIGHT + 0.05
                } else {
                    1.2
                };
                pass.slide
                    .add_text_box(Rect::inches(MARGIN, top, self.content_width(), 0.45), frame);
            }
        }
    }

    fn draw_item(&self, pass: &mut Pass<'_>, item: &ContentItem) -> Result<()> {
        let style = self.body_style(pass.layout);
        match &item.body {
            ContentBody::Text(text) => {
                let paragraphs = text
                    .lines()
                    .map(|line| Paragraph::plain(line, style.clone()).without_bullet())
                    .collect();
                self.append_body(pass, paragraphs);
            }
            ContentBody::Bullets(bullets) => {
                let paragraphs = bullets
                    .iter()
                    .map(|line| emphasized_paragraph(line, &style, None))
                    .collect();
                self.append_body(pass, paragraphs);
            }
            ContentBody::Image(image) => self.append_description(pass, describe_image(image), &style),
            ContentBody::Table(table) => self.append_description(pass, describe_table(table), &style),
            ContentBody::Chart(chart) => self.append_description(pass, describe_chart(chart), &style),
            ContentBody::Code(code) => self.draw_code(pass, code),
            ContentBody::TwoColumn(columns) => self.draw_columns(pass, columns),
            ContentBody::Missing(kind) => {
                pass.warn(format!(
                    "Slide {}: {} content has no payload, skipped",
                    pass.number, kind
                ));
            }
            ContentBody::Malformed { kind, reason } => {
                return Err(Error::malformed(kind.as_str(), reason.as_str()));
            }
        }
        Ok(())
    }

    fn append_description(&self, pass: &mut Pass<'_>, lines: Vec<String>, style: &RunStyle) {
        let paragraphs = lines
            .into_iter()
            .map(|line| Paragraph::plain(line, style.clone()).without_bullet())
            .collect();
        self.append_body(pass, paragraphs);
    }

    /// Append paragraphs to the body placeholder, or to a text box standing
    /// in for it when the layout has none.
    fn append_body(&self, pass: &mut Pass<'_>, paragraphs: Vec<Paragraph>) {
        let id = match pass.body_target {
            Some(id) => id,
            None => {
                let id = match pass.table.body {
                    Some(id) => id,
                    None => {
                        pass.warn(format!(
                            "Slide {}: layout has no body placeholder, drawing content as a text box",
                            pass.number
                        ));
                        pass.slide.add_text_box(self.content_rect(), TextFrame::new())
                    }
                };
                pass.body_target = Some(id);
                id
            }
        };

        if let Some(shape) = pass.slide.shape_mut(id) {
            shape
                .text
                .get_or_insert_with(TextFrame::new)
                .paragraphs
                .extend(paragraphs);
        }
    }

    /// Two text boxes side by side, split evenly with a gutter.
    fn draw_columns(&self, pass: &mut Pass<'_>, columns: &TwoColumnSpec) {
        let width = (self.width - 2.0 * MARGIN - GUTTER) / 2.0;
        let height = self.height - CONTENT_TOP - BOTTOM_MARGIN;
        let style = self.body_style(pass.layout).size(COLUMN_SIZE);

        for (i, lines) in [&columns.left, &columns.right].into_iter().enumerate() {
            if lines.is_empty() {
                continue;
            }
            let left = MARGIN + i as f64 * (width + GUTTER);
            let frame = lines.iter().fold(TextFrame::new(), |frame, line| {
                frame.with_paragraph(emphasized_paragraph(line, &style, Some(COLUMN_BULLET)))
            });
            pass.slide
                .add_text_box(Rect::inches(left, CONTENT_TOP, width, height), frame);
        }
    }

    /// A light panel with monospaced code and an optional title line.
    fn draw_code(&self, pass: &mut Pass<'_>, code: &CodeSpec) {
        let text_color = self.theme.text();
        let mut top = CONTENT_TOP;

        if let Some(title) = non_empty(code.title.as_deref()) {
            let style = RunStyle::new()
                .font(self.theme.body_font())
                .size(CODE_TITLE_SIZE)
                .bold(true)
                .color(text_color);
            pass.slide.add_text_box(
                Rect::inches(MARGIN, CODE_TITLE_TOP, self.content_width(), 0.4),
                TextFrame::new().with_paragraph(Paragraph::plain(title, style)),
            );
            top = CODE_PANEL_TOP_WITH_TITLE;
        }

        let height = (self.height - top - CODE_PANEL_BOTTOM).max(0.5);
        pass.slide.add_rectangle(
            Rect::inches(MARGIN, top, self.content_width(), height),
            CODE_PANEL_FILL,
        );

        let style = RunStyle::new().font(CODE_FONT).size(CODE_SIZE).color(text_color);
        let frame = code.code.lines().fold(
            TextFrame::new().anchored(Anchor::Top),
            |frame, line| frame.with_paragraph(Paragraph::plain(line, style.clone())),
        );
        pass.slide.add_text_box(
            Rect::inches(
                MARGIN + CODE_PANEL_INSET,
                top + CODE_PANEL_INSET,
                self.content_width() - 2.0 * CODE_PANEL_INSET,
                height - 2.0 * CODE_PANEL_INSET,
            ),
            frame,
        );
    }

    /// Footer text on the left, optional date in the middle and slide number
    /// on the right.
    pub fn draw_footer(
        &self,
        slide: &mut Slide,
        layout: LayoutType,
        footer: &FooterSpec,
        fallback_text: &str,
        slide_number: usize,
        date: &str,
    ) {
        let top = self.height - FOOTER_FROM_BOTTOM;
        let style = RunStyle::new()
            .font(self.theme.body_font())
            .size(FOOTER_SIZE)
            .color(self.theme.foreground_for(layout));

        let text = non_empty(footer.text.as_deref()).unwrap_or_else(|| fallback_text.to_string());
        let text_width = if footer.show_date {
            FOOTER_TEXT_WIDTH_WITH_DATE
        } else {
            FOOTER_TEXT_WIDTH
        };
        slide.add_text_box(
            Rect::inches(MARGIN, top, text_width, FOOTER_HEIGHT),
            footer_frame(text, &style, Alignment::Left),
        );

        if footer.show_date {
            slide.add_text_box(
                Rect::inches((self.width - FOOTER_DATE_WIDTH) / 2.0, top, FOOTER_DATE_WIDTH, FOOTER_HEIGHT),
                footer_frame(date.to_string(), &style, Alignment::Center),
            );
        }

        if footer.show_slide_numbers {
            slide.add_text_box(
                Rect::inches(
                    self.width - FOOTER_NUMBER_FROM_RIGHT,
                    top,
                    FOOTER_NUMBER_WIDTH,
                    FOOTER_HEIGHT,
                ),
                footer_frame(slide_number.to_string(), &style, Alignment::Right),
            );
        }
    }

    /// Stamp the logo in the top-right corner. Height follows the logo's
    /// aspect ratio when known, otherwise the logo is drawn square.
    pub fn place_logo(&self, slide: &mut Slide, logo: &LogoSpec, path: &Path) {
        let height = match (logo.width, logo.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => LOGO_WIDTH * f64::from(h) / f64::from(w),
            _ => LOGO_WIDTH,
        };
        slide.add_picture(
            Rect::inches(self.width - LOGO_WIDTH, LOGO_TOP, LOGO_WIDTH, height),
            PictureData {
                path: path.to_path_buf(),
                description: logo.alt_text.clone().unwrap_or_else(|| "Logo".to_string()),
            },
        );
    }

    fn body_style(&self, layout: LayoutType) -> RunStyle {
        RunStyle::new()
            .font(self.theme.body_font())
            .size(BODY_SIZE)
            .color(self.theme.foreground_for(layout))
    }

    fn content_width(&self) -> f64 {
        self.width - 2.0 * MARGIN
    }

    fn content_rect(&self) -> Rect {
        Rect::inches(
            MARGIN,
            CONTENT_TOP,
            self.content_width(),
            self.height - CONTENT_TOP - BOTTOM_MARGIN,
        )
    }
}

/// Pull title- and subtitle-positioned text out of the content list. The
/// first of each wins; later duplicates are dropped. Everything else is body.
fn split_positions(items: &[ContentItem]) -> (Option<String>, Option<String>, Vec<ContentItem>) {
    let mut title = None;
    let mut subtitle = None;
    let mut body = Vec::with_capacity(items.len());

    for item in items {
        let slot = match item.position {
            ContentPosition::Title => &mut title,
            ContentPosition::Subtitle => &mut subtitle,
            ContentPosition::Body => {
                body.push(item.clone());
                continue;
            }
        };
        match item_text(&item.body) {
            Some(text) => {
                if slot.is_none() {
                    *slot = Some(text);
                }
            }
            None => body.push(item.clone()),
        }
    }

    (title, subtitle, body)
}

fn item_text(body: &ContentBody) -> Option<String> {
    match body {
        ContentBody::Text(text) => non_empty(Some(text.as_str())),
        ContentBody::Bullets(bullets) => non_empty(Some(bullets.join(" ").as_str())),
        _ => None,
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// A line with its bold lead-in (if any), optionally behind a bullet glyph.
fn emphasized_paragraph(line: &str, style: &RunStyle, glyph: Option<&str>) -> Paragraph {
    let mut paragraph = Paragraph::default();
    if let Some(glyph) = glyph {
        paragraph = paragraph.with_run(TextRun::new(glyph, style.clone()));
    }

    match split_for_bold(line) {
        Some(split) => {
            paragraph = paragraph.with_run(TextRun::new(split.bold, style.clone().bold(true)));
            if !split.plain.is_empty() {
                paragraph = paragraph.with_run(TextRun::new(split.plain, style.clone()));
            }
            paragraph
        }
        None => paragraph.with_run(TextRun::new(line, style.clone())),
    }
}

fn footer_frame(text: String, style: &RunStyle, alignment: Alignment) -> TextFrame {
    TextFrame::new()
        .anchored(Anchor::Middle)
        .with_paragraph(Paragraph::plain(text, style.clone()).aligned(alignment))
}

fn describe_image(image: &ImageSpec) -> Vec<String> {
    let mut lines = vec![format!("[IMAGE: {}]", image.url)];
    if let Some(alt) = non_empty(image.alt_text.as_deref()) {
        lines.push(format!("Alt text: {}", alt));
    }
    if let Some(caption) = non_empty(image.caption.as_deref()) {
        lines.push(format!("Caption: {}", caption));
    }
    lines
}

fn describe_table(table: &TableSpec) -> Vec<String> {
    vec![
        "[TABLE]".to_string(),
        format!("Headers: {}", table.headers.join(", ")),
        format!("Rows: {} rows of data", table.rows.len()),
    ]
}

fn describe_chart(chart: &ChartSpec) -> Vec<String> {
    let mut lines = vec![format!("[CHART: {}]", chart.chart_type)];
    if let Some(title) = non_empty(chart.title.as_deref()) {
        lines.push(format!("Title: {}", title));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::document::{Shape, ShapeKind};
    use deck_core::theme::{ColorPalette, FontPalette};
    use deck_core::types::ContentKind;
    use deck_core::{SlideDocument, ThemePalette};

    fn engine() -> ThemeEngine {
        ThemeEngine::new(Some(ThemePalette {
            colors: ColorPalette {
                primary: "#E3342F".into(),
                secondary: "#FFE9D3".into(),
                accent: "#1CCBD0".into(),
                background: "#FFFFFF".into(),
                text: "#111827".into(),
            },
            fonts: FontPalette {
                heading: "Calibri".into(),
                body: "Tahoma".into(),
                heading_web: None,
                body_web: None,
            },
            logo: None,
            source_url: None,
        }))
    }

    /// Compose a spec on the default catalogue using the conventional layout.
    fn compose(spec: &SlideSpecification) -> (Slide, Result<Vec<String>>) {
        let doc = SlideDocument::new_default();
        let index = crate::LayoutResolver::resolve(&doc.layouts, spec.layout)
            .index
            .unwrap();
        let mut slide = doc.new_slide(index).unwrap();
        let theme = engine();
        let compositor = SlideCompositor::new(&theme, doc.width, doc.height);
        let result = compositor.compose(&mut slide, spec, 3);
        (slide, result)
    }

    fn text_boxes(slide: &Slide) -> Vec<&Shape> {
        slide
            .shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::TextBox)
            .collect()
    }

    const PRIMARY: Rgb = Rgb::new(0xE3, 0x34, 0x2F);
    const TEXT: Rgb = Rgb::new(0x11, 0x18, 0x27);

    #[test]
    fn test_title_bar_overlay_replaces_native_title() {
        let spec = SlideSpecification::new(LayoutType::TitleContent)
            .with_title("Agenda")
            .with_content(ContentItem::bullets(["Goal: Win", "Ship it"]));
        let (slide, result) = compose(&spec);
        assert!(result.unwrap().is_empty());

        let bar = &slide.shapes.iter().find(|s| s.kind == ShapeKind::Rectangle).unwrap();
        assert_eq!(bar.fill, Some(PRIMARY));
        assert_eq!(bar.frame, Rect::inches(0.0, 0.0, 10.0, 1.0));

        assert!(slide.placeholders().all(|s| !s.placeholder().unwrap().1.is_title()));
        let overlay = text_boxes(&slide)[0];
        let run = &overlay.text.as_ref().unwrap().paragraphs[0].runs[0];
        assert_eq!(run.text, "Agenda");
        assert!(run.style.bold);
        assert_eq!(run.style.size_pt, Some(28.0));
        assert_eq!(run.style.color, Some(Rgb::WHITE));
    }

    #[test]
    fn test_bullets_get_bold_lead_in() {
        let spec = SlideSpecification::new(LayoutType::TitleContent)
            .with_content(ContentItem::bullets(["Goal: Achieve success", "Plain line"]));
        let (slide, _) = compose(&spec);

        let body = slide.placeholders().next().unwrap();
        let paragraphs = &body.text.as_ref().unwrap().paragraphs;
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].runs.len(), 2);
        assert_eq!(paragraphs[0].runs[0].text, "Goal: ");
        assert!(paragraphs[0].runs[0].style.bold);
        assert_eq!(paragraphs[0].runs[1].text, "Achieve success");
        assert!(!paragraphs[0].runs[1].style.bold);
        assert_eq!(paragraphs[1].runs.len(), 1);
        assert_eq!(paragraphs[0].runs[0].style.font.as_deref(), Some("Tahoma"));
        assert_eq!(paragraphs[0].runs[0].style.color, Some(TEXT));
    }

    #[test]
    fn test_loose_text_items_become_bullets() {
        let spec = SlideSpecification::new(LayoutType::TitleContent)
            .with_content(ContentItem::text("a"))
            .with_content(ContentItem::text("b"));
        let (slide, _) = compose(&spec);

        let body = slide.placeholders().next().unwrap();
        let paragraphs = &body.text.as_ref().unwrap().paragraphs;
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs.iter().all(|p| !p.no_bullet));
    }

    #[test]
    fn test_section_title_uses_native_placeholder() {
        let spec = SlideSpecification::new(LayoutType::Section).with_title("Part Two");
        let (slide, _) = compose(&spec);

        assert!(slide.shapes.iter().all(|s| s.kind != ShapeKind::Rectangle));
        let title = slide.placeholders().next().unwrap();
        let run = &title.text.as_ref().unwrap().paragraphs[0].runs[0];
        assert_eq!(run.text, "Part Two");
        assert_eq!(run.style.size_pt, Some(36.0));
        assert_eq!(run.style.color, Some(Rgb::WHITE));
        assert_eq!(run.style.font.as_deref(), Some("Calibri"));
        // The empty body placeholder is dropped.
        assert_eq!(slide.placeholders().count(), 1);
    }

    #[test]
    fn test_code_title_uses_text_color() {
        let spec = SlideSpecification::new(LayoutType::Code).with_title("Listing");
        let (slide, _) = compose(&spec);

        let title = slide.placeholders().next().unwrap();
        let run = &title.text.as_ref().unwrap().paragraphs[0].runs[0];
        assert_eq!(run.text, "Listing");
        assert_eq!(run.style.color, Some(TEXT));
    }

    #[test]
    fn test_title_slide_with_positioned_subtitle() {
        let spec = SlideSpecification::new(LayoutType::Title)
            .with_title("Launch")
            .with_content(ContentItem::text("Q3 review").with_position(ContentPosition::Subtitle))
            .with_content(ContentItem::text("ignored").with_position(ContentPosition::Subtitle));
        let (slide, result) = compose(&spec);
        assert!(result.unwrap().is_empty());

        let texts: Vec<String> = slide.placeholders().map(Shape::text).collect();
        assert_eq!(texts, vec!["Launch", "Q3 review"]);
        let title_run = &slide.shapes[0].text.as_ref().unwrap().paragraphs[0].runs[0];
        assert_eq!(title_run.style.size_pt, Some(44.0));
    }

    #[test]
    fn test_title_falls_back_to_positioned_item() {
        let spec = SlideSpecification::new(LayoutType::Section)
            .with_content(ContentItem::text("From content").with_position(ContentPosition::Title));
        let (slide, _) = compose(&spec);
        assert_eq!(slide.placeholders().next().unwrap().text(), "From content");
    }

    #[test]
    fn test_two_columns_are_text_boxes() {
        let spec = SlideSpecification::new(LayoutType::TwoCol).with_content(ContentItem::new(
            ContentBody::TwoColumn(TwoColumnSpec {
                left: vec!["Pros: fast".into()],
                right: vec!["Cons: none".into(), "More".into()],
            }),
        ));
        let (slide, _) = compose(&spec);

        let columns = text_boxes(&slide);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].frame, Rect::inches(0.5, 1.5, 4.25, 5.5));
        assert_eq!(columns[1].frame, Rect::inches(5.25, 1.5, 4.25, 5.5));

        let first = &columns[0].text.as_ref().unwrap().paragraphs[0];
        assert_eq!(first.runs[0].text, "\u{2022} ");
        assert_eq!(first.runs[1].text, "Pros: ");
        assert!(first.runs[1].style.bold);
        assert_eq!(columns[1].text(), "\u{2022} Cons: none\n\u{2022} More");
        // Native two-content placeholders received nothing and are gone.
        assert_eq!(slide.placeholders().count(), 0);
    }

    #[test]
    fn test_code_panel() {
        let spec = SlideSpecification::new(LayoutType::Code)
            .with_title("Example")
            .with_content(ContentItem::new(ContentBody::Code(CodeSpec {
                code: "fn main() {}\n".into(),
                language: Some("rust".into()),
                title: Some("main.rs".into()),
            })));
        let (slide, _) = compose(&spec);

        let panel = slide.shapes.iter().find(|s| s.kind == ShapeKind::Rectangle).unwrap();
        assert_eq!(panel.fill, Some(CODE_PANEL_FILL));
        assert_eq!(panel.frame.y, Emu::inches(1.9));

        let boxes = text_boxes(&slide);
        assert_eq!(boxes[0].text(), "main.rs");
        let code = boxes[1].text.as_ref().unwrap();
        assert_eq!(code.paragraphs.len(), 1);
        assert_eq!(code.paragraphs[0].runs[0].style.font.as_deref(), Some("Courier New"));
        assert_eq!(code.paragraphs[0].runs[0].style.size_pt, Some(12.0));
    }

    #[test]
    fn test_code_lines_drop_carriage_returns() {
        let spec = SlideSpecification::new(LayoutType::Code).with_content(ContentItem::new(
            ContentBody::Code(CodeSpec {
                code: "a = 1\r\nb = 2\r\n\r\nc = 3".into(),
                language: None,
                title: None,
            }),
        ));
        let (slide, _) = compose(&spec);

        let code = text_boxes(&slide)[0].text.as_ref().unwrap();
        let lines: Vec<String> = code.paragraphs.iter().map(Paragraph::text).collect();
        assert_eq!(lines, vec!["a = 1", "b = 2", "", "c = 3"]);
    }

    #[test]
    fn test_media_kinds_render_as_descriptions() {
        let spec = SlideSpecification::new(LayoutType::Table)
            .with_content(ContentItem::new(ContentBody::Table(TableSpec {
                headers: vec!["a".into(), "b".into()],
                rows: vec![vec!["1".into(), "2".into()]; 3],
                style: None,
            })))
            .with_content(ContentItem::new(ContentBody::Image(ImageSpec {
                url: "https://example.com/x.png".into(),
                alt_text: Some("Chart".into()),
                caption: None,
                width: None,
                height: None,
            })));
        let (slide, _) = compose(&spec);

        let body = slide.placeholders().next().unwrap();
        assert_eq!(
            body.text(),
            "[TABLE]\nHeaders: a, b\nRows: 3 rows of data\n[IMAGE: https://example.com/x.png]\nAlt text: Chart"
        );
    }

    #[test]
    fn test_missing_payload_is_a_warning() {
        let spec = SlideSpecification::new(LayoutType::ImageFocus)
            .with_content(ContentItem::new(ContentBody::Missing(ContentKind::Image)));
        let (_, result) = compose(&spec);
        let warnings = result.unwrap();
        assert_eq!(warnings, vec!["Slide 3: image content has no payload, skipped"]);
    }

    #[test]
    fn test_malformed_payload_fails_the_slide() {
        let spec = SlideSpecification::new(LayoutType::Chart).with_content(ContentItem::new(
            ContentBody::Malformed {
                kind: ContentKind::Chart,
                reason: "expected an object".into(),
            },
        ));
        let (slide, result) = compose(&spec);
        assert!(matches!(result, Err(Error::MalformedContent { .. })));
        // Nothing was drawn before the failure.
        assert!(slide.shapes.iter().all(|s| s.placeholder().is_some()));
    }

    #[test]
    fn test_blank_layout_synthesizes_text_boxes() {
        let spec = SlideSpecification::new(LayoutType::Blank)
            .with_title("Loose")
            .with_content(ContentItem::text("body"));
        let (slide, result) = compose(&spec);
        let warnings = result.unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("no title placeholder"));
        assert!(warnings[1].contains("no body placeholder"));
        assert_eq!(text_boxes(&slide).len(), 2);
    }

    #[test]
    fn test_speaker_notes_are_kept() {
        let mut spec = SlideSpecification::new(LayoutType::TitleContent).with_title("Notes");
        spec.speaker_notes = Some("Say hello".into());
        let (slide, _) = compose(&spec);
        assert_eq!(slide.notes.as_deref(), Some("Say hello"));
    }

    #[test]
    fn test_footer_boxes() {
        let doc = SlideDocument::new_default();
        let mut slide = doc.new_slide(6).unwrap();
        let theme = engine();
        let compositor = SlideCompositor::new(&theme, doc.width, doc.height);
        let footer = FooterSpec {
            text: None,
            show_slide_numbers: true,
            show_date: true,
        };
        compositor.draw_footer(&mut slide, LayoutType::Blank, &footer, "Generated", 4, "2026-10-16");

        let texts: Vec<String> = slide.shapes.iter().map(Shape::text).collect();
        assert_eq!(texts, vec!["Generated", "2026-10-16", "4"]);
        assert_eq!(slide.shapes[2].frame.x, Emu::inches(8.0));
        assert_eq!(slide.shapes[0].frame.y, Emu::inches(6.9));
        assert_eq!(
            slide.shapes[2].text.as_ref().unwrap().paragraphs[0].alignment,
            Some(Alignment::Right)
        );
    }

    #[test]
    fn test_logo_keeps_aspect_ratio() {
        let doc = SlideDocument::new_default();
        let mut slide = doc.new_slide(6).unwrap();
        let theme = engine();
        let compositor = SlideCompositor::new(&theme, doc.width, doc.height);
        let logo = LogoSpec {
            url: "https://example.com/logo.png".into(),
            cached_path: None,
            width: Some(200),
            height: Some(100),
            alt_text: None,
        };
        compositor.place_logo(&mut slide, &logo, Path::new("logo.png"));

        let picture = &slide.shapes[0];
        assert_eq!(picture.frame, Rect::inches(8.5, 0.5, 1.5, 0.75));
        assert!(matches!(&picture.kind, ShapeKind::Picture(p) if p.description == "Logo"));
    }
}
