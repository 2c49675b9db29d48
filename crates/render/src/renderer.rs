//! Deck generation entry point.
//!
//! A request runs strictly in order: normalize, load the destination
//! document, then per slide resolve the layout, compose content, paint the
//! background and stamp logo and footer, and finally write the file.
//! Failures inside one slide skip that slide; failures outside the slide
//! loop turn the whole request into a failure envelope.

use crate::compositor::SlideCompositor;
use crate::config::{load_palette, RendererConfig};
use crate::layout::LayoutResolver;
use crate::output::OutputAssembler;
use chrono::Local;
use deck_core::document::DocumentProperties;
use deck_core::format::split_into_chunks;
use deck_core::theme::LogoSpec;
use deck_core::types::CodeSpec;
use deck_core::{
    ContentBody, ContentItem, DeckSpecification, Error, NormalizedDeck, RenderResult, Result,
    SlideDocument, SlideSpecification, SpecNormalizer, ThemeEngine, ThemePalette,
};
use deck_pptx::{PptxWriter, TemplateReader};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Template file extensions picked up by [`Renderer::list_templates`].
const TEMPLATE_EXTENSIONS: [&str; 2] = ["pptx", "potx"];

/// A template available to decks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    /// File path; `None` for the built-in template.
    pub path: Option<String>,
    /// Layout names in catalogue order.
    pub layouts: Vec<String>,
    pub description: String,
}

/// Turns deck specifications into PPTX files.
pub struct Renderer {
    config: RendererConfig,
    default_palette: Option<ThemePalette>,
    normalizer: SpecNormalizer,
}

impl Renderer {
    /// Create a renderer; the default palette is loaded once here.
    pub fn new(config: RendererConfig) -> Self {
        let default_palette = match load_palette(&config.default_theme_path) {
            Ok(palette) => {
                debug!("Loaded default palette from {}", config.default_theme_path.display());
                Some(palette)
            }
            Err(e) => {
                warn!(
                    "Default palette {} unavailable, falling back to black and white: {}",
                    config.default_theme_path.display(),
                    e
                );
                None
            }
        };

        Self {
            config,
            default_palette,
            normalizer: SpecNormalizer::new(),
        }
    }

    /// Use a differently configured normalizer for raw input.
    pub fn with_normalizer(mut self, normalizer: SpecNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The palette used when a deck brings none.
    pub fn default_palette(&self) -> Option<&ThemePalette> {
        self.default_palette.as_ref()
    }

    /// Normalize raw JSON and render it. Structural errors come back as a
    /// failure envelope before anything is rendered.
    pub fn generate_value(&self, value: &Value) -> RenderResult {
        match self.normalizer.normalize_deck(value) {
            Ok(NormalizedDeck { deck, warnings }) => self.render(&deck, warnings),
            Err(e) => OutputAssembler::failure(e.to_string(), Vec::new()),
        }
    }

    /// Render an already canonical deck.
    pub fn generate(&self, deck: &DeckSpecification) -> RenderResult {
        if deck.title.trim().is_empty() {
            return OutputAssembler::failure(Error::invalid_spec("title is required").to_string(), Vec::new());
        }
        if deck.slides.is_empty() {
            return OutputAssembler::failure(
                Error::invalid_spec("slides must contain at least one slide").to_string(),
                Vec::new(),
            );
        }
        self.render(deck, Vec::new())
    }

    fn render(&self, deck: &DeckSpecification, mut warnings: Vec<String>) -> RenderResult {
        match self.try_render(deck, &mut warnings) {
            Ok((path, slides_generated)) => OutputAssembler::success(&path, slides_generated, warnings),
            Err(e) => OutputAssembler::failure(e.to_string(), warnings),
        }
    }

    fn try_render(&self, deck: &DeckSpecification, warnings: &mut Vec<String>) -> Result<(PathBuf, usize)> {
        let mut document = self.load_document(deck.theme.template.as_deref(), warnings);

        // One engine per request keeps the section rotation deck-scoped.
        let palette = deck
            .theme
            .palette
            .clone()
            .or_else(|| self.default_palette.clone());
        let mut theme = ThemeEngine::new(palette);
        document.theme = theme.document_theme();
        document.properties = DocumentProperties {
            title: Some(deck.title.clone()),
            author: deck.author.clone(),
        };

        let logo = resolve_logo(theme.palette(), warnings);
        let now = Local::now();
        let date = now.format("%Y-%m-%d").to_string();
        let (width, height) = (document.width, document.height);

        for (number, spec) in expand_code_slides(&deck.slides, self.config.max_code_lines_per_slide) {
            let resolution = LayoutResolver::resolve(&document.layouts, spec.layout);
            if let Some(message) = resolution.warning {
                warn!("Slide {}: {}", number, message);
                warnings.push(message);
            }
            let Some(mut slide) = resolution.index.and_then(|index| document.new_slide(index)) else {
                let message = format!(
                    "Failed to generate slide {}: {}",
                    number,
                    Error::LayoutUnavailable("the document has no slide layouts".to_string())
                );
                error!("{}", message);
                warnings.push(message);
                continue;
            };

            let composed = SlideCompositor::new(&theme, width, height).compose(&mut slide, &spec, number);
            match composed {
                Ok(slide_warnings) => warnings.extend(slide_warnings),
                Err(e) => {
                    let message = format!("Failed to generate slide {}: {}", number, e);
                    error!("{}", message);
                    warnings.push(message);
                    continue;
                }
            }

            // Painted only once the slide is kept, so skipped slides do not
            // advance the section rotation.
            slide.background = Some(theme.background_for(spec.layout));

            let compositor = SlideCompositor::new(&theme, width, height);
            if let Some((logo, path)) = &logo {
                compositor.place_logo(&mut slide, logo, path);
            }
            if let Some(footer) = &deck.footer {
                compositor.draw_footer(
                    &mut slide,
                    spec.layout,
                    footer,
                    &self.config.footer_fallback_text,
                    document.slides.len() + 1,
                    &date,
                );
            }

            debug!(
                "Generated slide {} on layout '{}'",
                number, document.layouts[slide.layout_index].name
            );
            document.push_slide(slide);
        }

        let path = OutputAssembler::output_path(
            deck,
            &self.config.default_output_dir,
            now.naive_local(),
            warnings,
        );
        OutputAssembler::prepare_directory(&path)?;
        PptxWriter::new().save(&document, &path)?;
        Ok((path, document.slides.len()))
    }

    /// The destination document: the requested template when it can be
    /// read, otherwise the built-in default with a warning.
    fn load_document(&self, template: Option<&Path>, warnings: &mut Vec<String>) -> SlideDocument {
        let Some(template) = template else {
            info!("Using the built-in default template");
            return SlideDocument::new_default();
        };

        let found = if template.is_file() {
            Some(template.to_path_buf())
        } else if template.is_relative() {
            Some(self.config.templates_dir.join(template)).filter(|p| p.is_file())
        } else {
            None
        };

        let message = match found {
            Some(path) => match TemplateReader::new().read_path(&path) {
                Ok(document) => return document,
                Err(e) => format!(
                    "Template {} could not be read ({}), using default",
                    template.display(),
                    e
                ),
            },
            None => format!("Template {} not found, using default", template.display()),
        };
        warn!("{}", message);
        warnings.push(message);
        SlideDocument::new_default()
    }

    /// The built-in template followed by every readable template file in
    /// the templates directory.
    pub fn list_templates(&self) -> Vec<TemplateInfo> {
        let mut templates = vec![TemplateInfo {
            name: "default".to_string(),
            path: None,
            layouts: LayoutResolver::available_layouts(&SlideDocument::new_default().layouts),
            description: "Built-in default template".to_string(),
        }];

        let entries = match fs::read_dir(&self.config.templates_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "No templates directory at {}: {}",
                    self.config.templates_dir.display(),
                    e
                );
                return templates;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_template_file(path))
            .collect();
        paths.sort();

        for path in paths {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            match TemplateReader::new().read_path(&path) {
                Ok(document) => templates.push(TemplateInfo {
                    description: format!("Custom template: {}", name),
                    name,
                    path: Some(path.display().to_string()),
                    layouts: LayoutResolver::available_layouts(&document.layouts),
                }),
                Err(e) => warn!("Skipping template {}: {}", path.display(), e),
            }
        }

        templates
    }
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEMPLATE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// The logo to stamp on every slide, if its local file exists. A logo that
/// cannot be used is reported once per deck.
fn resolve_logo(palette: Option<&ThemePalette>, warnings: &mut Vec<String>) -> Option<(LogoSpec, PathBuf)> {
    let logo = palette?.logo.as_ref()?;
    let message = match &logo.cached_path {
        Some(path) if path.is_file() => return Some((logo.clone(), path.clone())),
        Some(path) => format!("Logo file {} not found, skipping logo", path.display()),
        None => format!("Logo {} has no local copy, skipping logo", logo.url),
    };
    warn!("{}", message);
    warnings.push(message);
    None
}

/// Pair every slide with its 1-based number, splitting slides whose code
/// exceeds `max_lines` into one slide per chunk titled "(Part i/N)".
///
/// Every oversized code item is split, and the parts follow the items'
/// order on the slide. The first part keeps the slide's other content and
/// notes in place of the first oversized item; later oversized items only
/// appear in their own parts.
pub(crate) fn expand_code_slides(
    slides: &[SlideSpecification],
    max_lines: usize,
) -> Vec<(usize, SlideSpecification)> {
    let mut expanded = Vec::with_capacity(slides.len());

    for (i, spec) in slides.iter().enumerate() {
        let number = i + 1;
        let oversized: Vec<usize> = spec
            .content
            .iter()
            .enumerate()
            .filter(|(_, item)| match &item.body {
                ContentBody::Code(code) => split_into_chunks(&code.code, max_lines).len() > 1,
                _ => false,
            })
            .map(|(idx, _)| idx)
            .collect();

        let Some(&first_index) = oversized.first() else {
            expanded.push((number, spec.clone()));
            continue;
        };

        let chunk_items: Vec<ContentItem> = oversized
            .iter()
            .flat_map(|&idx| code_chunk_items(&spec.content[idx], max_lines))
            .collect();
        let total = chunk_items.len();
        debug!(
            "Slide {}: {} code blocks split across {} slides",
            number,
            oversized.len(),
            total
        );
        let base_title = spec
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        for (part, item) in chunk_items.into_iter().enumerate() {
            let mut part_spec = if part == 0 {
                let mut first = spec.clone();
                let mut item = Some(item);
                first.content = Vec::with_capacity(spec.content.len());
                for (idx, original) in spec.content.iter().enumerate() {
                    if idx == first_index {
                        first.content.extend(item.take());
                    } else if !oversized.contains(&idx) {
                        first.content.push(original.clone());
                    }
                }
                first
            } else {
                let mut next = SlideSpecification::new(spec.layout);
                next.content.push(item);
                next
            };
            let suffix = format!("(Part {}/{})", part + 1, total);
            part_spec.title = Some(match base_title {
                Some(title) => format!("{} {}", title, suffix),
                None => suffix,
            });
            expanded.push((number, part_spec));
        }
    }

    expanded
}

/// One code item per chunk of `item`'s code, keeping its language and title.
fn code_chunk_items(item: &ContentItem, max_lines: usize) -> Vec<ContentItem> {
    let ContentBody::Code(code) = &item.body else {
        return vec![item.clone()];
    };
    split_into_chunks(&code.code, max_lines)
        .into_iter()
        .map(|chunk| ContentItem {
            position: item.position,
            body: ContentBody::Code(CodeSpec {
                code: chunk,
                language: code.language.clone(),
                title: code.title.clone(),
            }),
        })
        .collect()
}
