//! Output path derivation and the result envelope.

use chrono::NaiveDateTime;
use deck_core::{DeckSpecification, RenderResult, Result};
use log::{error, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Anything other than word characters, spaces and hyphens.
static SLUG_STRIP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w -]").unwrap());

/// The only format the writer produces.
const SUPPORTED_FORMAT: &str = "pptx";

const FALLBACK_SLUG: &str = "presentation";

/// Builds the output path and the final [`RenderResult`].
pub struct OutputAssembler;

impl OutputAssembler {
    /// Filesystem-safe, lower-case stem derived from a deck title.
    pub fn slugify(title: &str) -> String {
        let slug = SLUG_STRIP_REGEX
            .replace_all(title, "")
            .trim_end()
            .replace(' ', "_")
            .to_lowercase();
        if slug.trim_matches('_').is_empty() {
            FALLBACK_SLUG.to_string()
        } else {
            slug
        }
    }

    /// Where the deck is written.
    ///
    /// An explicit filename is used verbatim; otherwise the name is the
    /// title slug plus a `_YYYYmmdd_HHMMSS` timestamp and the format
    /// extension. Unsupported formats add a warning and fall back to PPTX.
    pub fn output_path(
        deck: &DeckSpecification,
        default_dir: &Path,
        now: NaiveDateTime,
        warnings: &mut Vec<String>,
    ) -> PathBuf {
        let dir = deck
            .output
            .directory
            .clone()
            .unwrap_or_else(|| default_dir.to_path_buf());

        let format = deck.output.format.trim().to_lowercase();
        let extension = if format == SUPPORTED_FORMAT {
            SUPPORTED_FORMAT
        } else {
            let message = format!(
                "Output format '{}' is not supported, writing {}",
                deck.output.format, SUPPORTED_FORMAT
            );
            warn!("{}", message);
            warnings.push(message);
            SUPPORTED_FORMAT
        };

        let filename = match deck.output.filename.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!(
                "{}_{}.{}",
                Self::slugify(&deck.title),
                now.format("%Y%m%d_%H%M%S"),
                extension
            ),
        };

        dir.join(filename)
    }

    /// Create the parent directory of `path` if needed.
    pub fn prepare_directory(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn success(path: &Path, slides_generated: usize, warnings: Vec<String>) -> RenderResult {
        info!(
            "Generated {} slides at {} ({} warnings)",
            slides_generated,
            path.display(),
            warnings.len()
        );
        RenderResult::success(path.display().to_string(), slides_generated, warnings)
    }

    pub fn failure(message: impl Into<String>, warnings: Vec<String>) -> RenderResult {
        let message = message.into();
        error!("Deck generation failed: {}", message);
        RenderResult::failure(message, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use deck_core::{LayoutType, SlideSpecification};

    fn deck(title: &str) -> DeckSpecification {
        DeckSpecification {
            title: title.to_string(),
            subtitle: None,
            author: None,
            theme: Default::default(),
            slides: vec![SlideSpecification::new(LayoutType::Title)],
            output: Default::default(),
            footer: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(9, 5, 7))
            .unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(OutputAssembler::slugify("Q3 Review: Sales & Ops!"), "q3_review_sales__ops");
        assert_eq!(OutputAssembler::slugify("my-deck_v2  "), "my-deck_v2");
        assert_eq!(OutputAssembler::slugify("!!!"), "presentation");
    }

    #[test]
    fn test_derived_path() {
        let mut warnings = Vec::new();
        let path = OutputAssembler::output_path(&deck("Hello World"), Path::new("out"), now(), &mut warnings);
        assert_eq!(path, PathBuf::from("out/hello_world_20261016_090507.pptx"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_explicit_filename_and_directory() {
        let mut spec = deck("Ignored");
        spec.output.filename = Some("Final Deck.pptx".into());
        spec.output.directory = Some(PathBuf::from("/tmp/decks"));
        let mut warnings = Vec::new();
        let path = OutputAssembler::output_path(&spec, Path::new("out"), now(), &mut warnings);
        assert_eq!(path, PathBuf::from("/tmp/decks/Final Deck.pptx"));
    }

    #[test]
    fn test_unsupported_format_warns() {
        let mut spec = deck("Deck");
        spec.output.format = "pdf".into();
        let mut warnings = Vec::new();
        let path = OutputAssembler::output_path(&spec, Path::new("out"), now(), &mut warnings);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pptx"));
        assert_eq!(warnings, vec!["Output format 'pdf' is not supported, writing pptx"]);
    }

    #[test]
    fn test_prepare_directory_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/deck.pptx");
        OutputAssembler::prepare_directory(&path).unwrap();
        assert!(dir.path().join("a/b").is_dir());
        OutputAssembler::prepare_directory(Path::new("deck.pptx")).unwrap();
    }

    #[test]
    fn test_envelopes() {
        let ok = OutputAssembler::success(Path::new("out/x.pptx"), 3, vec!["w".into()]);
        assert!(ok.ok);
        assert_eq!(ok.output.as_deref(), Some("out/x.pptx"));
        assert_eq!(ok.slides_generated, 3);

        let failed = OutputAssembler::failure("disk full", vec![]);
        assert!(!failed.ok);
        assert_eq!(failed.slides_generated, 0);
        assert_eq!(failed.error.as_deref(), Some("disk full"));
    }
}
