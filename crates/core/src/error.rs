//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing, rendering or saving a deck.
///
/// Only [`Error::InvalidSpecification`] and [`Error::InvalidTheme`] stop a
/// request before rendering starts. Everything raised while rendering one
/// slide is downgraded to a warning by the renderer.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The deck specification failed canonical-form validation.
    #[error("Invalid deck specification: {0}")]
    InvalidSpecification(String),

    /// The theme section is inconsistent (e.g. colors without fonts).
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),

    /// A content payload was present but could not be interpreted.
    #[error("Malformed {kind} content: {reason}")]
    MalformedContent { kind: String, reason: String },

    /// The document has no slide layouts to place a slide on.
    #[error("No slide layout available: {0}")]
    LayoutUnavailable(String),

    /// A template file could not be interpreted.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Shorthand for a structural specification error.
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpecification(msg.into())
    }

    /// Shorthand for a malformed content payload.
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error rejects the whole specification.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::InvalidSpecification(_) | Self::InvalidTheme(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            Error::invalid_spec("slides must not be empty").to_string(),
            "Invalid deck specification: slides must not be empty"
        );
        assert_eq!(
            Error::malformed("chart", "expected an object").to_string(),
            "Malformed chart content: expected an object"
        );
    }

    #[test]
    fn test_structural_classification() {
        assert!(Error::invalid_spec("x").is_structural());
        assert!(Error::InvalidTheme("x".into()).is_structural());
        assert!(!Error::malformed("chart", "x").is_structural());
        assert!(!Error::ZipError("x".into()).is_structural());
    }
}
