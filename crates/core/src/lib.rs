//! Core domain types, specification normalization, theming and the
//! shape-based slide document model for deck generation.

pub mod document;
pub mod error;
pub mod format;
pub mod normalize;
pub mod theme;
pub mod types;

pub use document::{Emu, Rect, Rgb, Slide, SlideDocument, SlideLayout};
pub use error::{Error, Result};
pub use normalize::{NormalizedDeck, SpecNormalizer};
pub use theme::{hex_to_color, ThemeEngine, ThemePalette, ThemeSpec};
pub use types::{
    ContentBody, ContentItem, ContentKind, ContentPosition, DeckSpecification, LayoutType,
    RenderResult, SlideSpecification,
};
