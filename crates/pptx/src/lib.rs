//! PPTX (Office Open XML) backend for generated decks.
//!
//! Reads slide layouts and canvas geometry out of `.pptx`/`.potx` templates
//! and writes a [`deck_core::SlideDocument`] back out as a PPTX package.

mod package;
pub mod template;
pub mod writer;
mod xml;

pub use template::TemplateReader;
pub use writer::PptxWriter;
