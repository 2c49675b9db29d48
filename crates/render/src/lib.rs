//! Rendering pipeline: layout resolution, slide composition and output
//! assembly on top of [`deck_core`] documents and the [`deck_pptx`] backend.

pub mod compositor;
pub mod config;
pub mod layout;
pub mod output;
pub mod placeholders;
pub mod renderer;

pub use compositor::SlideCompositor;
pub use config::RendererConfig;
pub use layout::{LayoutResolution, LayoutResolver};
pub use output::OutputAssembler;
pub use placeholders::PlaceholderTable;
pub use renderer::{Renderer, TemplateInfo};
