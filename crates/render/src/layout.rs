//! Mapping of logical layout types onto a document's layout catalogue.
//!
//! Templates differ in which built-in layouts they carry and in what order,
//! so resolution walks a fallback chain and never fails while at least one
//! layout exists:
//!
//! 1. the conventional index for the layout type
//! 2. a case-insensitive name match
//! 3. index 1 ("Title and Content" in stock templates)
//! 4. index 0

use deck_core::document::SlideLayout;
use deck_core::LayoutType;

/// Outcome of resolving one layout type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutResolution {
    /// Index into the layout catalogue; `None` only for an empty catalogue.
    pub index: Option<usize>,

    /// Set when a fallback tier past the conventional index was used.
    pub warning: Option<String>,
}

/// Resolves [`LayoutType`]s against a layout catalogue.
pub struct LayoutResolver;

impl LayoutResolver {
    /// Conventional position of a layout type in stock templates.
    pub fn conventional_index(layout: LayoutType) -> usize {
        match layout {
            LayoutType::Title => 0,
            LayoutType::TitleContent => 1,
            LayoutType::Section => 2,
            LayoutType::TwoCol => 3,
            LayoutType::Blank => 6,
            _ => 1,
        }
    }

    /// Human layout names tried, in order, when the conventional index is
    /// out of range.
    pub fn name_candidates(layout: LayoutType) -> &'static [&'static str] {
        match layout {
            LayoutType::Title => &["Title Slide", "Title Only"],
            LayoutType::Section => &["Section Header", "Title Only"],
            LayoutType::TwoCol => &["Two Content", "Comparison"],
            LayoutType::Blank => &["Blank"],
            _ => &["Title and Content", "Content with Caption"],
        }
    }

    /// Pick a layout for `layout` from `layouts`.
    pub fn resolve(layouts: &[SlideLayout], layout: LayoutType) -> LayoutResolution {
        let index = Self::conventional_index(layout);
        if index < layouts.len() {
            return LayoutResolution {
                index: Some(index),
                warning: None,
            };
        }

        for candidate in Self::name_candidates(layout) {
            let needle = candidate.to_lowercase();
            if let Some(found) = layouts
                .iter()
                .position(|l| l.name.to_lowercase().contains(&needle))
            {
                return LayoutResolution {
                    index: Some(found),
                    warning: Some(format!(
                        "Layout {}: no layout at index {}, matched '{}' by name",
                        layout, index, layouts[found].name
                    )),
                };
            }
        }

        for fallback in [1, 0] {
            if let Some(found) = layouts.get(fallback) {
                return LayoutResolution {
                    index: Some(fallback),
                    warning: Some(format!(
                        "Layout {}: no matching layout, using layout {} ('{}')",
                        layout, fallback, found.name
                    )),
                };
            }
        }

        LayoutResolution {
            index: None,
            warning: None,
        }
    }

    /// Names of the catalogue's layouts, in order.
    pub fn available_layouts(layouts: &[SlideLayout]) -> Vec<String> {
        layouts.iter().map(|l| l.name.clone()).collect()
    }
}
