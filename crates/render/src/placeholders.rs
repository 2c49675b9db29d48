//! Role lookup for the placeholders of a freshly created slide.

use deck_core::document::{PlaceholderKind, Shape};
use deck_core::Slide;

/// Shape ids of the placeholders that receive title, subtitle and body text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderTable {
    pub title: Option<u32>,
    pub subtitle: Option<u32>,
    pub body: Option<u32>,
}

/// What a placeholder is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Title,
    Subtitle,
    Body,
}

impl PlaceholderTable {
    /// Build the table once per slide. The declared placeholder kind decides
    /// first; shape names ("title", "subtitle", "content", "body") are the
    /// fallback for templates that use generic kinds. The first placeholder
    /// of each role wins.
    pub fn build(slide: &Slide) -> Self {
        let mut table = Self::default();
        for shape in slide.placeholders() {
            let slot = match role_of(shape) {
                Some(Role::Title) => &mut table.title,
                Some(Role::Subtitle) => &mut table.subtitle,
                Some(Role::Body) => &mut table.body,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(shape.id);
            }
        }
        table
    }
}

fn role_of(shape: &Shape) -> Option<Role> {
    let (_, kind) = shape.placeholder()?;
    let name = shape.name.to_lowercase();

    match kind {
        PlaceholderKind::Subtitle => return Some(Role::Subtitle),
        PlaceholderKind::Title | PlaceholderKind::CenterTitle => return Some(Role::Title),
        PlaceholderKind::Date
        | PlaceholderKind::Footer
        | PlaceholderKind::SlideNumber
        | PlaceholderKind::Picture => return None,
        _ => {}
    }

    if name.contains("subtitle") {
        Some(Role::Subtitle)
    } else if name.contains("title") {
        Some(Role::Title)
    } else if kind.is_body() || name.contains("content") || name.contains("body") {
        Some(Role::Body)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::document::{PlaceholderDef, Rect, SlideLayout};
    use deck_core::SlideDocument;

    #[test]
    fn test_title_slide_roles() {
        let doc = SlideDocument::new_default();
        let slide = doc.new_slide(0).unwrap();
        let table = PlaceholderTable::build(&slide);
        assert_eq!(table.title, Some(slide.shapes[0].id));
        assert_eq!(table.subtitle, Some(slide.shapes[1].id));
        assert_eq!(table.body, None);
    }

    #[test]
    fn test_title_and_content_roles() {
        let doc = SlideDocument::new_default();
        let slide = doc.new_slide(1).unwrap();
        let table = PlaceholderTable::build(&slide);
        assert_eq!(table.title, Some(slide.shapes[0].id));
        assert_eq!(table.body, Some(slide.shapes[1].id));
        assert_eq!(table.subtitle, None);
    }

    #[test]
    fn test_blank_has_no_roles() {
        let doc = SlideDocument::new_default();
        let slide = doc.new_slide(6).unwrap();
        assert_eq!(PlaceholderTable::build(&slide), PlaceholderTable::default());
    }

    #[test]
    fn test_generic_kinds_fall_back_to_names() {
        let layout = SlideLayout::new(
            "Custom",
            vec![
                PlaceholderDef::new(10, PlaceholderKind::Other, "Slide Title", Rect::default()),
                PlaceholderDef::new(11, PlaceholderKind::Other, "Subtitle Area", Rect::default()),
                PlaceholderDef::new(12, PlaceholderKind::Other, "Main Body", Rect::default()),
                PlaceholderDef::new(13, PlaceholderKind::Footer, "Footer Body", Rect::default()),
            ],
        );
        let slide = Slide::from_layout(0, &layout);
        let table = PlaceholderTable::build(&slide);
        assert_eq!(table.title, Some(slide.shapes[0].id));
        assert_eq!(table.subtitle, Some(slide.shapes[1].id));
        assert_eq!(table.body, Some(slide.shapes[2].id));
    }
}
