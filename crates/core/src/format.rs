//! Text formatting heuristics shared by the compositor.
//!
//! - bold-prefix detection for bullet and column lines
//! - line-count chunking of long code blocks
//! - coalescing of loose text items into a bullet list

use crate::types::{ContentBody, ContentItem};

/// Default number of code lines that fit on one slide.
pub const DEFAULT_MAX_CODE_LINES: usize = 25;

/// Longest leading phrase (in words) that is emphasized.
const MAX_BOLD_PREFIX_WORDS: usize = 4;

/// A line split into an emphasized prefix and the remaining text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoldSplit {
    pub bold: String,
    pub plain: String,
}

/// Split a line into a bold lead-in and plain text.
///
/// The colon rule is tried first and wins even when a dash pattern appears
/// later. The lead-in must be 1 to 4 whitespace-separated words.
///
/// ```text
/// "Goal: Achieve success"      -> bold "Goal: ",      plain "Achieve success"
/// "Key Point - Important info" -> bold "Key Point - ", plain "Important info"
/// ```
pub fn split_for_bold(line: &str) -> Option<BoldSplit> {
    if let Some(idx) = line.find(':') {
        return split_at_delimiter(line, idx, ":", ":");
    }
    if let Some(idx) = line.find(" - ") {
        return split_at_delimiter(line, idx, " - ", " -");
    }
    None
}

fn split_at_delimiter(line: &str, idx: usize, delimiter: &str, marker: &str) -> Option<BoldSplit> {
    let prefix = &line[..idx];
    let words = prefix.split_whitespace().count();
    if !(1..=MAX_BOLD_PREFIX_WORDS).contains(&words) {
        return None;
    }

    let plain = line[idx + delimiter.len()..].trim_start();
    let mut bold = format!("{prefix}{marker}");
    if !plain.is_empty() {
        bold.push(' ');
    }

    Some(BoldSplit {
        bold,
        plain: plain.to_string(),
    })
}

/// Split source code into chunks of at most `max_lines_per_slide` lines.
///
/// Text within the limit comes back unchanged as a single chunk. Longer text
/// is cut purely by line count; callers allocate one slide per chunk.
pub fn split_into_chunks(code: &str, max_lines_per_slide: usize) -> Vec<String> {
    let limit = max_lines_per_slide.max(1); // At least 1 line per chunk
    let lines: Vec<&str> = code.split('\n').collect();

    if lines.len() <= limit {
        return vec![code.to_string()];
    }

    lines.chunks(limit).map(|chunk| chunk.join("\n")).collect()
}

/// Coalesce loose text items into a single bullet list.
///
/// With two or more text items, they become one bullets item placed first,
/// followed by every other item in its original order. A lone text item is
/// left untouched.
pub fn group_body_content(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let text_count = items
        .iter()
        .filter(|item| matches!(item.body, ContentBody::Text(_)))
        .count();
    if text_count < 2 {
        return items;
    }

    let mut bullets = Vec::with_capacity(text_count);
    let mut others = Vec::with_capacity(items.len() - text_count);
    for item in items {
        match item.body {
            ContentBody::Text(text) => bullets.push(text),
            _ => others.push(item),
        }
    }

    let mut grouped = Vec::with_capacity(others.len() + 1);
    grouped.push(ContentItem::new(ContentBody::Bullets(bullets)));
    grouped.extend(others);
    grouped
}
