//! Color highlight of a selected text range.
//!
//! # Responsibility
//! - Map a selection over visible text onto the raw markup string.
//! - Wrap the selected raw slice in `<span style="color: …;">`.
//!
//! # Invariants
//! - Tags are invisible; an entity such as `&amp;` is one visible character.
//! - The output never splits an element: a selection that would is rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Color used when no theme color is configured.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#000000";

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3}|#[0-9a-fA-F]{6}|[a-zA-Z]+)$").expect("valid color regex")
});
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("valid entity regex")
});
static TAG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9-]*)").expect("valid tag regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Half-open selection `[start, end)` in characters of the visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Highlight failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    EmptySelection,
    OutOfBounds { end: usize, visible_len: usize },
    /// The selection starts and ends inside different elements.
    UnbalancedMarkup,
}

impl Display for HighlightError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySelection => {
                write!(f, "please select a word or phrase to change its color")
            }
            Self::OutOfBounds { end, visible_len } => write!(
                f,
                "selection end {end} is past the end of the text ({visible_len} characters)"
            ),
            Self::UnbalancedMarkup => {
                write!(f, "selection must not cross the edge of formatted text")
            }
        }
    }
}

impl Error for HighlightError {}

/// Returns `color` when it is a hex color or a CSS keyword, else the default.
pub fn resolve_highlight_color(color: Option<&str>) -> String {
    color
        .map(str::trim)
        .filter(|value| COLOR_RE.is_match(value))
        .unwrap_or(DEFAULT_HIGHLIGHT_COLOR)
        .to_string()
}

/// Wraps the visible-text `selection` of `content` in a color span.
///
/// # Errors
/// - `EmptySelection` when `start >= end`.
/// - `OutOfBounds` when `end` exceeds the visible length.
/// - `UnbalancedMarkup` when the wrap would produce misnested tags.
pub fn apply_highlight(
    content: &str,
    selection: SelectionRange,
    color: &str,
) -> Result<String, HighlightError> {
    if selection.is_empty() {
        return Err(HighlightError::EmptySelection);
    }

    let visible = visible_spans(content);
    if selection.end > visible.len() {
        return Err(HighlightError::OutOfBounds {
            end: selection.end,
            visible_len: visible.len(),
        });
    }

    let raw_start = visible[selection.start].0;
    let raw_end = visible[selection.end - 1].1;
    let selected = &content[raw_start..raw_end];
    if !is_balanced(selected) {
        return Err(HighlightError::UnbalancedMarkup);
    }

    let mut highlighted = String::with_capacity(content.len() + color.len() + 32);
    highlighted.push_str(&content[..raw_start]);
    highlighted.push_str("<span style=\"color: ");
    highlighted.push_str(color);
    highlighted.push_str(";\">");
    highlighted.push_str(selected);
    highlighted.push_str("</span>");
    highlighted.push_str(&content[raw_end..]);
    Ok(highlighted)
}

/// Raw byte range of every visible character, in order.
fn visible_spans(content: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut offset = 0;
    while offset < content.len() {
        let rest = &content[offset..];
        if rest.starts_with('<') {
            if let Some(close) = rest.find('>') {
                offset += close + 1;
                continue;
            }
        }
        let width = if rest.starts_with('&') {
            ENTITY_RE.find(rest).map(|m| m.end())
        } else {
            None
        };
        let width = width.unwrap_or_else(|| rest.chars().next().map_or(1, char::len_utf8));
        spans.push((offset, offset + width));
        offset += width;
    }
    spans
}

/// Whether every element opened in `fragment` is closed in it and vice versa.
fn is_balanced(fragment: &str) -> bool {
    let mut open: Vec<String> = Vec::new();
    let mut offset = 0;
    while let Some(start) = fragment[offset..].find('<') {
        let tag_start = offset + start;
        let Some(len) = fragment[tag_start..].find('>') else {
            break;
        };
        let tag = &fragment[tag_start..=tag_start + len];
        offset = tag_start + len + 1;

        let Some(caps) = TAG_NAME_RE.captures(tag) else {
            continue;
        };
        let name = caps[2].to_ascii_lowercase();
        if VOID_ELEMENTS.contains(&name.as_str()) || tag.ends_with("/>") {
            continue;
        }
        if caps[1].is_empty() {
            open.push(name);
        } else if open.pop().as_deref() != Some(name.as_str()) {
            return false;
        }
    }
    open.is_empty()
}
