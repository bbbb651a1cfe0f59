//! Substring filter over notes.
//!
//! # Invariants
//! - `SearchHit::index` is the note's position in the unfiltered list.
//! - Hits keep list order.
//! - Matching is case-insensitive and ignores markup tags.

use crate::model::note::Note;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|nbsp|#0*39);").expect("valid entity regex"));

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Position of the note in the theme's full list.
    pub index: usize,
    pub note: Note,
}

/// Removes markup tags and decodes the basic HTML entities.
pub fn strip_markup(content: &str) -> String {
    let without_tags = TAG_RE.replace_all(content, "");
    ENTITY_RE
        .replace_all(&without_tags, |caps: &regex::Captures<'_>| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "nbsp" => " ",
            _ => "'",
        })
        .into_owned()
}

/// Whether `note` matches an already lower-cased term.
fn matches(note: &Note, lowered_term: &str) -> bool {
    note.title.to_lowercase().contains(lowered_term)
        || strip_markup(&note.content)
            .to_lowercase()
            .contains(lowered_term)
}

/// Filters `notes` by a case-insensitive substring of title or plain content.
///
/// A blank term matches every note.
pub fn search_notes(notes: &[Note], term: &str) -> Vec<SearchHit> {
    let lowered_term = term.trim().to_lowercase();
    notes
        .iter()
        .enumerate()
        .filter(|(_, note)| matches(note, &lowered_term))
        .map(|(index, note)| SearchHit {
            index,
            note: note.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{search_notes, strip_markup};
    use crate::model::note::Note;

    #[test]
    fn strip_markup_removes_spans_and_decodes_entities() {
        let raw = r#"a <span style="color: #ff0000;">b&amp;c</span> &lt;div&gt; it&#039;s"#;
        assert_eq!(strip_markup(raw), "a b&c <div> it's");
    }

    #[test]
    fn search_does_not_match_markup_attributes() {
        let notes = vec![Note::new(
            "colors",
            r#"<span style="color: #000000;">plain</span>"#,
        )];
        assert!(search_notes(&notes, "style").is_empty());
        assert_eq!(search_notes(&notes, "PLAIN").len(), 1);
    }

    #[test]
    fn hits_carry_unfiltered_indices() {
        let notes = vec![
            Note::new("first", "alpha"),
            Note::new("second", "beta"),
            Note::new("third", "alphabet"),
        ];
        let hits = search_notes(&notes, "alpha");
        let indices: Vec<usize> = hits.iter().map(|hit| hit.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn blank_term_matches_everything() {
        let notes = vec![Note::new("a", "b"), Note::new("c", "d")];
        assert_eq!(search_notes(&notes, "  ").len(), 2);
    }
}
