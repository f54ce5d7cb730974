//! Case-insensitive substring filter.
//!
//! # Invariants
//! - Empty query returns the whole collection in its original order.
//! - Results keep original relative order; no ranking, no tokenization.

use crate::model::note::Note;

/// Returns every note whose title or content contains `query`, ignoring case.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.is_empty() {
        return notes.iter().collect();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| matches_query(note, &needle))
        .collect()
}

fn matches_query(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}
