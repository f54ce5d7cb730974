//! Single-slot undo for the most recent soft delete.
//!
//! # Invariants
//! - At most one entry exists; recording overwrites without recovery.
//! - `consume` always leaves the buffer empty.
//! - An entry is only actionable while its note is still in the trash.

use crate::model::note::Note;
use crate::repo::trash_repo::TrashRepository;
use crate::store::KvStore;
use serde::{Deserialize, Serialize};

/// Snapshot of a soft-deleted note and where it sat in the active list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoEntry {
    pub note: Note,
    pub original_index: usize,
}

/// Optional single entry; not a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoBuffer {
    entry: Option<UndoEntry>,
}

impl UndoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entry(entry: Option<UndoEntry>) -> Self {
        Self { entry }
    }

    /// Stores `note`, discarding whatever was recorded before.
    pub fn record(&mut self, note: Note, original_index: usize) {
        self.entry = Some(UndoEntry {
            note,
            original_index,
        });
    }

    /// Returns and clears the current entry.
    pub fn consume(&mut self) -> Option<UndoEntry> {
        self.entry.take()
    }

    pub fn peek(&self) -> Option<&UndoEntry> {
        self.entry.as_ref()
    }

    /// True only if the recorded note is still present in `trash`.
    pub fn peek_valid<S: KvStore + ?Sized>(&self, trash: &TrashRepository<'_, S>) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| trash.contains(&entry.note.id))
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}
