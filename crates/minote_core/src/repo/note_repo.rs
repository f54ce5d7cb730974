//! Active-note repository.
//!
//! # Responsibility
//! - Own the ordered collection of active notes.
//! - Persist the whole collection on every mutation.
//!
//! # Invariants
//! - Every note held here has `deleted_at == None`.
//! - New notes are prepended; order is otherwise insertion/restore order,
//!   never re-sorted by timestamps.

use super::{Collection, RepoResult};
use crate::model::note::Note;
use crate::store::{KvStore, StoreError};
use chrono::{DateTime, Utc};
use log::info;

/// Ordered collection of active notes backed by one store key.
pub struct NoteRepository<'s, S: KvStore + ?Sized> {
    inner: Collection<'s, S>,
}

impl<'s, S: KvStore + ?Sized> NoteRepository<'s, S> {
    /// Loads active notes stored under `key`; missing key means empty.
    pub fn load(store: &'s S, key: impl Into<String>) -> RepoResult<Self> {
        Ok(Self {
            inner: Collection::load(store, key)?,
        })
    }

    /// Creates a note with a fresh id at index 0 and persists.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Note {
        let note = Note::new(title, content, now);
        self.inner.notes.insert(0, note.clone());
        self.inner.persist();
        info!(
            "event=note_create module=repo status=ok note_id={} count={}",
            note.id,
            self.inner.notes.len()
        );
        note
    }

    /// Overwrites title/content of an active note.
    ///
    /// Returns `false` (and touches nothing) when `id` is not active.
    pub fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(note) = self.inner.notes.iter_mut().find(|note| note.id == id) else {
            return false;
        };
        note.edit(title, content, now);
        self.inner.persist();
        true
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Note> {
        self.inner.find_by_id(id)
    }

    /// Exact, case-sensitive title lookup; first match in collection order.
    pub fn find_by_title(&self, title: &str) -> Option<&Note> {
        self.inner.notes.iter().find(|note| note.title == title)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.inner.position(id)
    }

    pub fn list_filtered(&self, query: &str) -> Vec<&Note> {
        self.inner.list_filtered(query)
    }

    /// Extracts the note at `index`; `None` when out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<Note> {
        if index >= self.inner.notes.len() {
            return None;
        }
        let note = self.inner.notes.remove(index);
        self.inner.persist();
        Some(note)
    }

    /// Reinserts `note` at `index`, appending when the collection shrank below it.
    ///
    /// Returns the index actually used.
    pub fn insert_at(&mut self, index: usize, note: Note) -> usize {
        let index = index.min(self.inner.notes.len());
        self.inner.notes.insert(index, note);
        self.inner.persist();
        index
    }

    pub fn notes(&self) -> &[Note] {
        &self.inner.notes
    }

    pub fn len(&self) -> usize {
        self.inner.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.notes.is_empty()
    }

    /// Rewrites the whole collection, e.g. to retry after a failed write.
    pub fn persist(&mut self) {
        self.inner.persist();
    }

    /// Takes the last unrecovered write failure, if any.
    pub fn take_write_error(&mut self) -> Option<StoreError> {
        self.inner.write_error.take()
    }
}
