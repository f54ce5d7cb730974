//! Trash repository for soft-deleted notes.
//!
//! # Invariants
//! - Every note held here has `deleted_at == Some(_)`.
//! - Append order equals soft-delete order (oldest deletion first).

use super::{Collection, RepoResult};
use crate::model::note::Note;
use crate::store::{KvStore, StoreError};
use chrono::{DateTime, Utc};
use log::info;

/// Ordered collection of trashed notes backed by one store key.
pub struct TrashRepository<'s, S: KvStore + ?Sized> {
    inner: Collection<'s, S>,
}

impl<'s, S: KvStore + ?Sized> TrashRepository<'s, S> {
    pub fn load(store: &'s S, key: impl Into<String>) -> RepoResult<Self> {
        Ok(Self {
            inner: Collection::load(store, key)?,
        })
    }

    /// Stamps `deleted_at`, appends and persists. Returns the trashed copy.
    pub fn soft_delete(&mut self, mut note: Note, now: DateTime<Utc>) -> Note {
        note.soft_delete(now);
        self.inner.notes.push(note.clone());
        self.inner.persist();
        note
    }

    /// Extracts a note by id; `None` when it is not in the trash.
    pub fn remove(&mut self, id: &str) -> Option<Note> {
        let note = self.inner.take_by_id(id)?;
        self.inner.persist();
        Some(note)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.position(id).is_some()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Note> {
        self.inner.find_by_id(id)
    }

    pub fn list_filtered(&self, query: &str) -> Vec<&Note> {
        self.inner.list_filtered(query)
    }

    /// Drops every trashed note and persists the empty collection.
    ///
    /// Returns how many notes were purged.
    pub fn purge_all(&mut self) -> usize {
        let purged = self.inner.notes.len();
        self.inner.notes.clear();
        self.inner.persist();
        info!("event=trash_purge_all module=repo status=ok purged={purged}");
        purged
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

    pub fn persist(&mut self) {
        self.inner.persist();
    }

    pub fn take_write_error(&mut self) -> Option<StoreError> {
        self.inner.write_error.take()
    }
}
