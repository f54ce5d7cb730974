//! Repositories owning the active and trash collections.
//!
//! # Responsibility
//! - Hold each ordered collection in memory.
//! - Write every mutation through to the persistence port under its own key.
//!
//! # Invariants
//! - Each mutating call persists the owning collection in full.
//! - A failed write never rolls back memory: the in-memory collection stays
//!   the source of truth and the failure is parked until the next successful
//!   write or until a caller takes it.

use crate::model::note::Note;
use crate::search::filter::filter_notes;
use crate::store::{KvStore, StoreError};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_repo;
pub mod trash_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for loading and persisting collections.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    /// Stored value under `key` is not a valid note collection.
    InvalidData { key: String, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted collection `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Ordered note sequence bound to one store key.
///
/// Shared plumbing behind `NoteRepository` and `TrashRepository`.
struct Collection<'s, S: KvStore + ?Sized> {
    store: &'s S,
    key: String,
    notes: Vec<Note>,
    write_error: Option<StoreError>,
}

impl<'s, S: KvStore + ?Sized> Collection<'s, S> {
    /// Loads the collection; an absent key yields an empty sequence.
    fn load(store: &'s S, key: impl Into<String>) -> RepoResult<Self> {
        let key = key.into();
        let notes = match store.get(&key)? {
            Some(raw) => {
                serde_json::from_str::<Vec<Note>>(&raw).map_err(|err| RepoError::InvalidData {
                    key: key.clone(),
                    message: err.to_string(),
                })?
            }
            None => Vec::new(),
        };
        debug!(
            "event=collection_load module=repo status=ok key={} count={}",
            key,
            notes.len()
        );

        Ok(Self {
            store,
            key,
            notes,
            write_error: None,
        })
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.notes)
            .map_err(|err| StoreError::Unavailable(format!("encode failed: {err}")))
            .and_then(|encoded| self.store.set(&self.key, &encoded));

        match result {
            Ok(()) => self.write_error = None,
            Err(err) => {
                error!(
                    "event=collection_persist module=repo status=error key={} count={} error={}",
                    self.key,
                    self.notes.len(),
                    err
                );
                self.write_error = Some(err);
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn find_by_id(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    fn take_by_id(&mut self, id: &str) -> Option<Note> {
        let index = self.position(id)?;
        Some(self.notes.remove(index))
    }

    fn list_filtered(&self, query: &str) -> Vec<&Note> {
        filter_notes(&self.notes, query)
    }
}
