//! Note lifecycle service.
//!
//! # Responsibility
//! - Expose the controller-facing operations (create, edit, soft delete,
//!   undo, restore, purge, listing, rendering, link activation).
//! - Coordinate the active/trash repositories and the undo slot.
//! - Track the currently selected note.
//!
//! # Invariants
//! - A note lives in exactly one of active/trash; `deleted_at` is set iff it
//!   is in trash.
//! - Only the most recent soft delete is undoable; a newer soft delete
//!   forfeits the older entry.
//! - Missing ids, empty selection, empty or stale undo are silent no-ops.
//! - Write failures never abort a protocol midway; they surface as `Err`
//!   after in-memory state is consistent.

use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::model::note::{Note, NoteId};
use crate::render::markup;
use crate::repo::note_repo::NoteRepository;
use crate::repo::trash_repo::TrashRepository;
use crate::repo::RepoError;
use crate::store::{KvStore, StoreError};
use crate::undo::{UndoBuffer, UndoEntry};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

static SYSTEM_CLOCK: SystemClock = SystemClock;

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Service error for lifecycle use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Persistence-layer failure; in-memory state is still authoritative.
    Repo(RepoError),
    InvalidConfig(String),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InvalidConfig(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Repo(RepoError::Store(value))
    }
}

/// Yes/no gate asked before emptying the trash.
pub trait PurgeConfirmation {
    fn confirm_purge(&mut self, trash_count: usize) -> bool;
}

impl<F: FnMut(usize) -> bool> PurgeConfirmation for F {
    fn confirm_purge(&mut self, trash_count: usize) -> bool {
        self(trash_count)
    }
}

/// Result of [`NoteService::purge_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Trash was empty; confirmation was not asked.
    AlreadyEmpty,
    Declined,
    Purged(usize),
}

/// Explicit service object over an injected store and confirmation gate.
pub struct NoteService<'s, S: KvStore + ?Sized, C: PurgeConfirmation> {
    store: &'s S,
    clock: &'s dyn Clock,
    config: CoreConfig,
    notes: NoteRepository<'s, S>,
    trash: TrashRepository<'s, S>,
    undo: UndoBuffer,
    undo_write_error: Option<StoreError>,
    selected: Option<NoteId>,
    confirm: C,
}

impl<'s, S: KvStore + ?Sized, C: PurgeConfirmation> NoteService<'s, S, C> {
    /// Loads collections with default keys and the system clock.
    pub fn open(store: &'s S, confirm: C) -> ServiceResult<Self> {
        Self::open_with(store, &SYSTEM_CLOCK, CoreConfig::default(), confirm)
    }

    /// Loads collections using explicit clock and config.
    ///
    /// Absent keys load as empty collections and an empty undo slot.
    pub fn open_with(
        store: &'s S,
        clock: &'s dyn Clock,
        config: CoreConfig,
        confirm: C,
    ) -> ServiceResult<Self> {
        config.validate().map_err(NoteServiceError::InvalidConfig)?;

        let notes = NoteRepository::load(store, config.active_key.as_str())?;
        let trash = TrashRepository::load(store, config.trash_key.as_str())?;
        let undo = load_undo(store, &config.undo_key)?;
        info!(
            "event=service_open module=service status=ok active={} trash={} undo={}",
            notes.len(),
            trash.len(),
            !undo.is_empty()
        );

        Ok(Self {
            store,
            clock,
            config,
            notes,
            trash,
            undo,
            undo_write_error: None,
            selected: None,
            confirm,
        })
    }

    /// Creates a note at the top of the active list and selects it.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<Note> {
        let note = self.notes.create(title, content, self.clock.now());
        self.selected = Some(note.id.clone());
        self.settle(note)
    }

    /// Creates an empty note titled with the configured default.
    pub fn create_untitled(&mut self) -> ServiceResult<Note> {
        let title = self.config.default_title.clone();
        self.create(title, "")
    }

    /// Overwrites title/content of an active note; `Ok(false)` if not active.
    pub fn update(
        &mut self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<bool> {
        let updated = self.notes.update(id, title, content, self.clock.now());
        if !updated {
            debug!("event=note_update module=service status=noop reason=not_found note_id={id}");
        }
        self.settle(updated)
    }

    /// Autosave entry point: writes the editor state into the selected note.
    pub fn save_current(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ServiceResult<bool> {
        let Some(id) = self.selected.clone() else {
            return Ok(false);
        };
        self.update(&id, title, content)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Note> {
        self.notes.find_by_id(id)
    }

    /// Selects an active note; leaves selection unchanged if `id` is not active.
    pub fn select(&mut self, id: &str) -> Option<&Note> {
        self.notes.find_by_id(id)?;
        self.selected = Some(id.to_string());
        self.notes.find_by_id(id)
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected
            .as_deref()
            .and_then(|id| self.notes.find_by_id(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Moves an active note to the trash and records it for undo.
    ///
    /// Returns the trashed note, or `None` when `id` is not active.
    pub fn soft_delete(&mut self, id: &str) -> ServiceResult<Option<Note>> {
        let Some(index) = self.notes.position(id) else {
            debug!("event=note_soft_delete module=service status=noop reason=not_found note_id={id}");
            return Ok(None);
        };
        let Some(note) = self.notes.remove_at(index) else {
            return self.settle(None);
        };

        let trashed = self.trash.soft_delete(note, self.clock.now());
        self.undo.record(trashed.clone(), index);
        self.persist_undo();
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        info!(
            "event=note_soft_delete module=service status=ok note_id={} index={}",
            trashed.id, index
        );
        self.settle(Some(trashed))
    }

    /// Soft-deletes the selected note; no-op when nothing is selected.
    pub fn delete_selected(&mut self) -> ServiceResult<Option<Note>> {
        let Some(id) = self.selected.clone() else {
            return Ok(None);
        };
        self.soft_delete(&id)
    }

    /// Restores the most recent soft delete to its original index.
    ///
    /// The slot is cleared even when the entry turns out stale (note already
    /// restored or purged elsewhere); a stale undo changes nothing else.
    pub fn undo_last_delete(&mut self) -> ServiceResult<Option<Note>> {
        let Some(entry) = self.undo.consume() else {
            return Ok(None);
        };
        self.persist_undo();

        let Some(mut note) = self.trash.remove(&entry.note.id) else {
            info!(
                "event=note_undo module=service status=stale note_id={}",
                entry.note.id
            );
            return self.settle(None);
        };

        note.restore(self.clock.now());
        let index = self.notes.insert_at(entry.original_index, note.clone());
        self.selected = Some(note.id.clone());
        info!(
            "event=note_undo module=service status=ok note_id={} requested_index={} index={}",
            note.id, entry.original_index, index
        );
        self.settle(Some(note))
    }

    /// Whether [`Self::undo_last_delete`] would restore something right now.
    pub fn can_undo(&self) -> bool {
        self.undo.peek_valid(&self.trash)
    }

    pub fn undo_entry(&self) -> Option<&UndoEntry> {
        self.undo.peek()
    }

    /// Moves a trashed note back to the top of the active list.
    ///
    /// Independent of the undo slot.
    pub fn restore_from_trash(&mut self, id: &str) -> ServiceResult<Option<Note>> {
        let Some(mut note) = self.trash.remove(id) else {
            debug!("event=note_restore module=service status=noop reason=not_found note_id={id}");
            return Ok(None);
        };

        note.restore(self.clock.now());
        self.notes.insert_at(0, note.clone());
        info!(
            "event=note_restore module=service status=ok note_id={}",
            note.id
        );
        self.settle(Some(note))
    }

    /// Drops one note from the trash for good.
    pub fn permanently_delete(&mut self, id: &str) -> ServiceResult<Option<Note>> {
        let Some(note) = self.trash.remove(id) else {
            debug!("event=note_purge module=service status=noop reason=not_found note_id={id}");
            return Ok(None);
        };
        info!(
            "event=note_purge module=service status=ok note_id={}",
            note.id
        );
        self.settle(Some(note))
    }

    /// Empties the trash after confirmation. Irreversible.
    pub fn purge_all(&mut self) -> ServiceResult<PurgeOutcome> {
        if self.trash.is_empty() {
            return Ok(PurgeOutcome::AlreadyEmpty);
        }

        let count = self.trash.len();
        if !self.confirm.confirm_purge(count) {
            info!("event=trash_purge_all module=service status=declined count={count}");
            return Ok(PurgeOutcome::Declined);
        }

        let purged = self.trash.purge_all();
        self.settle(PurgeOutcome::Purged(purged))
    }

    pub fn list_active(&self, query: &str) -> Vec<&Note> {
        self.notes.list_filtered(query)
    }

    pub fn list_trash(&self, query: &str) -> Vec<&Note> {
        self.trash.list_filtered(query)
    }

    pub fn active_notes(&self) -> &[Note] {
        self.notes.notes()
    }

    pub fn trash_notes(&self) -> &[Note] {
        self.trash.notes()
    }

    /// Renders markup source to HTML.
    pub fn render(&self, content: &str) -> String {
        markup::render(content)
    }

    /// Renders the selected note's content, if any.
    pub fn render_selected(&self) -> Option<String> {
        self.selected().map(|note| markup::render(&note.content))
    }

    /// Internal-link activation: select the note titled `title`, creating it
    /// (empty content, prepended) when no active note has that exact title.
    pub fn select_note_by_title(&mut self, title: &str) -> ServiceResult<Note> {
        if let Some(note) = self.notes.find_by_title(title) {
            let note = note.clone();
            self.selected = Some(note.id.clone());
            return Ok(note);
        }

        info!("event=note_link_create module=service status=start");
        self.create(title, "")
    }

    /// Rewrites every collection and the undo slot, e.g. after a failed write.
    pub fn flush(&mut self) -> ServiceResult<()> {
        self.notes.persist();
        self.trash.persist();
        self.persist_undo();
        self.settle(())
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    fn persist_undo(&mut self) {
        let result = serde_json::to_string(&self.undo.peek())
            .map_err(|err| StoreError::Unavailable(format!("encode failed: {err}")))
            .and_then(|encoded| self.store.set(&self.config.undo_key, &encoded));

        match result {
            Ok(()) => self.undo_write_error = None,
            Err(err) => {
                error!(
                    "event=undo_persist module=service status=error key={} error={}",
                    self.config.undo_key, err
                );
                self.undo_write_error = Some(err);
            }
        }
    }

    /// Returns the first parked write failure; later ones are logged and dropped.
    fn settle<T>(&mut self, value: T) -> ServiceResult<T> {
        let failures = [
            ("active", self.notes.take_write_error()),
            ("trash", self.trash.take_write_error()),
            ("undo", self.undo_write_error.take()),
        ];
        let mut first = None;
        for (collection, failure) in failures {
            let Some(err) = failure else {
                continue;
            };
            if first.is_none() {
                first = Some(err);
            } else {
                warn!(
                    "event=write_failure_dropped module=service status=error collection={collection} error={err}"
                );
            }
        }
        match first {
            Some(err) => Err(err.into()),
            None => Ok(value),
        }
    }
}

fn load_undo<S: KvStore + ?Sized>(store: &S, key: &str) -> ServiceResult<UndoBuffer> {
    let Some(raw) = store.get(key)? else {
        return Ok(UndoBuffer::new());
    };

    match serde_json::from_str::<Option<UndoEntry>>(&raw) {
        Ok(entry) => Ok(UndoBuffer::from_entry(entry)),
        Err(err) => {
            warn!("event=undo_load module=service status=discarded key={key} error={err}");
            Ok(UndoBuffer::new())
        }
    }
}
