//! Core domain logic for minote.
//! This crate is the single source of truth for note lifecycle invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod undo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId};
pub use render::markup::{internal_link_titles, render};
pub use render::preview::{display_title, preview_text};
pub use repo::note_repo::NoteRepository;
pub use repo::trash_repo::TrashRepository;
pub use repo::{RepoError, RepoResult};
pub use search::filter::filter_notes;
pub use service::note_service::{
    NoteService, NoteServiceError, PurgeConfirmation, PurgeOutcome, ServiceResult,
};
pub use store::{KvStore, MemoryStore, SqliteKvStore, StoreError, StoreResult};
pub use undo::{UndoBuffer, UndoEntry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
