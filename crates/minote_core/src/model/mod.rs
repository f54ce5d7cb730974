//! Domain model for notes and their lifecycle.
//!
//! # Responsibility
//! - Define the canonical note record shared by repositories and services.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` that is never reused.
//! - `deleted_at` is set if and only if the note lives in the trash.

pub mod note;
