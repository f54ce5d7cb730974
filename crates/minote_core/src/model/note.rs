//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its JSON shape.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `id` and `created_at` are immutable once assigned.
//! - `deleted_at.is_some()` is the source of truth for trash residency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as a plain string so records written by earlier versions (numeric
/// millisecond ids) load unchanged.
pub type NoteId = String;

/// Canonical note record.
///
/// Serialized with camelCase field names to stay compatible with the
/// existing storage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// May be empty; matched exactly by internal links.
    #[serde(default)]
    pub title: String,
    /// Raw markup source.
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only while the note is in the trash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Creates an active note with a freshly generated id.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, content, now)
    }

    /// Creates an active note with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Overwrites title/content and restamps `updated_at`.
    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) {
        self.title = title.into();
        self.content = content.into();
        self.updated_at = now;
    }

    /// Marks this note as trashed.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted_at = Some(now);
    }

    /// Clears the trash marker and restamps `updated_at`.
    pub fn restore(&mut self, now: DateTime<Utc>) {
        self.deleted_at = None;
        self.updated_at = now;
    }

    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}
