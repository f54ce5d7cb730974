//! Core configuration.
//!
//! # Invariants
//! - Every field has a default, so a partial or empty config file is valid.
//! - Store keys are distinct for active, trash and undo records.

use serde::Deserialize;

pub const DEFAULT_ACTIVE_KEY: &str = "obsidian-notes";
pub const DEFAULT_TRASH_KEY: &str = "obsidian-notes-trash";
pub const DEFAULT_UNDO_KEY: &str = "obsidian-notes-undo";
pub const DEFAULT_NOTE_TITLE: &str = "New note";

/// Store keys and defaults used by `NoteService`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Key holding the JSON array of active notes.
    pub active_key: String,
    /// Key holding the JSON array of trashed notes.
    pub trash_key: String,
    /// Key holding the single undo record.
    pub undo_key: String,
    /// Title given to notes created without one.
    pub default_title: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            active_key: DEFAULT_ACTIVE_KEY.to_string(),
            trash_key: DEFAULT_TRASH_KEY.to_string(),
            undo_key: DEFAULT_UNDO_KEY.to_string(),
            default_title: DEFAULT_NOTE_TITLE.to_string(),
        }
    }
}

impl CoreConfig {
    /// Rejects configurations where two collections would share a key.
    pub fn validate(&self) -> Result<(), String> {
        let keys = [
            ("active_key", &self.active_key),
            ("trash_key", &self.trash_key),
            ("undo_key", &self.undo_key),
        ];
        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }
        if self.active_key == self.trash_key
            || self.active_key == self.undo_key
            || self.trash_key == self.undo_key
        {
            return Err("active_key, trash_key and undo_key must differ".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: CoreConfig = serde_json::from_str(r#"{"default_title":"Draft"}"#).unwrap();
        assert_eq!(config.default_title, "Draft");
        assert_eq!(config.active_key, "obsidian-notes");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn shared_keys_are_rejected() {
        let config = CoreConfig {
            trash_key: "obsidian-notes".to_string(),
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
