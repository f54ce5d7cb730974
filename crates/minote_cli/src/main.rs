//! Command-line controller for minote.
//!
//! # Responsibility
//! - Parse one command per invocation and dispatch it to `NoteService`.
//! - Own every user-facing concern the core leaves out: output formatting,
//!   the purge confirmation prompt, config file loading.

mod commands;

use clap::{Parser, Subcommand};
use minote_core::{default_log_level, init_logging, CoreConfig, SqliteKvStore};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "minote", version, about = "Minimal notes with trash and one-step undo")]
struct Cli {
    /// SQLite file holding notes, trash and the undo slot.
    #[arg(long, env = "MINOTE_DB", default_value = "minote.sqlite3")]
    db: PathBuf,

    /// Optional TOML file overriding store keys and the default title.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "MINOTE_LOG_DIR")]
    log_dir: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note at the top of the list.
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Replace title and/or content of an active note.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// List active notes, optionally filtered.
    List { query: Option<String> },
    /// List trashed notes, optionally filtered.
    Trash { query: Option<String> },
    /// Print a note rendered to HTML.
    Show { id: String },
    /// Move a note to the trash.
    Delete { id: String },
    /// Bring back the most recently deleted note.
    Undo,
    /// Move a trashed note back to the top of the list.
    Restore { id: String },
    /// Permanently delete one trashed note.
    Purge { id: String },
    /// Permanently delete everything in the trash.
    EmptyTrash {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Open the note with this exact title, creating it if missing.
    Follow { title: String },
    /// Render markup from the argument or stdin without touching notes.
    Render { text: Option<String> },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = load_config(cli.config.as_ref())?;
    let store = SqliteKvStore::open(&cli.db)?;
    commands::dispatch(&store, config, cli.command)
}

fn load_config(path: Option<&PathBuf>) -> Result<CoreConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(CoreConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read config `{}`: {err}", path.display()))?;
    let config: CoreConfig = toml::from_str(&raw)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_edit_with_partial_fields() {
        let cli = Cli::try_parse_from(["minote", "edit", "abc", "--title", "T"]).unwrap();
        match cli.command {
            Command::Edit { id, title, content } => {
                assert_eq!(id, "abc");
                assert_eq!(title.as_deref(), Some("T"));
                assert!(content.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn empty_trash_defaults_to_prompting() {
        let cli = Cli::try_parse_from(["minote", "empty-trash"]).unwrap();
        assert!(matches!(cli.command, Command::EmptyTrash { yes: false }));
    }

    #[test]
    fn toml_config_overrides_defaults() {
        let config: minote_core::CoreConfig =
            toml::from_str("default_title = \"Inbox\"\ntrash_key = \"bin\"").unwrap();
        assert_eq!(config.default_title, "Inbox");
        assert_eq!(config.trash_key, "bin");
        assert_eq!(config.active_key, "obsidian-notes");
    }
}
