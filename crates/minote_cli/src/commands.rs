//! Command dispatch and terminal output.

use crate::Command;
use chrono::Local;
use log::info;
use minote_core::{
    display_title, internal_link_titles, preview_text, CoreConfig, KvStore, Note, NoteService,
    PurgeOutcome, SystemClock,
};
use std::error::Error;
use std::io::{self, BufRead, Read, Write};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn dispatch<S: KvStore>(
    store: &S,
    config: CoreConfig,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    let assume_yes = matches!(command, Command::EmptyTrash { yes: true });
    let confirm = move |count: usize| assume_yes || prompt_purge(count);
    let mut service = NoteService::open_with(store, &SystemClock, config, confirm)?;
    info!("event=cli_dispatch module=cli status=start");

    match command {
        Command::New { title, content } => {
            let note = match title {
                Some(title) => service.create(title, content)?,
                None if content.is_empty() => service.create_untitled()?,
                None => {
                    let title = service.config().default_title.clone();
                    service.create(title, content)?
                }
            };
            println!("{}", note.id);
        }
        Command::Edit { id, title, content } => {
            let Some(existing) = service.find_by_id(&id).cloned() else {
                eprintln!("no active note `{id}`");
                return Ok(());
            };
            service.update(
                &id,
                title.unwrap_or(existing.title),
                content.unwrap_or(existing.content),
            )?;
        }
        Command::List { query } => print_rows(&service.list_active(query.as_deref().unwrap_or(""))),
        Command::Trash { query } => print_rows(&service.list_trash(query.as_deref().unwrap_or(""))),
        Command::Show { id } => match service.select(&id).cloned() {
            Some(note) => print_note(&service, &note),
            None => eprintln!("no active note `{id}`"),
        },
        Command::Delete { id } => match service.soft_delete(&id)? {
            Some(note) => println!("moved `{}` to trash (undo available)", display_title(&note.title)),
            None => eprintln!("no active note `{id}`"),
        },
        Command::Undo => match service.undo_last_delete()? {
            Some(note) => println!("restored `{}`", display_title(&note.title)),
            None => eprintln!("nothing to undo"),
        },
        Command::Restore { id } => match service.restore_from_trash(&id)? {
            Some(note) => println!("restored `{}`", display_title(&note.title)),
            None => eprintln!("no trashed note `{id}`"),
        },
        Command::Purge { id } => match service.permanently_delete(&id)? {
            Some(note) => println!("deleted `{}` forever", display_title(&note.title)),
            None => eprintln!("no trashed note `{id}`"),
        },
        Command::EmptyTrash { .. } => match service.purge_all()? {
            PurgeOutcome::AlreadyEmpty => println!("trash is already empty"),
            PurgeOutcome::Declined => println!("kept trash as is"),
            PurgeOutcome::Purged(count) => println!("deleted {count} notes forever"),
        },
        Command::Follow { title } => {
            let note = service.select_note_by_title(&title)?;
            print_note(&service, &note);
        }
        Command::Render { text } => {
            let source = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            println!("{}", service.render(&source));
        }
    }

    Ok(())
}

fn print_rows(notes: &[&Note]) {
    for note in notes {
        let when = note.updated_at.with_timezone(&Local).format(DATE_FORMAT);
        println!("{}  {}  {}", note.id, when, display_title(&note.title));
        let preview = preview_text(&note.content);
        if !preview.is_empty() {
            println!("    {}", preview.replace('\n', " "));
        }
    }
}

fn print_note<S: KvStore + ?Sized, C: minote_core::PurgeConfirmation>(
    service: &NoteService<'_, S, C>,
    note: &Note,
) {
    println!("# {}", display_title(&note.title));
    println!("{}", service.render(&note.content));
    let links = internal_link_titles(&note.content);
    if !links.is_empty() {
        println!("links: {}", links.join(", "));
    }
}

fn prompt_purge(count: usize) -> bool {
    print!("Permanently delete {count} notes from the trash? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
