use minote_core::{
    CoreConfig, KvStore, MemoryStore, Note, NoteService, NoteServiceError, RepoError,
    SqliteKvStore, StoreError, StoreResult,
};
use std::cell::Cell;

const ACTIVE_KEY: &str = "obsidian-notes";
const TRASH_KEY: &str = "obsidian-notes-trash";
const UNDO_KEY: &str = "obsidian-notes-undo";

fn stored_notes(store: &impl KvStore, key: &str) -> Vec<Note> {
    let raw = store.get(key).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn empty_store_opens_with_empty_collections() {
    let store = MemoryStore::new();
    let service = NoteService::open(&store, |_: usize| true).unwrap();
    assert!(service.active_notes().is_empty());
    assert!(service.trash_notes().is_empty());
    assert!(service.undo_entry().is_none());
    assert!(store.is_empty());
}

#[test]
fn every_mutation_writes_through_both_keys() {
    let store = MemoryStore::new();
    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    let note = service.create("t", "c").unwrap();
    assert_eq!(stored_notes(&store, ACTIVE_KEY), vec![note.clone()]);

    service.soft_delete(&note.id).unwrap();
    assert!(stored_notes(&store, ACTIVE_KEY).is_empty());
    let trash = stored_notes(&store, TRASH_KEY);
    assert_eq!(trash.len(), 1);
    assert!(trash[0].deleted_at.is_some());
    assert!(store.get(UNDO_KEY).unwrap().unwrap().contains("originalIndex"));

    service.undo_last_delete().unwrap();
    assert_eq!(stored_notes(&store, ACTIVE_KEY)[0].id, note.id);
    assert!(stored_notes(&store, TRASH_KEY).is_empty());
    assert_eq!(store.get(UNDO_KEY).unwrap().as_deref(), Some("null"));
}

#[test]
fn reopen_restores_collections_and_undo_slot() {
    let store = MemoryStore::new();
    let note_id = {
        let mut service = NoteService::open(&store, |_: usize| true).unwrap();
        service.create("keep", "").unwrap();
        let gone = service.create("gone", "").unwrap();
        service.soft_delete(&gone.id).unwrap();
        gone.id
    };

    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    assert_eq!(service.active_notes().len(), 1);
    assert_eq!(service.trash_notes()[0].id, note_id);
    assert!(service.can_undo());

    let restored = service.undo_last_delete().unwrap().unwrap();
    assert_eq!(restored.id, note_id);
    assert_eq!(service.active_notes()[0].id, note_id);
}

#[test]
fn undo_after_external_shrink_appends_at_end() {
    let store = MemoryStore::new();
    let (last_id, top_id) = {
        let mut service = NoteService::open(&store, |_: usize| true).unwrap();
        let last = service.create("last", "").unwrap();
        service.create("mid", "").unwrap();
        let top = service.create("top", "").unwrap();
        service.soft_delete(&last.id).unwrap();
        (last.id, top.id)
    };
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&store.get(UNDO_KEY).unwrap().unwrap())
            .unwrap()["originalIndex"],
        2
    );

    let only_top: Vec<Note> = stored_notes(&store, ACTIVE_KEY)
        .into_iter()
        .filter(|note| note.id == top_id)
        .collect();
    store
        .set(ACTIVE_KEY, &serde_json::to_string(&only_top).unwrap())
        .unwrap();

    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    service.undo_last_delete().unwrap().unwrap();
    let order: Vec<&str> = service
        .active_notes()
        .iter()
        .map(|note| note.id.as_str())
        .collect();
    assert_eq!(order, vec![top_id.as_str(), last_id.as_str()]);
}

#[test]
fn legacy_active_collection_loads_unchanged() {
    let store = MemoryStore::new();
    store
        .set(
            ACTIVE_KEY,
            r#"[{"id":"1712345678901","title":"Nova Nota","content":"oi",
                "createdAt":"2024-04-05T19:34:38.901Z","updatedAt":"2024-04-05T19:35:00.000Z"}]"#,
        )
        .unwrap();

    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    assert_eq!(service.active_notes()[0].id, "1712345678901");
    assert_eq!(service.select_note_by_title("Nova Nota").unwrap().id, "1712345678901");
    assert_eq!(service.active_notes().len(), 1);
}

#[test]
fn corrupt_collection_is_reported_not_replaced() {
    let store = MemoryStore::new();
    store.set(TRASH_KEY, "{not json").unwrap();

    let err = NoteService::open(&store, |_: usize| true).err().unwrap();
    match err {
        NoteServiceError::Repo(RepoError::InvalidData { key, .. }) => assert_eq!(key, TRASH_KEY),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.get(TRASH_KEY).unwrap().as_deref(), Some("{not json"));
}

#[test]
fn undecodable_undo_record_loads_as_empty() {
    let store = MemoryStore::new();
    store.set(UNDO_KEY, "garbage").unwrap();
    let service = NoteService::open(&store, |_: usize| true).unwrap();
    assert!(service.undo_entry().is_none());
}

#[test]
fn colliding_keys_are_rejected() {
    let store = MemoryStore::new();
    let config = CoreConfig {
        undo_key: ACTIVE_KEY.to_string(),
        ..CoreConfig::default()
    };
    let clock = minote_core::SystemClock;
    let err = NoteService::open_with(&store, &clock, config, |_: usize| true)
        .err()
        .unwrap();
    assert!(matches!(err, NoteServiceError::InvalidConfig(_)));
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minote.sqlite3");

    let note_id = {
        let store = SqliteKvStore::open(&path).unwrap();
        let mut service = NoteService::open(&store, |_: usize| true).unwrap();
        let note = service.create("durable", "**kept**").unwrap();
        service.soft_delete(&note.id).unwrap();
        note.id
    };

    let store = SqliteKvStore::open(&path).unwrap();
    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    assert_eq!(service.trash_notes()[0].id, note_id);
    let restored = service.restore_from_trash(&note_id).unwrap().unwrap();
    assert_eq!(service.render(&restored.content), "<p><strong>kept</strong></p>");
}

/// Store whose writes fail while `failing` is set.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: Cell<bool>,
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.failing.get() {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }
}

#[test]
fn failed_write_surfaces_error_but_completes_protocol() {
    let store = FlakyStore::default();
    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    let note = service.create("n", "").unwrap();

    store.failing.set(true);
    let err = service.soft_delete(&note.id).unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Repo(RepoError::Store(StoreError::Unavailable(_)))
    ));
    assert!(service.active_notes().is_empty());
    assert_eq!(service.trash_notes()[0].id, note.id);
    assert!(service.can_undo());
    assert_eq!(stored_notes(&store, ACTIVE_KEY).len(), 1);

    store.failing.set(false);
    service.flush().unwrap();
    assert!(stored_notes(&store, ACTIVE_KEY).is_empty());
    assert_eq!(stored_notes(&store, TRASH_KEY)[0].id, note.id);
}

#[test]
fn failures_in_several_collections_surface_once() {
    let store = FlakyStore::default();
    let mut service = NoteService::open(&store, |_: usize| true).unwrap();
    let first = service.create("first", "").unwrap();
    let second = service.create("second", "").unwrap();

    store.failing.set(true);
    assert!(service.soft_delete(&first.id).is_err());

    store.failing.set(false);
    service.update(&second.id, "second", "edited").unwrap();
    assert_eq!(stored_notes(&store, ACTIVE_KEY).len(), 1);
    assert!(store.get(TRASH_KEY).unwrap().is_none());

    service.flush().unwrap();
    assert_eq!(stored_notes(&store, TRASH_KEY)[0].id, first.id);
}
