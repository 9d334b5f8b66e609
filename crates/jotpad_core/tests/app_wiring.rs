use jotpad_core::{open_note_store, CoreConfig, Note};

#[test]
fn default_config_opens_empty_in_memory_store() {
    let store = open_note_store(&CoreConfig::default()).unwrap();
    assert!(store.notes().is_empty());
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: Some(dir.path().join("notes.db")),
        ..CoreConfig::default()
    };
    let note = Note::new("Groceries", "Milk, eggs");

    {
        let store = open_note_store(&config).unwrap();
        store.add_note(&note).unwrap();
    }

    let reopened = open_note_store(&config).unwrap();
    assert_eq!(reopened.notes(), vec![note]);
}

#[test]
fn unreadable_database_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: Some(dir.path().join("missing-dir").join("notes.db")),
        ..CoreConfig::default()
    };

    let err = open_note_store(&config).unwrap_err();
    assert!(err.to_string().contains("failed to open notes database"));
}
