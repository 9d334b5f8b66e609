//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD over the `notes` table.
//! - Publish a table change feed that backs continuous queries.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `update` never touches `id` or `entry_date` of an existing row.
//! - Lists are ordered by `entry_date ASC, id ASC`.
//! - Every successful write advances the change feed, even when no row was
//!   affected.

use crate::db::codec::{record_to_timestamp, timestamp_to_record};
use crate::db::migrations::apply_migrations;
use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::repo::live::LiveQuery;
use log::debug;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT id, title, description, entry_date FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage backend for notes.
pub trait NoteRepository {
    /// Inserts a note, replacing any stored note with the same id.
    fn insert_or_replace(&self, note: &Note) -> RepoResult<()>;
    /// Replaces title/description of the note with the same id, inserting it
    /// when absent.
    fn update(&self, note: &Note) -> RepoResult<()>;
    /// Removes every note.
    fn delete_all(&self) -> RepoResult<()>;
    /// Removes the note with the same id; absent notes are ignored.
    fn delete_note(&self, note: &Note) -> RepoResult<()>;
    /// Reads the full ordered collection once.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Reads one note once.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Change feed advanced after every successful write.
    fn table_changes(&self) -> watch::Receiver<u64>;

    /// Continuous query over the full ordered collection.
    fn watch_notes(&self) -> LiveQuery<Vec<Note>>
    where
        Self: Clone + Send + Sync + Sized + 'static,
    {
        let repo = self.clone();
        LiveQuery::new(self.table_changes(), move || repo.list_notes())
    }

    /// Continuous query over one note; yields `None` while it is absent.
    fn watch_note(&self, id: NoteId) -> LiveQuery<Option<Note>>
    where
        Self: Clone + Send + Sync + Sized + 'static,
    {
        let repo = self.clone();
        LiveQuery::new(self.table_changes(), move || repo.get_note(id))
    }
}

/// SQLite-backed note repository.
///
/// Cloning is cheap; all clones share one connection and one change feed.
#[derive(Clone, Debug)]
pub struct SqliteNoteRepository {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    conn: Mutex<Connection>,
    changes: watch::Sender<u64>,
}

impl SqliteNoteRepository {
    /// Wraps a connection, applying any pending schema migrations first.
    pub fn try_new(mut conn: Connection) -> RepoResult<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self {
            shared: Arc::new(Shared {
                conn: Mutex::new(conn),
                changes: watch::Sender::new(0),
            }),
        })
    }

    /// Runs `f` with the underlying connection.
    ///
    /// Writes made here do not advance the change feed.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> RepoResult<T> {
        let conn = self.shared.conn.lock();
        Ok(f(&conn)?)
    }

    fn notify_changed(&self, op: &'static str) {
        self.shared
            .changes
            .send_modify(|version| *version = version.wrapping_add(1));
        debug!(
            "event=notes_changed module=repo op={op} version={}",
            *self.shared.changes.borrow()
        );
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn insert_or_replace(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        {
            let conn = self.shared.conn.lock();
            conn.execute(
                "INSERT OR REPLACE INTO notes (id, title, description, entry_date)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    note.id.to_string(),
                    note.title.as_str(),
                    note.description.as_str(),
                    timestamp_to_record(note.entry_date),
                ],
            )?;
        }

        self.notify_changed("insert_or_replace");
        Ok(())
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        {
            let mut conn = self.shared.conn.lock();
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE notes SET title = ?1, description = ?2 WHERE id = ?3;",
                params![
                    note.title.as_str(),
                    note.description.as_str(),
                    note.id.to_string(),
                ],
            )?;
            if changed == 0 {
                tx.execute(
                    "INSERT INTO notes (id, title, description, entry_date)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        note.id.to_string(),
                        note.title.as_str(),
                        note.description.as_str(),
                        timestamp_to_record(note.entry_date),
                    ],
                )?;
            }
            tx.commit()?;
        }

        self.notify_changed("update");
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        {
            let conn = self.shared.conn.lock();
            conn.execute("DELETE FROM notes;", [])?;
        }

        self.notify_changed("delete_all");
        Ok(())
    }

    fn delete_note(&self, note: &Note) -> RepoResult<()> {
        {
            let conn = self.shared.conn.lock();
            conn.execute("DELETE FROM notes WHERE id = ?1;", [note.id.to_string()])?;
        }

        self.notify_changed("delete_note");
        Ok(())
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let conn = self.shared.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY entry_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let conn = self.shared.conn.lock();
        let raw = conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                RawNoteRow::from_row,
            )
            .optional()?;
        raw.map(RawNoteRow::into_note).transpose()
    }

    fn table_changes(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }
}

struct RawNoteRow {
    id: String,
    title: String,
    description: String,
    entry_date: i64,
}

impl RawNoteRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            entry_date: row.get("entry_date")?,
        })
    }

    fn into_note(self) -> RepoResult<Note> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{}` in notes.id", self.id))
        })?;
        let entry_date = record_to_timestamp(self.entry_date).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "out of range timestamp `{}` in notes.entry_date",
                self.entry_date
            ))
        })?;

        let note = Note {
            id,
            title: self.title,
            description: self.description,
            entry_date,
        };
        note.validate()?;
        Ok(note)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    RawNoteRow::from_row(row)?.into_note()
}
