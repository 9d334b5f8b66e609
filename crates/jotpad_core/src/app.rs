//! Composition point: builds the storage backend and the note store.

use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::repo::note_repo::{RepoError, SqliteNoteRepository};
use crate::service::note_store::NoteStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AppError {
    Db(DbError),
    Repo(RepoError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "failed to open notes database: {err}"),
            Self::Repo(err) => write!(f, "failed to load notes: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Opens the configured database and returns a store with its initial
/// snapshot loaded.
pub fn open_note_store(config: &CoreConfig) -> Result<NoteStore<SqliteNoteRepository>, AppError> {
    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteNoteRepository::try_new(conn)?;
    let store = NoteStore::new(repo)?;
    info!(
        "event=store_open module=app status=ok persistent={} count={}",
        config.db_path.is_some(),
        store.notes().len()
    );
    Ok(store)
}
