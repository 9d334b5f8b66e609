//! Core of the jotpad note keeper.
//!
//! Notes live in a SQLite table; [`NoteStore`] forwards mutations to it and
//! republishes the full, deduplicated note list to subscribers after each one.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use app::{open_note_store, AppError};
pub use config::CoreConfig;
pub use db::codec::{record_to_timestamp, timestamp_to_record};
pub use db::DbError;
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use repo::live::LiveQuery;
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_store::{NoteStore, NotesSubscription};

/// Minimal health-check API for wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
