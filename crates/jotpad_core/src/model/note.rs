//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record shared by storage and subscribers.
//! - Provide the defensive field check used on every storage write/read.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `entry_date` is assigned once at creation and kept by edits.
//! - `entry_date` carries millisecond precision only, matching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note.
pub type NoteId = Uuid;

/// Validation errors for note fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyDescription,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title must not be blank"),
            Self::EmptyDescription => write!(f, "note description must not be blank"),
        }
    }
}

impl Error for NoteValidationError {}

/// A single user-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: String,
    /// Serialized as epoch milliseconds, same as the `notes.entry_date` column.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub entry_date: DateTime<Utc>,
}

impl Note {
    /// Creates a note with a generated id, stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, description, now_millis())
    }

    /// Creates a note with a caller-provided identity and entry date.
    ///
    /// The entry date is truncated to millisecond precision.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        description: impl Into<String>,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            entry_date: truncate_to_millis(entry_date),
        }
    }

    /// Returns a copy with replaced text fields; `id` and `entry_date` are kept.
    pub fn edited(&self, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: self.id,
            title: title.into(),
            description: description.into(),
            entry_date: self.entry_date,
        }
    }

    /// Rejects notes with blank title or description.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(NoteValidationError::EmptyDescription);
        }
        Ok(())
    }
}

fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteValidationError};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn new_note_has_millisecond_entry_date() {
        let note = Note::new("Groceries", "Milk, eggs");
        assert_eq!(note.entry_date.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn with_id_truncates_sub_millisecond_precision() {
        let raw = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let note = Note::with_id(Uuid::new_v4(), "t", "d", raw);
        assert_eq!(note.entry_date.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn edited_keeps_identity_and_entry_date() {
        let note = Note::new("Groceries", "Milk, eggs");
        let edited = note.edited("Groceries v2", "Milk, eggs, bread");
        assert_eq!(edited.id, note.id);
        assert_eq!(edited.entry_date, note.entry_date);
        assert_eq!(edited.title, "Groceries v2");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            Note::new("  ", "body").validate(),
            Err(NoteValidationError::EmptyTitle)
        );
        assert_eq!(
            Note::new("title", "\n\t").validate(),
            Err(NoteValidationError::EmptyDescription)
        );
        assert!(Note::new("title", "body").validate().is_ok());
    }

    #[test]
    fn serializes_entry_date_as_epoch_millis() {
        let entry_date = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let note = Note::with_id(Uuid::nil(), "t", "d", entry_date);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["entry_date"], 1_700_000_000_123_i64);
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }
}
