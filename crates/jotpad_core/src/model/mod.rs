//! Domain model for notes.
//!
//! # Responsibility
//! - Define the note record persisted by storage and published by the store.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
