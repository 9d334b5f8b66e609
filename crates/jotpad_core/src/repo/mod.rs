//! Storage backend for notes.
//!
//! # Responsibility
//! - Define the note persistence contract.
//! - Isolate SQLite query details from the note store.
//! - Provide continuous queries on top of one-shot reads.

pub mod live;
pub mod note_repo;
