//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into store-level commands.
//! - Keep callers decoupled from storage details.

pub mod note_store;
