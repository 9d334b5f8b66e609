//! Reactive note store.
//!
//! # Responsibility
//! - Forward note mutations to the storage backend.
//! - Re-read the full collection after each mutation and publish it to
//!   subscribers when it differs from the last published snapshot.
//!
//! # Invariants
//! - Within one mutation the write completes before the refresh starts.
//! - A failed write or read publishes nothing; the previous snapshot stays.
//! - Consecutive equal snapshots are published once.
//!
//! # Concurrency
//! Mutations are not serialized against each other. Two mutations running on
//! different threads may interleave their writes and refreshes, and the
//! snapshot from whichever refresh publishes last wins, even if it was read
//! before the other write landed. Call [`NoteStore::refresh`] to resync.

use crate::model::note::{Note, NoteId};
use crate::repo::live::LiveQuery;
use crate::repo::note_repo::{NoteRepository, RepoResult};
use log::{error, info};
use tokio::sync::watch;

/// Live view of all notes plus the mutation commands that keep it current.
#[derive(Debug)]
pub struct NoteStore<R: NoteRepository> {
    repo: R,
    snapshot: watch::Sender<Vec<Note>>,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Creates a store and publishes the initial snapshot.
    pub fn new(repo: R) -> RepoResult<Self> {
        let store = Self {
            repo,
            snapshot: watch::Sender::new(Vec::new()),
        };
        store.refresh()?;
        Ok(store)
    }

    /// Inserts a note (replacing one with the same id) and refreshes.
    pub fn add_note(&self, note: &Note) -> RepoResult<()> {
        self.mutate("add_note", |repo| repo.insert_or_replace(note))
    }

    /// Replaces title/description of a note and refreshes.
    pub fn update_note(&self, note: &Note) -> RepoResult<()> {
        self.mutate("update_note", |repo| repo.update(note))
    }

    /// Deletes one note and refreshes. Absent notes are not an error.
    pub fn remove_note(&self, note: &Note) -> RepoResult<()> {
        self.mutate("remove_note", |repo| repo.delete_note(note))
    }

    /// Deletes every note and refreshes.
    pub fn delete_all_notes(&self) -> RepoResult<()> {
        self.mutate("delete_all_notes", |repo| repo.delete_all())
    }

    /// Re-reads all notes and publishes them if they changed.
    ///
    /// Returns whether a new snapshot was published.
    pub fn refresh(&self) -> RepoResult<bool> {
        let notes = self.repo.list_notes().inspect_err(|err| {
            error!("event=notes_refresh module=store status=error error={err}");
        })?;
        let count = notes.len();

        let published = self.snapshot.send_if_modified(|current| {
            if *current == notes {
                return false;
            }
            *current = notes;
            true
        });

        info!(
            "event=notes_refresh module=store status=ok count={count} published={published} subscribers={}",
            self.snapshot.receiver_count()
        );
        Ok(published)
    }

    /// Returns the most recently published snapshot.
    pub fn notes(&self) -> Vec<Note> {
        self.snapshot.borrow().clone()
    }

    /// Attaches a subscriber. Its first read replays the current snapshot.
    pub fn subscribe(&self) -> NotesSubscription {
        let mut receiver = self.snapshot.subscribe();
        receiver.mark_changed();
        NotesSubscription { receiver }
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.snapshot.receiver_count()
    }

    /// Looks up one note directly in storage.
    pub fn note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    fn mutate(&self, op: &'static str, write: impl FnOnce(&R) -> RepoResult<()>) -> RepoResult<()> {
        if let Err(err) = write(&self.repo) {
            error!("event={op} module=store status=error error={err}");
            return Err(err);
        }
        info!("event={op} module=store status=ok");
        self.refresh().map(|_| ())
    }
}

impl<R> NoteStore<R>
where
    R: NoteRepository + Clone + Send + Sync + 'static,
{
    /// Continuous lookup of one note, re-evaluated on every storage write.
    pub fn watch_note(&self, id: NoteId) -> LiveQuery<Option<Note>> {
        self.repo.watch_note(id)
    }
}

/// Subscriber handle for the published notes snapshot.
///
/// Dropping it detaches the subscriber.
pub struct NotesSubscription {
    receiver: watch::Receiver<Vec<Note>>,
}

impl NotesSubscription {
    /// Returns the latest snapshot and marks it as seen.
    pub fn latest(&mut self) -> Vec<Note> {
        self.receiver.borrow_and_update().clone()
    }

    /// Returns a snapshot not yet seen by this subscriber, if any.
    ///
    /// Only the newest snapshot is kept; intermediate ones are skipped.
    pub fn try_recv(&mut self) -> Option<Vec<Note>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.latest()),
            _ => None,
        }
    }

    /// Waits for a snapshot not yet seen by this subscriber.
    ///
    /// Returns `None` once the store is dropped.
    pub async fn recv(&mut self) -> Option<Vec<Note>> {
        self.receiver.changed().await.ok()?;
        Some(self.latest())
    }
}
