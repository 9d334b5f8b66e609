//! Continuous queries driven by a repository change feed.
//!
//! # Invariants
//! - The first read of a fresh query always yields the current result.
//! - Later reads re-run the query only after the feed advanced.
//! - Several writes between two reads collapse into one result.

use crate::repo::note_repo::RepoResult;
use tokio::sync::watch;

type Fetch<T> = Box<dyn Fn() -> RepoResult<T> + Send + Sync>;

/// A lazily re-evaluated storage query.
///
/// Each subscriber owns its own query; creating a new one restarts the
/// sequence from the current table state.
pub struct LiveQuery<T> {
    changes: watch::Receiver<u64>,
    fetch: Fetch<T>,
    primed: bool,
}

impl<T> LiveQuery<T> {
    pub fn new(
        changes: watch::Receiver<u64>,
        fetch: impl Fn() -> RepoResult<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            changes,
            fetch: Box::new(fetch),
            primed: false,
        }
    }

    /// Runs the query now and marks all pending changes as seen.
    pub fn current(&mut self) -> RepoResult<T> {
        self.primed = true;
        self.changes.borrow_and_update();
        (self.fetch)()
    }

    /// Returns a fresh result if this is the first read or the table changed
    /// since the previous read; `Ok(None)` otherwise.
    pub fn try_next(&mut self) -> RepoResult<Option<T>> {
        if !self.primed || self.changes.has_changed().unwrap_or(false) {
            return self.current().map(Some);
        }
        Ok(None)
    }

    /// Waits for the next result.
    ///
    /// Returns `None` once the change feed is closed.
    pub async fn next(&mut self) -> Option<RepoResult<T>> {
        if self.primed && self.changes.changed().await.is_err() {
            return None;
        }
        Some(self.current())
    }
}
