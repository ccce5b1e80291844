//! Debounced draft saving.
//!
//! DESIGN
//! ======
//! Each snippet with an unsaved draft owns one spawned task that sleeps for
//! the debounce window and then writes the draft through the [`Library`].
//! A newer draft for the same snippet aborts the pending task and spawns a
//! replacement, so only the last edit in a burst is written.
//!
//! A task detaches itself from the pending map before it writes. Once a
//! save has started it runs to completion even if another draft arrives.
//! [`Autosave::shutdown`] aborts every task still waiting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::library::{Library, LibraryError, SnippetPatch};

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct Autosave {
    library: Arc<Library>,
    debounce: Duration,
    pending: Arc<Mutex<HashMap<Uuid, Pending>>>,
    next_generation: Arc<AtomicU64>,
}

impl Autosave {
    #[must_use]
    pub fn new(library: Arc<Library>, debounce: Duration) -> Self {
        Self {
            library,
            debounce,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Pending>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `draft` for `id`, replacing any draft still waiting.
    pub fn schedule(&self, id: Uuid, draft: SnippetPatch) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut pending = self.lock();

        let this = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;
            this.detach(id, generation);
            match this.library.update(id, draft, OffsetDateTime::now_utc()).await {
                Ok(_) => debug!(snippet_id = %id, "draft autosaved"),
                Err(LibraryError::NotFound(_)) => debug!(snippet_id = %id, "draft dropped, snippet deleted"),
                Err(e) => warn!(snippet_id = %id, error = %e, "draft autosave failed"),
            }
        });

        if let Some(previous) = pending.insert(id, Pending { generation, handle }) {
            previous.handle.abort();
            debug!(snippet_id = %id, "pending draft superseded");
        }
    }

    fn detach(&self, id: Uuid, generation: u64) {
        let mut pending = self.lock();
        if pending.get(&id).is_some_and(|p| p.generation == generation) {
            pending.remove(&id);
        }
    }

    /// Drop the waiting draft for `id`, if any. Returns whether one existed.
    pub fn cancel(&self, id: Uuid) -> bool {
        match self.lock().remove(&id) {
            Some(p) => {
                p.handle.abort();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    /// Abort every waiting draft.
    pub fn shutdown(&self) {
        let drained: Vec<_> = self.lock().drain().collect();
        for (_, p) in &drained {
            p.handle.abort();
        }
        info!(cancelled = drained.len(), "autosave stopped");
    }
}

#[cfg(test)]
#[path = "autosave_test.rs"]
mod tests;
