//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the snippet library, the autosave scheduler that writes drafts into
//! it, and the two third-party lookup seams. Both lookups are trait objects
//! so tests can swap in fixed responses.

use std::sync::Arc;
use std::time::Duration;

use crate::services::autosave::Autosave;
use crate::services::instagram::ProfileSource;
use crate::services::library::Library;
use crate::services::reviews::PlacesLookup;
use crate::services::store::SnippetRepository;

/// Clone is required by Axum; all fields are Arc-backed.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library>,
    pub autosave: Autosave,
    pub places: Arc<dyn PlacesLookup>,
    pub instagram: Arc<dyn ProfileSource>,
}

impl AppState {
    #[must_use]
    pub fn new(
        repo: Arc<dyn SnippetRepository>,
        autosave_debounce: Duration,
        places: Arc<dyn PlacesLookup>,
        instagram: Arc<dyn ProfileSource>,
    ) -> Self {
        let library = Arc::new(Library::new(repo));
        let autosave = Autosave::new(library.clone(), autosave_debounce);
        Self { library, autosave, places, instagram }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
