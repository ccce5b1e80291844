//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own storage, debouncing and third-party lookups so route
//! handlers stay focused on request parsing and status mapping. Widget
//! compilation itself lives in the `widgets` crate.

pub mod autosave;
pub mod instagram;
pub mod library;
pub mod lookup;
pub mod reviews;
pub mod store;
