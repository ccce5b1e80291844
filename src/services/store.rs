//! Snippet storage backends.
//!
//! DESIGN
//! ======
//! The library talks to storage through [`SnippetRepository`]. Three
//! backends implement it:
//!
//! - [`MemoryStore`]: process-local, used by tests and ephemeral runs.
//! - [`JsonFileStore`]: one JSON array on disk, read once at open and fully
//!   rewritten on every mutation.
//! - [`PgStore`]: the `saved_snippets` table, selected when `DATABASE_URL`
//!   is configured.
//!
//! ERROR HANDLING
//! ==============
//! A JSON file that exists but does not parse is reported as
//! [`StoreError::Corrupt`] at open time and never overwritten. File writes
//! go through a temporary sibling and a rename, so a failed write leaves the
//! previous array intact and the in-memory list unchanged.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

/// A named, persisted piece of embed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSnippet {
    pub id: Uuid,
    pub name: String,
    pub html: String,
    pub css: String,
    pub js: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified: OffsetDateTime,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snippet store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snippet store at {path} is not a valid snippet array: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snippet encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_STORE_IO",
            Self::Corrupt { .. } => "E_STORE_CORRUPT",
            Self::Encode(_) => "E_STORE_ENCODE",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Database(_))
    }
}

/// Storage seam for saved snippets. `put` inserts or replaces by id;
/// `replace` only overwrites a snippet that is still stored.
#[async_trait::async_trait]
pub trait SnippetRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<SavedSnippet>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<SavedSnippet>, StoreError>;
    async fn put(&self, snippet: SavedSnippet) -> Result<(), StoreError>;
    /// Returns whether a stored snippet was overwritten. A missing id is left
    /// missing.
    async fn replace(&self, snippet: SavedSnippet) -> Result<bool, StoreError>;
    /// Returns whether a snippet was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

fn upsert(items: &mut Vec<SavedSnippet>, snippet: SavedSnippet) {
    match items.iter_mut().find(|s| s.id == snippet.id) {
        Some(slot) => *slot = snippet,
        None => items.push(snippet),
    }
}

fn overwrite(items: &mut [SavedSnippet], snippet: SavedSnippet) -> bool {
    match items.iter_mut().find(|s| s.id == snippet.id) {
        Some(slot) => {
            *slot = snippet;
            true
        }
        None => false,
    }
}

fn remove(items: &mut Vec<SavedSnippet>, id: Uuid) -> bool {
    let before = items.len();
    items.retain(|s| s.id != id);
    items.len() != before
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<Vec<SavedSnippet>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SnippetRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<SavedSnippet>, StoreError> {
        Ok(self.items.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedSnippet>, StoreError> {
        Ok(self.items.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn put(&self, snippet: SavedSnippet) -> Result<(), StoreError> {
        upsert(&mut *self.items.write().await, snippet);
        Ok(())
    }

    async fn replace(&self, snippet: SavedSnippet) -> Result<bool, StoreError> {
        Ok(overwrite(&mut *self.items.write().await, snippet))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(remove(&mut *self.items.write().await, id))
    }
}

// =============================================================================
// JSON FILE
// =============================================================================

pub struct JsonFileStore {
    path: PathBuf,
    items: RwLock<Vec<SavedSnippet>>,
}

impl JsonFileStore {
    /// Load the snippet array at `path`. A missing file is an empty library.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Corrupt`] if it does not hold a snippet array.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let items = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice::<Vec<SavedSnippet>>(&bytes)
                .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        info!(path = %path.display(), count = items.len(), "snippet store loaded");
        Ok(Self { path, items: RwLock::new(items) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the list, persist it, then publish it.
    /// When `mutate` reports no change nothing is written.
    async fn mutate(&self, mutate: impl FnOnce(&mut Vec<SavedSnippet>) -> bool) -> Result<bool, StoreError> {
        let mut guard = self.items.write().await;
        let mut next = guard.clone();
        if !mutate(&mut next) {
            return Ok(false);
        }
        write_array(&self.path, &next).await?;
        *guard = next;
        Ok(true)
    }
}

async fn write_array(path: &Path, items: &[SavedSnippet]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };
    let bytes = serde_json::to_vec_pretty(items)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    debug!(path = %path.display(), count = items.len(), bytes = bytes.len(), "snippet store written");
    Ok(())
}

#[async_trait::async_trait]
impl SnippetRepository for JsonFileStore {
    async fn list(&self) -> Result<Vec<SavedSnippet>, StoreError> {
        Ok(self.items.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedSnippet>, StoreError> {
        Ok(self.items.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn put(&self, snippet: SavedSnippet) -> Result<(), StoreError> {
        self.mutate(|items| {
            upsert(items, snippet);
            true
        })
        .await?;
        Ok(())
    }

    async fn replace(&self, snippet: SavedSnippet) -> Result<bool, StoreError> {
        self.mutate(|items| overwrite(items, snippet)).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.mutate(|items| remove(items, id)).await
    }
}

// =============================================================================
// POSTGRES
// =============================================================================

type SnippetRow = (Uuid, String, String, String, String, OffsetDateTime, OffsetDateTime);

fn from_row((id, name, html, css, js, created, modified): SnippetRow) -> SavedSnippet {
    SavedSnippet { id, name, html, css, js, created, modified }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SnippetRepository for PgStore {
    async fn list(&self) -> Result<Vec<SavedSnippet>, StoreError> {
        let rows = sqlx::query_as::<_, SnippetRow>(
            "SELECT id, name, html, css, js, created_at, modified_at FROM saved_snippets",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedSnippet>, StoreError> {
        let row = sqlx::query_as::<_, SnippetRow>(
            "SELECT id, name, html, css, js, created_at, modified_at FROM saved_snippets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(from_row))
    }

    async fn put(&self, snippet: SavedSnippet) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO saved_snippets (id, name, html, css, js, created_at, modified_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, html = EXCLUDED.html, \
             css = EXCLUDED.css, js = EXCLUDED.js, modified_at = EXCLUDED.modified_at",
        )
        .bind(snippet.id)
        .bind(&snippet.name)
        .bind(&snippet.html)
        .bind(&snippet.css)
        .bind(&snippet.js)
        .bind(snippet.created)
        .bind(snippet.modified)
        .execute(&self.pool)
        .await?;
        debug!(snippet_id = %snippet.id, "snippet upserted");
        Ok(())
    }

    async fn replace(&self, snippet: SavedSnippet) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE saved_snippets SET name = $2, html = $3, css = $4, js = $5, modified_at = $6 \
             WHERE id = $1",
        )
        .bind(snippet.id)
        .bind(&snippet.name)
        .bind(&snippet.html)
        .bind(&snippet.css)
        .bind(&snippet.js)
        .bind(snippet.modified)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM saved_snippets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
