//! Snippet library service.
//!
//! DESIGN
//! ======
//! CRUD over [`SavedSnippet`] on top of any [`SnippetRepository`], plus the
//! read-side helpers the library UI needs: combined export block, preview
//! document, preview `data:` URL, and relative "modified" labels.
//!
//! Every operation takes `now` explicitly so timestamps and labels are
//! testable without a clock.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::store::{SavedSnippet, SnippetRepository, StoreError};

pub const DEFAULT_SNIPPET_NAME: &str = "Untitled Snippet";

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("snippet not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for LibraryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::NotFound(_) => false,
            Self::Store(e) => e.retryable(),
        }
    }
}

// =============================================================================
// INPUTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewSnippet {
    pub name: Option<String>,
    pub html: String,
    pub css: String,
    pub js: String,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SnippetPatch {
    pub name: Option<String>,
    pub html: Option<String>,
    pub css: Option<String>,
    pub js: Option<String>,
}

impl SnippetPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.html.is_none() && self.css.is_none() && self.js.is_none()
    }

    /// Apply the present fields and bump `modified`.
    pub fn apply(self, snippet: &mut SavedSnippet, now: OffsetDateTime) {
        if let Some(name) = self.name {
            snippet.name = normalize_name(Some(name));
        }
        if let Some(html) = self.html {
            snippet.html = html;
        }
        if let Some(css) = self.css {
            snippet.css = css;
        }
        if let Some(js) = self.js {
            snippet.js = js;
        }
        snippet.modified = now;
    }
}

fn normalize_name(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_SNIPPET_NAME.to_string())
}

/// A snippet plus its relative "modified" label, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetListing {
    #[serde(flatten)]
    pub snippet: SavedSnippet,
    pub modified_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetExport {
    pub name: String,
    pub body: String,
}

// =============================================================================
// LIBRARY
// =============================================================================

pub struct Library {
    repo: Arc<dyn SnippetRepository>,
}

impl Library {
    #[must_use]
    pub fn new(repo: Arc<dyn SnippetRepository>) -> Self {
        Self { repo }
    }

    /// All snippets, most recently modified first.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn list(&self) -> Result<Vec<SavedSnippet>, LibraryError> {
        let mut items = self.repo.list().await?;
        items.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(items)
    }

    /// [`Library::list`] with relative labels computed at `now`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn listings(&self, now: OffsetDateTime) -> Result<Vec<SnippetListing>, LibraryError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .map(|snippet| SnippetListing { modified_label: relative_time(snippet.modified, now), snippet })
            .collect())
    }

    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn create(&self, input: NewSnippet, now: OffsetDateTime) -> Result<SavedSnippet, LibraryError> {
        let snippet = SavedSnippet {
            id: Uuid::new_v4(),
            name: normalize_name(input.name),
            html: input.html,
            css: input.css,
            js: input.js,
            created: now,
            modified: now,
        };
        self.repo.put(snippet.clone()).await?;
        info!(snippet_id = %snippet.id, name = %snippet.name, "snippet created");
        Ok(snippet)
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] for unknown ids.
    pub async fn get(&self, id: Uuid) -> Result<SavedSnippet, LibraryError> {
        self.repo.get(id).await?.ok_or(LibraryError::NotFound(id))
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] for unknown ids, including a
    /// snippet deleted while the update was in flight.
    pub async fn update(&self, id: Uuid, patch: SnippetPatch, now: OffsetDateTime) -> Result<SavedSnippet, LibraryError> {
        let mut snippet = self.get(id).await?;
        patch.apply(&mut snippet, now);
        if !self.repo.replace(snippet.clone()).await? {
            return Err(LibraryError::NotFound(id));
        }
        info!(snippet_id = %id, "snippet updated");
        Ok(snippet)
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] for unknown ids.
    pub async fn delete(&self, id: Uuid) -> Result<(), LibraryError> {
        if !self.repo.delete(id).await? {
            return Err(LibraryError::NotFound(id));
        }
        info!(snippet_id = %id, "snippet deleted");
        Ok(())
    }

    /// Combined embed block for `id`, named after the snippet.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] for unknown ids.
    pub async fn export(&self, id: Uuid) -> Result<SnippetExport, LibraryError> {
        let s = self.get(id).await?;
        Ok(SnippetExport { body: export_block(&s.html, &s.css, &s.js), name: s.name })
    }

    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] for unknown ids.
    pub async fn preview(&self, id: Uuid) -> Result<String, LibraryError> {
        let s = self.get(id).await?;
        Ok(preview_document(&s.html, &s.css, &s.js))
    }
}

// =============================================================================
// RENDERING HELPERS
// =============================================================================

/// `<style>`, markup, `<script>` joined by newlines; empty parts are skipped.
#[must_use]
pub fn export_block(html: &str, css: &str, js: &str) -> String {
    let mut parts = Vec::with_capacity(3);
    if !css.trim().is_empty() {
        parts.push(format!("<style>{css}</style>"));
    }
    if !html.trim().is_empty() {
        parts.push(html.to_string());
    }
    if !js.trim().is_empty() {
        parts.push(format!("<script>{js}</script>"));
    }
    parts.join("\n")
}

/// Standalone document that runs the snippet, as the library preview pane does.
#[must_use]
pub fn preview_document(html: &str, css: &str, js: &str) -> String {
    let mut doc = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    if !css.trim().is_empty() {
        doc.push_str(&format!("<style>{css}</style>\n"));
    }
    doc.push_str("</head>\n<body>\n");
    doc.push_str(html);
    doc.push('\n');
    if !js.trim().is_empty() {
        doc.push_str(&format!("<script>{js}</script>\n"));
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

#[must_use]
pub fn preview_data_url(document: &str) -> String {
    format!("data:text/html;base64,{}", STANDARD.encode(document.as_bytes()))
}

/// Human label for how long ago `then` was, relative to `now`.
///
/// Under a minute (or in the future) is "just now"; minutes, hours and days
/// follow; a week or more falls back to the calendar date.
#[must_use]
pub fn relative_time(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let secs = (now - then).whole_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return plural(days, "day");
    }
    then.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| then.date().to_string())
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 { format!("1 {unit} ago") } else { format!("{n} {unit}s ago") }
}

#[cfg(test)]
#[path = "library_test.rs"]
mod tests;
