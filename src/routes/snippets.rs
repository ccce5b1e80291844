//! Snippet library routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::library::{
    LibraryError, NewSnippet, SnippetListing, SnippetPatch, preview_data_url, preview_document,
    relative_time,
};
use crate::services::store::SavedSnippet;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    #[serde(flatten)]
    pub snippet: SavedSnippet,
    pub modified_label: String,
    /// `data:text/html;base64,...` URL of the live preview document.
    pub preview_url: String,
}

impl SnippetResponse {
    fn new(snippet: SavedSnippet, now: OffsetDateTime) -> Self {
        let document = preview_document(&snippet.html, &snippet.css, &snippet.js);
        Self { modified_label: relative_time(snippet.modified, now), preview_url: preview_data_url(&document), snippet }
    }
}

#[derive(Debug, Serialize)]
pub struct DraftAccepted {
    pub id: Uuid,
    pub debounce_ms: u64,
}

pub(crate) fn library_error_to_status(err: &LibraryError) -> StatusCode {
    match err {
        LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn library_error(err: LibraryError) -> ApiError {
    ApiError::new(library_error_to_status(&err), &err)
}

/// `GET /api/snippets`: most recently modified first.
pub async fn list_snippets(State(state): State<AppState>) -> Result<Json<Vec<SnippetListing>>, ApiError> {
    state.library.listings(OffsetDateTime::now_utc()).await.map(Json).map_err(library_error)
}

/// `POST /api/snippets`
pub async fn create_snippet(
    State(state): State<AppState>,
    Json(body): Json<NewSnippet>,
) -> Result<(StatusCode, Json<SnippetResponse>), ApiError> {
    let now = OffsetDateTime::now_utc();
    let snippet = state.library.create(body, now).await.map_err(library_error)?;
    Ok((StatusCode::CREATED, Json(SnippetResponse::new(snippet, now))))
}

/// `GET /api/snippets/{id}`
pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SnippetResponse>, ApiError> {
    let snippet = state.library.get(id).await.map_err(library_error)?;
    Ok(Json(SnippetResponse::new(snippet, OffsetDateTime::now_utc())))
}

/// `PATCH /api/snippets/{id}`: immediate partial update.
///
/// Supersedes any draft still waiting for this snippet.
pub async fn update_snippet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SnippetPatch>,
) -> Result<Json<SnippetResponse>, ApiError> {
    state.autosave.cancel(id);
    let now = OffsetDateTime::now_utc();
    let snippet = state.library.update(id, patch, now).await.map_err(library_error)?;
    Ok(Json(SnippetResponse::new(snippet, now)))
}

/// `DELETE /api/snippets/{id}`
pub async fn delete_snippet(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.autosave.cancel(id);
    state.library.delete(id).await.map_err(library_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/snippets/{id}/draft`: debounced save; last draft wins.
pub async fn save_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SnippetPatch>,
) -> Result<(StatusCode, Json<DraftAccepted>), ApiError> {
    state.library.get(id).await.map_err(library_error)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("E_EMPTY_DRAFT", "draft has no fields to save"));
    }
    state.autosave.schedule(id, patch);
    tracing::debug!(snippet_id = %id, pending = state.autosave.pending_count(), "draft queued");
    let debounce_ms = u64::try_from(state.autosave.debounce().as_millis()).unwrap_or(u64::MAX);
    Ok((StatusCode::ACCEPTED, Json(DraftAccepted { id, debounce_ms })))
}

/// `GET /api/snippets/{id}/export`: combined block as a downloadable file.
pub async fn export_snippet(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let export = state.library.export(id).await.map_err(library_error)?;
    let disposition = format!("attachment; filename=\"{}.html\"", file_stem(&export.name));
    Ok(([(CONTENT_TYPE, "text/html; charset=utf-8".to_string()), (CONTENT_DISPOSITION, disposition)], export.body)
        .into_response())
}

/// `GET /api/snippets/{id}/preview`: live preview document.
pub async fn preview_snippet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    state.library.preview(id).await.map(Html).map_err(library_error)
}

/// Lowercase ASCII slug for download names.
fn file_stem(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "snippet".to_string() } else { slug }
}

#[cfg(test)]
#[path = "snippets_test.rs"]
mod tests;
