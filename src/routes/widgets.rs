//! Widget compiler routes.
//!
//! Stateless: every handler resolves the kind tag through the registry and
//! hands the request body to the `widgets` crate.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use widgets::{WidgetError, WidgetKind, registry};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct WidgetSummary {
    pub kind: WidgetKind,
    pub label: &'static str,
    pub description: &'static str,
    /// Whether the kind has an editable item list.
    pub has_items: bool,
}

#[derive(Debug, Serialize)]
pub struct CompileResponse {
    pub kind: WidgetKind,
    pub instance_id: String,
    pub html: String,
    pub css: String,
    pub js: String,
    pub embed: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// Evaluate time-dependent state at this instant instead of now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub at: Option<OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddItemQuery {
    /// Item type for kinds with several, e.g. a popup builder block type.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

pub(crate) fn widget_error_to_status(err: &WidgetError) -> StatusCode {
    match err {
        WidgetError::UnknownKind(_) => StatusCode::NOT_FOUND,
        WidgetError::InvalidSettings(_) | WidgetError::NoItemList(_) => StatusCode::BAD_REQUEST,
        WidgetError::LastItem { .. } | WidgetError::IndexOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        WidgetError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn widget_error(err: WidgetError) -> ApiError {
    ApiError::new(widget_error_to_status(&err), &err)
}

fn parse_kind(tag: &str) -> Result<WidgetKind, ApiError> {
    WidgetKind::parse(tag).ok_or_else(|| widget_error(WidgetError::UnknownKind(tag.to_string())))
}

/// `GET /api/widgets`: registry listing in display order.
pub async fn list_widgets() -> Json<Vec<WidgetSummary>> {
    Json(
        registry::entries()
            .iter()
            .map(|e| WidgetSummary {
                kind: e.kind,
                label: e.label,
                description: e.description,
                has_items: e.items.is_some(),
            })
            .collect(),
    )
}

/// `GET /api/widgets/{kind}/defaults`
pub async fn widget_defaults(Path(kind): Path<String>) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    registry::defaults(kind).map(Json).map_err(widget_error)
}

/// `POST /api/widgets/{kind}/compile`: settings in, embed code out.
pub async fn compile_widget(
    Path(kind): Path<String>,
    Json(settings): Json<Value>,
) -> Result<Json<CompileResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let snippet = registry::compile(kind, &settings).map_err(widget_error)?;
    tracing::debug!(%kind, instance_id = %snippet.instance_id, "widget compiled");
    let embed = snippet.embed();
    Ok(Json(CompileResponse {
        kind: snippet.kind,
        instance_id: snippet.instance_id,
        html: snippet.html,
        css: snippet.css,
        js: snippet.js,
        embed,
    }))
}

/// `POST /api/widgets/{kind}/preview`: static preview document.
pub async fn preview_widget(
    Path(kind): Path<String>,
    Query(query): Query<PreviewQuery>,
    Json(settings): Json<Value>,
) -> Result<Html<String>, ApiError> {
    let kind = parse_kind(&kind)?;
    let now = query.at.unwrap_or_else(OffsetDateTime::now_utc);
    registry::preview(kind, &settings, now).map(Html).map_err(widget_error)
}

/// `POST /api/widgets/{kind}/items`: append a default list item.
pub async fn add_widget_item(
    Path(kind): Path<String>,
    Query(query): Query<AddItemQuery>,
    Json(settings): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    registry::add_item(kind, &settings, query.item_type.as_deref()).map(Json).map_err(widget_error)
}

/// `POST /api/widgets/{kind}/items/{index}/remove`: drop one list item.
pub async fn remove_widget_item(
    Path((kind, index)): Path<(String, usize)>,
    Json(settings): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    registry::remove_item(kind, &settings, index).map(Json).map_err(widget_error)
}

/// `POST /api/widgets/{kind}/items/{index}/move/{to}`: reorder one list item.
pub async fn move_widget_item(
    Path((kind, index, to)): Path<(String, usize, usize)>,
    Json(settings): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    registry::move_item(kind, &settings, index, to).map(Json).map_err(widget_error)
}

#[cfg(test)]
#[path = "widgets_test.rs"]
mod tests;
