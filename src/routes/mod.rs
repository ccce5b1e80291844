//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the widget compiler, snippet library and integration endpoints
//! under one Axum router. The API is consumed by the builder UI and by the
//! `widgethub` CLI, so CORS is open.

pub mod integrations;
pub mod snippets;
pub mod widgets;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/widgets", get(widgets::list_widgets))
        .route("/api/widgets/{kind}/defaults", get(widgets::widget_defaults))
        .route("/api/widgets/{kind}/compile", post(widgets::compile_widget))
        .route("/api/widgets/{kind}/preview", post(widgets::preview_widget))
        .route("/api/widgets/{kind}/items", post(widgets::add_widget_item))
        .route("/api/widgets/{kind}/items/{index}/remove", post(widgets::remove_widget_item))
        .route("/api/widgets/{kind}/items/{index}/move/{to}", post(widgets::move_widget_item))
        .route("/api/snippets", get(snippets::list_snippets).post(snippets::create_snippet))
        .route(
            "/api/snippets/{id}",
            get(snippets::get_snippet)
                .patch(snippets::update_snippet)
                .delete(snippets::delete_snippet),
        )
        .route("/api/snippets/{id}/draft", put(snippets::save_draft))
        .route("/api/snippets/{id}/export", get(snippets::export_snippet))
        .route("/api/snippets/{id}/preview", get(snippets::preview_snippet))
        .route("/api/reviews/lookup", post(integrations::lookup_reviews))
        .route("/api/instagram/{username}", get(integrations::instagram_feed))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
