//! Third-party lookup routes. Both always answer 200; the body says whether
//! the data is live or demo.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::services::instagram::{self, DEFAULT_POST_COUNT, ProfileLookup};
use crate::services::reviews::{self, ReviewsLookup, ReviewsQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    DEFAULT_POST_COUNT
}

/// `POST /api/reviews/lookup`: `{ "query": ... }` or `{ "place_id": ... }`.
pub async fn lookup_reviews(State(state): State<AppState>, Json(body): Json<ReviewsQuery>) -> Json<ReviewsLookup> {
    Json(reviews::lookup_reviews(state.places.as_ref(), &body).await)
}

/// `GET /api/instagram/{username}?count=N`
pub async fn instagram_feed(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Json<ProfileLookup> {
    Json(instagram::lookup_profile(state.instagram.as_ref(), &username, query.count).await)
}

#[cfg(test)]
#[path = "integrations_test.rs"]
mod tests;
