//! Google Places review lookup with demo fallback.
//!
//! Thin HTTP wrapper for the Places text-search and details endpoints.
//! Response parsing is pure (`parse_search`, `parse_details`) for
//! testability. [`lookup_reviews`] never fails: any error yields the demo
//! reviews and a note for the user.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use widgets::kinds::reviews::{RatingSummary, Review, mock_reviews};

use crate::config::{Config, HttpTimeouts};
use crate::services::lookup::{DataSource, LookupError, get_json};

const DETAILS_FIELDS: &str = "place_id,name,rating,user_ratings_total,reviews";
const DEMO_PLACE_NAME: &str = "Demo Business";

// =============================================================================
// TYPES
// =============================================================================

/// What the caller wants reviews for. A place id wins over a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewsQuery {
    pub query: Option<String>,
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceReviews {
    pub place_id: String,
    pub name: String,
    pub rating: f64,
    pub total_ratings: u64,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewsLookup {
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub place: PlaceReviews,
}

#[async_trait::async_trait]
pub trait PlacesLookup: Send + Sync {
    /// Resolve a free-text query to a place id.
    async fn search(&self, query: &str) -> Result<String, LookupError>;
    async fn details(&self, place_id: &str) -> Result<PlaceReviews, LookupError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct PlacesClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: Option<String>, base_url: String, timeouts: HttpTimeouts) -> Result<Self, LookupError> {
        let http = timeouts.client().map_err(|e| LookupError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        Self::new(config.places_api_key.clone(), config.places_base_url.clone(), config.http)
    }

    fn key(&self) -> Result<&str, LookupError> {
        self.api_key.as_deref().ok_or(LookupError::NotConfigured("GOOGLE_PLACES_API_KEY"))
    }
}

#[async_trait::async_trait]
impl PlacesLookup for PlacesClient {
    async fn search(&self, query: &str) -> Result<String, LookupError> {
        let key = self.key()?;
        let request = self
            .http
            .get(format!("{}/textsearch/json", self.base_url))
            .query(&[("query", query), ("key", key)]);
        let place_id = parse_search(&get_json(request).await?)?;
        place_id.ok_or_else(|| LookupError::NoMatch(query.to_string()))
    }

    async fn details(&self, place_id: &str) -> Result<PlaceReviews, LookupError> {
        let key = self.key()?;
        let request = self
            .http
            .get(format!("{}/details/json", self.base_url))
            .query(&[("place_id", place_id), ("fields", DETAILS_FIELDS), ("key", key)]);
        parse_details(place_id, &get_json(request).await?)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    place_id: String,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Deserialize)]
struct DetailsResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    user_ratings_total: u64,
    #[serde(default)]
    reviews: Vec<WireReview>,
}

#[derive(Deserialize)]
struct WireReview {
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    rating: u8,
    #[serde(default)]
    text: String,
    #[serde(default)]
    relative_time_description: String,
    #[serde(default)]
    profile_photo_url: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn check_status(status: &str) -> Result<(), LookupError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(LookupError::Provider(other.to_string())),
    }
}

fn parse_search(json: &str) -> Result<Option<String>, LookupError> {
    let resp: SearchResponse = serde_json::from_str(json).map_err(|e| LookupError::Parse(e.to_string()))?;
    check_status(&resp.status)?;
    Ok(resp.results.into_iter().next().map(|r| r.place_id))
}

fn parse_details(place_id: &str, json: &str) -> Result<PlaceReviews, LookupError> {
    let resp: DetailsResponse = serde_json::from_str(json).map_err(|e| LookupError::Parse(e.to_string()))?;
    check_status(&resp.status)?;
    let result = resp.result.ok_or_else(|| LookupError::NoMatch(place_id.to_string()))?;
    let reviews = result
        .reviews
        .into_iter()
        .zip(1..)
        .map(|(r, id)| Review {
            id,
            author: r.author_name,
            rating: r.rating.min(5),
            text: r.text,
            date: r.relative_time_description,
            avatar_url: r.profile_photo_url,
        })
        .collect();
    Ok(PlaceReviews {
        place_id: place_id.to_string(),
        name: result.name,
        rating: result.rating,
        total_ratings: result.user_ratings_total,
        reviews,
    })
}

// =============================================================================
// LOOKUP
// =============================================================================

fn trimmed(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

async fn fetch(places: &dyn PlacesLookup, query: &ReviewsQuery) -> Result<PlaceReviews, LookupError> {
    let place_id = match (trimmed(query.place_id.as_ref()), trimmed(query.query.as_ref())) {
        (Some(id), _) => id.to_string(),
        (None, Some(q)) => places.search(q).await?,
        (None, None) => return Err(LookupError::EmptyQuery),
    };
    places.details(&place_id).await
}

/// Demo reviews for `query`, labelled with the searched name when there is one.
#[must_use]
pub fn demo_place(query: &ReviewsQuery) -> PlaceReviews {
    let reviews = mock_reviews();
    let summary = RatingSummary::of(&reviews);
    PlaceReviews {
        place_id: trimmed(query.place_id.as_ref()).unwrap_or_default().to_string(),
        name: trimmed(query.query.as_ref()).unwrap_or(DEMO_PLACE_NAME).to_string(),
        rating: (summary.average * 10.0).round() / 10.0,
        total_ratings: summary.count as u64,
        reviews,
    }
}

fn fallback_note(err: &LookupError) -> String {
    match err {
        LookupError::EmptyQuery => "Enter a business name or place ID to load reviews. Showing demo reviews.".into(),
        LookupError::NotConfigured(_) => "Google Places is not configured. Showing demo reviews.".into(),
        LookupError::NoMatch(q) => format!("No place found for {q:?}. Showing demo reviews."),
        _ => "Live reviews are unavailable right now. Showing demo reviews.".into(),
    }
}

/// Look up live reviews, falling back to demo data on any error.
pub async fn lookup_reviews(places: &dyn PlacesLookup, query: &ReviewsQuery) -> ReviewsLookup {
    match fetch(places, query).await {
        Ok(place) => {
            info!(place_id = %place.place_id, reviews = place.reviews.len(), "places reviews loaded");
            ReviewsLookup { source: DataSource::Live, note: None, place }
        }
        Err(e) => {
            if e.is_configuration() {
                info!(error = %e, "places lookup skipped; using demo reviews");
            } else {
                warn!(error = %e, "places lookup failed; using demo reviews");
            }
            ReviewsLookup { source: DataSource::Mock, note: Some(fallback_note(&e)), place: demo_place(query) }
        }
    }
}

#[cfg(test)]
#[path = "reviews_test.rs"]
mod tests;
