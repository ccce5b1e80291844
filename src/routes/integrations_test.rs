use super::*;
use crate::services::lookup::DataSource;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn reviews_fall_back_when_places_is_unconfigured() {
    let body = ReviewsQuery { query: Some("Corner Cafe".into()), place_id: None };
    let Json(out) = lookup_reviews(State(test_app_state()), Json(body)).await;
    assert_eq!(out.source, DataSource::Mock);
    assert_eq!(out.place.name, "Corner Cafe");
    assert!(out.note.is_some());
    assert!(!out.place.reviews.is_empty());
}

#[tokio::test]
async fn instagram_falls_back_to_demo_posts() {
    let Json(out) =
        instagram_feed(State(test_app_state()), Path("@acme".into()), Query(FeedQuery { count: 6 })).await;
    assert_eq!(out.source, DataSource::Mock);
    assert_eq!(out.profile.username, "acme");
    assert_eq!(out.profile.posts.len(), 6);
}

#[test]
fn feed_query_defaults_count() {
    let q: FeedQuery = serde_json::from_str("{}").unwrap();
    assert_eq!(q.count, DEFAULT_POST_COUNT);
}
