use super::*;
use crate::render::render_snippet;
use serde_json::json;

fn review(id: u32, rating: u8) -> Review {
    Review { id, rating, ..Review::default() }
}

#[test]
fn select_filters_then_truncates() {
    let reviews = vec![review(1, 5), review(2, 2), review(3, 4), review(4, 5), review(5, 3)];
    let selected: Vec<u32> = select_reviews(&reviews, 4, 2).iter().map(|r| r.id).collect();
    assert_eq!(selected, vec![1, 3]);
}

#[test]
fn selected_reviews_respect_bounds() {
    let reviews: Vec<Review> = (1..=10).map(|id| review(id, u8::try_from(id % 6).unwrap())).collect();
    for min_rating in 0..=5 {
        for max_reviews in 0..=12 {
            let selected = select_reviews(&reviews, min_rating, max_reviews);
            assert!(selected.len() <= max_reviews);
            assert!(selected.iter().all(|r| r.rating >= min_rating));
        }
    }
}

#[test]
fn summary_averages_all_reviews() {
    let summary = RatingSummary::of(&[review(1, 5), review(2, 4), review(3, 3)]);
    assert_eq!(summary.count, 3);
    assert!((summary.average - 4.0).abs() < f64::EPSILON);
    assert_eq!(summary.rounded_stars(), 4);

    let empty = RatingSummary::of(&[]);
    assert_eq!(empty.count, 0);
    assert_eq!(empty.rounded_stars(), 0);
}

#[test]
fn mock_reviews_are_stable() {
    let a = mock_reviews();
    assert_eq!(a, mock_reviews());
    assert_eq!(a.len(), 6);
    assert_eq!(a[0].author, "Sarah Johnson");
    let ids: Vec<u32> = a.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn default_view_hides_low_ratings() {
    let view = view(&ReviewsSettings::default(), "wh-test", RenderMode::Snippet);
    let cards = view.root.find_by_class("wh-review");
    assert_eq!(cards.len(), 5);
    assert!(view.root.text_content().contains("(6 reviews)"));
}

#[test]
fn every_layout_renders_a_distinct_track() {
    let mut tracks = Vec::new();
    for layout in ReviewLayout::ALL {
        let settings = ReviewsSettings { layout, ..ReviewsSettings::default() };
        let view = view(&settings, "wh-test", RenderMode::Snippet);
        assert_eq!(view.root.get_attr("class"), Some(format!("wh-reviews wh-reviews-{}", layout.as_str()).as_str()));
        let track = view.styles.decls_for("#wh-test .wh-reviews-track").unwrap().to_vec();
        assert!(!tracks.contains(&track), "{layout:?} shares a track style");
        tracks.push(track);
    }
}

#[test]
fn only_navigable_layouts_get_a_script() {
    for layout in ReviewLayout::ALL {
        let settings = ReviewsSettings { layout, ..ReviewsSettings::default() };
        let view = view(&settings, "wh-test", RenderMode::Snippet);
        let navigable = matches!(layout, ReviewLayout::Carousel | ReviewLayout::Slider);
        assert_eq!(view.script.is_some(), navigable, "{layout:?}");
        assert_eq!(!view.root.find_by_class("wh-reviews-nav").is_empty(), navigable, "{layout:?}");
    }
}

#[test]
fn slider_marks_first_review_active() {
    let settings = ReviewsSettings { layout: ReviewLayout::Slider, autoplay_seconds: 4.0, ..ReviewsSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert_eq!(view.root.find_by_class("is-active").len(), 1);
    let snippet = render_snippet(&view);
    assert!(snippet.js.contains("\"autoplayMs\":4000"));
}

#[test]
fn badge_layout_always_shows_summary() {
    let settings = ReviewsSettings { layout: ReviewLayout::Badge, show_summary: false, ..ReviewsSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert_eq!(view.root.find_by_class("wh-reviews-summary").len(), 1);
}

#[test]
fn write_review_link_uses_place_id() {
    let settings = ReviewsSettings { place_id: "ChIJ123".into(), ..ReviewsSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    let link = view.root.find_by_class("wh-reviews-write");
    assert_eq!(
        link[0].get_attr("href"),
        Some("https://search.google.com/local/writereview?placeid=ChIJ123")
    );
    assert_eq!(ReviewsSettings::default().write_review_url(), None);
}

#[test]
fn avatar_falls_back_to_initials() {
    let settings = ReviewsSettings {
        reviews: vec![Review { author: "ada lovelace".into(), ..Review::default() }],
        ..ReviewsSettings::default()
    };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert_eq!(view.root.find_by_class("wh-review-avatar")[0].text_content(), "AL");
}

#[test]
fn remove_last_review_is_rejected() {
    let settings = json!({ "reviews": [{ "id": 1, "author": "A", "rating": 5 }] });
    let err = remove_item(&settings, 0).unwrap_err();
    assert_eq!(err.to_string(), "At least one review is required.");
    assert!(matches!(remove_item(&settings, 3), Err(WidgetError::IndexOutOfRange { index: 3, len: 1 })));
}

#[test]
fn write_review_link_is_omitted_without_place_id() {
    let settings = ReviewsSettings { show_write_review: true, place_id: "  ".into(), ..ReviewsSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert!(view.root.find_by_class("wh-reviews-write").is_empty());
}

#[test]
fn write_review_link_encodes_place_id() {
    let settings = ReviewsSettings { place_id: "ab c&x=1".into(), ..ReviewsSettings::default() };
    assert_eq!(
        settings.write_review_url().as_deref(),
        Some("https://search.google.com/local/writereview?placeid=ab%20c%26x%3D1")
    );
}

#[test]
fn write_review_link_respects_toggle() {
    let settings = ReviewsSettings { show_write_review: false, place_id: "ChIJ123".into(), ..ReviewsSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert!(view.root.find_by_class("wh-reviews-write").is_empty());
}

#[test]
fn add_item_appends_blank_review() {
    let settings = json!({ "reviews": [{ "id": 7, "author": "Ana", "rating": 5, "text": "Great" }] });
    let added = add_item(&settings, None).unwrap();
    assert_eq!(added["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(added["reviews"][1]["id"], 8);
    let moved = move_item(&added, 1, 0).unwrap();
    assert_eq!(moved["reviews"][0]["id"], 8);
}
