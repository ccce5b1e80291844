use super::*;
use crate::render::render_snippet;
use serde_json::json;

fn tier(quantity: u32, price_per_unit: f64) -> PricingTier {
    PricingTier { id: 1, quantity, price_per_unit, popular: false }
}

#[test]
fn quote_totals_and_savings() {
    let quote = TierQuote::compute(&tier(3, 9.0), 10.0);
    assert!((quote.total - 27.0).abs() < f64::EPSILON);
    assert!((quote.savings - 3.0).abs() < f64::EPSILON);
    assert!((quote.savings_percent - 10.0).abs() < 1e-9);
    assert!(quote.shows_savings());
    assert_eq!(quote.savings_label("$"), "Save $3.00 (10%)");
}

#[test]
fn quote_properties_hold_across_tiers() {
    let base = 12.5;
    for quantity in [1_u32, 2, 5, 10, 100] {
        for price in [0.0, 4.25, 9.99, 12.49] {
            let quote = TierQuote::compute(&tier(quantity, price), base);
            let q = f64::from(quantity);
            assert!((quote.total - q * price).abs() < 1e-9);
            assert!((quote.savings - q * (base - price)).abs() < 1e-9);
            assert!(quote.savings > 0.0);
        }
    }
}

#[test]
fn no_badge_when_not_cheaper() {
    assert!(!TierQuote::compute(&tier(2, 10.0), 10.0).shows_savings());
    assert!(!TierQuote::compute(&tier(2, 11.0), 10.0).shows_savings());
}

#[test]
fn zero_base_price_has_zero_percent() {
    let quote = TierQuote::compute(&tier(2, 0.0), 0.0);
    assert!(quote.savings_percent.abs() < f64::EPSILON);
}

#[test]
fn view_renders_badges_and_savings() {
    let settings = PricingSettings::default();
    let view = view(&settings, "wh-test", RenderMode::Snippet);

    let badges = view.root.find_by_class("wh-pricing-badge");
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].text_content(), "Most Popular");

    // First tier sells at the base price, so only the two discounted tiers show savings.
    let savings: Vec<String> = view.root.find_by_class("wh-pricing-savings").iter().map(|e| e.text_content()).collect();
    assert_eq!(savings, vec!["Save $3.00 (10%)", "Save $10.00 (20%)"]);

    let totals: Vec<String> = view.root.find_by_class("wh-pricing-total").iter().map(|e| e.text_content()).collect();
    assert_eq!(totals, vec!["$10.00", "$27.00", "$40.00"]);
}

#[test]
fn popular_tier_starts_selected() {
    let view = view(&PricingSettings::default(), "wh-test", RenderMode::Snippet);
    let selected = view.root.find_by_class("is-selected");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].get_attr("data-quantity"), Some("3"));
    let cta = view.root.find_by_class("wh-pricing-cta");
    assert_eq!(cta[0].text_content(), "Add to cart - $27.00");
}

#[test]
fn popular_tier_gets_thicker_border() {
    let view = view(&PricingSettings::default(), "wh-test", RenderMode::Snippet);
    let rule = view.styles.decls_for("#wh-test .wh-pricing-tier.is-popular").unwrap();
    assert_eq!(rule, &[("border", "2px solid #4f46e5".to_string())]);
}

#[test]
fn add_tier_extends_quantity() {
    let mut settings = PricingSettings::default();
    let added = settings.add_tier().clone();
    assert_eq!(added.id, 4);
    assert_eq!(added.quantity, 6);
    assert!((added.price_per_unit - 10.0).abs() < f64::EPSILON);
}

#[test]
fn remove_last_tier_is_rejected() {
    let settings = json!({ "tiers": [{ "id": 1, "quantity": 1, "price_per_unit": 5.0 }] });
    let err = remove_item(&settings, 0).unwrap_err();
    assert!(matches!(err, WidgetError::LastItem { noun: "pricing tier" }));
    assert_eq!(err.to_string(), "At least one pricing tier is required.");
}

#[test]
fn snippet_script_reads_cta_text() {
    let snippet = render_snippet(&view(&PricingSettings::default(), "wh-test", RenderMode::Snippet));
    assert!(snippet.js.contains("\"ctaText\":\"Add to cart\""));
    assert!(snippet.css.contains("@media (max-width: 768px)"));
}

#[test]
fn add_item_appends_next_quantity_tier() {
    let added = add_item(&defaults().unwrap(), None).unwrap();
    let tiers = added["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 4);
    assert_eq!(tiers[3]["quantity"], 6);

    let moved = move_item(&added, 3, 1).unwrap();
    assert_eq!(moved["tiers"][1]["id"], 4);
    assert!(matches!(move_item(&added, 4, 0), Err(WidgetError::IndexOutOfRange { index: 4, len: 4 })));
}
