use super::*;
use serde_json::json;
use time::macros::datetime;

#[test]
fn registry_is_ordered_like_all_kinds() {
    let kinds: Vec<WidgetKind> = entries().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, WidgetKind::ALL.to_vec());
    for kind in WidgetKind::ALL {
        assert_eq!(entry(kind).kind, kind);
    }
}

#[test]
fn lookup_accepts_wire_tags() {
    assert_eq!(lookup("pricing-table").unwrap().label, "Pricing Table");
    assert_eq!(lookup("faq").unwrap().label, "FAQ Accordion");
    let err = lookup("carousel").err().unwrap();
    assert_eq!(err.error_code(), "E_UNKNOWN_WIDGET");
}

#[test]
fn every_kind_compiles_its_defaults() {
    for kind in WidgetKind::ALL {
        let settings = defaults(kind).unwrap();
        let snippet = compile(kind, &settings).unwrap();
        assert_eq!(snippet.kind, kind);
        assert!(snippet.html.contains(&format!("id=\"{}\"", snippet.instance_id)), "{kind}");
        assert!(snippet.instance_id.starts_with(&format!("wh-{}-", kind.as_str().replace('_', "-"))));
        assert!(!snippet.css.is_empty(), "{kind}");
    }
}

#[test]
fn compile_is_deterministic() {
    for kind in WidgetKind::ALL {
        let settings = defaults(kind).unwrap();
        assert_eq!(compile(kind, &settings).unwrap(), compile(kind, &settings).unwrap(), "{kind}");
    }
}

#[test]
fn null_settings_mean_defaults() {
    for kind in WidgetKind::ALL {
        let from_null = compile(kind, &serde_json::Value::Null).unwrap();
        let from_defaults = compile(kind, &defaults(kind).unwrap()).unwrap();
        assert_eq!(from_null, from_defaults, "{kind}");
    }
}

#[test]
fn different_settings_get_different_ids() {
    let a = compile(WidgetKind::Faq, &json!({ "title": "One" })).unwrap();
    let b = compile(WidgetKind::Faq, &json!({ "title": "Two" })).unwrap();
    assert_ne!(a.instance_id, b.instance_id);
}

#[test]
fn wrong_shape_is_invalid_settings() {
    let err = compile(WidgetKind::LogoTicker, &json!({ "speed": "fast" })).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_SETTINGS");
}

#[test]
fn previews_are_standalone_documents_without_script() {
    let now = datetime!(2026-06-01 12:00 UTC);
    for kind in WidgetKind::ALL {
        let doc = preview(kind, &defaults(kind).unwrap(), now).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"), "{kind}");
        assert!(doc.contains(&format!("<title>{} preview</title>", crate::escape::html_text(entry(kind).label))));
        assert!(!doc.contains("<script"), "{kind}");
    }
}

#[test]
fn preview_and_snippet_share_markup_for_static_kinds() {
    let now = datetime!(2026-06-01 12:00 UTC);
    for kind in [WidgetKind::LogoTicker, WidgetKind::Faq, WidgetKind::PricingTable, WidgetKind::InstagramFeed] {
        let settings = defaults(kind).unwrap();
        let snippet = compile(kind, &settings).unwrap();
        let doc = preview(kind, &settings, now).unwrap();
        assert!(doc.contains(&snippet.html), "{kind}");
        assert!(doc.contains(&snippet.css), "{kind}");
    }
}

#[test]
fn injected_markup_never_survives_compilation() {
    let payload = "</script><script>alert(1)</script>";
    let cases = [
        (WidgetKind::LogoTicker, json!({ "title": payload })),
        (WidgetKind::Countdown, json!({ "title": payload, "completion_message": payload })),
        (WidgetKind::Faq, json!({ "title": payload })),
        (WidgetKind::AnnouncementBar, json!({ "message": payload, "storage_key": payload })),
        (WidgetKind::PricingTable, json!({ "title": payload, "cta_text": payload })),
        (WidgetKind::Reviews, json!({ "business_name": payload })),
        (WidgetKind::Popup, json!({ "title": payload, "storage_key": payload })),
        (WidgetKind::PopupBuilder, json!({ "storage_key": payload })),
        (WidgetKind::InstagramFeed, json!({ "display_name": payload })),
    ];
    for (kind, settings) in cases {
        let snippet = compile(kind, &settings).unwrap();
        assert!(!snippet.embed().contains("<script>alert(1)"), "{kind}");
        assert!(!snippet.js.contains("</script>"), "{kind}");
    }
}

#[test]
fn item_edits_require_an_item_list() {
    let err = remove_item(WidgetKind::Countdown, &json!({}), 0).unwrap_err();
    assert!(matches!(err, WidgetError::NoItemList(WidgetKind::Countdown)));
    let err = add_item(WidgetKind::Popup, &json!({}), None).unwrap_err();
    assert!(matches!(err, WidgetError::NoItemList(WidgetKind::Popup)));
    let err = move_item(WidgetKind::LogoTicker, &json!({}), 0, 1).unwrap_err();
    assert!(matches!(err, WidgetError::NoItemList(WidgetKind::LogoTicker)));

    let kinds_with_lists: Vec<WidgetKind> =
        entries().iter().filter(|e| e.items.is_some()).map(|e| e.kind).collect();
    assert_eq!(
        kinds_with_lists,
        vec![WidgetKind::Faq, WidgetKind::PricingTable, WidgetKind::Reviews, WidgetKind::PopupBuilder]
    );
}

#[test]
fn removing_from_defaults_shrinks_each_list() {
    for (kind, field) in [
        (WidgetKind::Faq, "items"),
        (WidgetKind::PricingTable, "tiers"),
        (WidgetKind::Reviews, "reviews"),
        (WidgetKind::PopupBuilder, "blocks"),
    ] {
        let settings = defaults(kind).unwrap();
        let before = settings[field].as_array().unwrap().len();
        let after = remove_item(kind, &settings, 0).unwrap();
        assert_eq!(after[field].as_array().unwrap().len(), before - 1, "{kind}");
    }
}

#[test]
fn adding_to_defaults_grows_each_list_and_still_compiles() {
    for (kind, field) in [
        (WidgetKind::Faq, "items"),
        (WidgetKind::PricingTable, "tiers"),
        (WidgetKind::Reviews, "reviews"),
        (WidgetKind::PopupBuilder, "blocks"),
    ] {
        let settings = defaults(kind).unwrap();
        let before = settings[field].as_array().unwrap().len();
        let after = add_item(kind, &settings, None).unwrap();
        assert_eq!(after[field].as_array().unwrap().len(), before + 1, "{kind}");
        compile(kind, &after).unwrap();
    }
}

#[test]
fn moving_keeps_every_item() {
    let settings = defaults(WidgetKind::Faq).unwrap();
    let moved = move_item(WidgetKind::Faq, &settings, 0, 2).unwrap();
    let ids: Vec<u64> = moved["items"].as_array().unwrap().iter().map(|i| i["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}
