use super::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Sample {
    title: String,
    count: u32,
}

#[test]
fn find_by_class_matches_class_list_members() {
    let tree = Element::new("div")
        .class("outer")
        .child(Element::new("span").class("item first").text("a"))
        .child(Element::new("span").class("item").text("b"))
        .child(Element::new("span").class("items").text("c"));
    let found = tree.find_by_class("item");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].text_content(), "a");
    assert_eq!(found[1].text_content(), "b");
}

#[test]
fn attr_if_skips_false_conditions() {
    let el = Element::new("div").attr_if(false, "hidden", "").attr_if(true, "role", "dialog");
    assert_eq!(el.get_attr("hidden"), None);
    assert_eq!(el.get_attr("role"), Some("dialog"));
}

#[test]
fn text_content_concatenates_descendants() {
    let el = Element::new("p").text("Hello ").child(Element::new("b").text("world"));
    assert_eq!(el.text_content(), "Hello world");
}

#[test]
fn script_new_injects_instance_id() {
    let script = Script::new("wh-faq-1234", json!({ "allowMultiple": false }), "");
    assert_eq!(script.config["id"], "wh-faq-1234");
    assert_eq!(script.config["allowMultiple"], false);
}

#[test]
fn script_new_wraps_non_object_config() {
    let script = Script::new("x", json!(5), "");
    assert_eq!(script.config["value"], 5);
    assert_eq!(script.config["id"], "x");
}

#[test]
fn instance_id_is_stable_for_same_settings() {
    let a = instance_id(WidgetKind::Faq, &Sample { title: "t".into(), count: 1 }).unwrap();
    let b = instance_id(WidgetKind::Faq, &Sample { title: "t".into(), count: 1 }).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with("wh-faq-"));
    assert_eq!(a.len(), "wh-faq-".len() + 8);
}

#[test]
fn instance_id_differs_by_settings_and_kind() {
    let base = instance_id(WidgetKind::Faq, &Sample::default()).unwrap();
    let changed = instance_id(WidgetKind::Faq, &Sample { title: "x".into(), count: 0 }).unwrap();
    let other_kind = instance_id(WidgetKind::Popup, &Sample::default()).unwrap();
    assert_ne!(base, changed);
    assert_ne!(base[7..], other_kind[9..]);
}

#[test]
fn decode_settings_fills_defaults_for_null() {
    let sample: Sample = decode_settings(&Value::Null).unwrap();
    assert_eq!(sample, Sample::default());
}

#[test]
fn decode_settings_fills_missing_fields() {
    let sample: Sample = decode_settings(&json!({ "count": 4 })).unwrap();
    assert_eq!(sample.count, 4);
    assert_eq!(sample.title, "");
}

#[test]
fn decode_settings_rejects_wrong_types() {
    let err = decode_settings::<Sample>(&json!({ "count": "many" })).unwrap_err();
    assert!(matches!(err, WidgetError::InvalidSettings(_)));
}

#[test]
fn render_mode_exposes_now_only_for_preview() {
    let now = OffsetDateTime::UNIX_EPOCH;
    assert_eq!(RenderMode::Snippet.now(), None);
    assert_eq!(RenderMode::Preview { now }.now(), Some(now));
    assert!(RenderMode::Preview { now }.is_preview());
}
