use super::*;
use crate::dismissal::MemoryStorage;
use crate::render::{render_preview, render_snippet};
use serde_json::json;
use time::macros::datetime;

#[test]
fn delay_trigger_fires_after_delay() {
    let behavior = PopupBehavior { delay_seconds: 2.5, ..PopupBehavior::default() };
    assert!(!behavior.fires_on(PageEvent::Elapsed { ms: 2_499 }));
    assert!(behavior.fires_on(PageEvent::Elapsed { ms: 2_500 }));
    assert!(!behavior.fires_on(PageEvent::ExitIntent));
}

#[test]
fn scroll_trigger_fires_at_depth() {
    let behavior = PopupBehavior { trigger: PopupTrigger::Scroll, scroll_percent: 40.0, ..PopupBehavior::default() };
    assert!(!behavior.fires_on(PageEvent::Scrolled { percent: 39.9 }));
    assert!(behavior.fires_on(PageEvent::Scrolled { percent: 40.0 }));
    assert!(!behavior.fires_on(PageEvent::Elapsed { ms: 60_000 }));
}

#[test]
fn exit_intent_trigger_ignores_other_events() {
    let behavior = PopupBehavior { trigger: PopupTrigger::ExitIntent, ..PopupBehavior::default() };
    assert!(behavior.fires_on(PageEvent::ExitIntent));
    assert!(!behavior.fires_on(PageEvent::Scrolled { percent: 100.0 }));
}

#[test]
fn remembered_dismissal_suppresses_next_visit() {
    let behavior = PopupBehavior::default();
    let mut storage = MemoryStorage::new();
    assert!(behavior.dismissal().should_show(&storage));
    assert!(behavior.dismissal().dismiss(&mut storage));
    assert!(!behavior.dismissal().should_show(&storage));
}

#[test]
fn behavior_fields_flatten_into_settings() {
    let settings: PopupSettings =
        decode_settings(&json!({ "title": "Hi", "trigger": "scroll", "scroll_percent": 75 })).unwrap();
    assert_eq!(settings.behavior.trigger, PopupTrigger::Scroll);
    assert!((settings.behavior.scroll_percent - 75.0).abs() < f64::EPSILON);
    assert_eq!(settings.behavior.storage_key, "wh-popup-dismissed");

    let encoded = serde_json::to_value(&settings).unwrap();
    assert_eq!(encoded["trigger"], "scroll");
    assert!(encoded.get("behavior").is_none());
}

#[test]
fn snippet_starts_hidden_and_preview_starts_open() {
    let settings = PopupSettings::default();
    let snippet = view(&settings, "wh-test", RenderMode::Snippet);
    assert_eq!(snippet.root.get_attr("hidden"), Some(""));

    let preview = view(&settings, "wh-test", RenderMode::Preview { now: datetime!(2026-01-01 0:00 UTC) });
    assert_eq!(preview.root.get_attr("hidden"), None);
    assert_eq!(preview.root.get_attr("class"), Some("wh-popup-root is-open"));
    let doc = render_preview(&preview);
    assert!(doc.contains("Get 10% off your first order"));
    assert!(!doc.contains("<script>"));
}

#[test]
fn dialog_is_labelled_by_title() {
    let view = view(&PopupSettings::default(), "wh-test", RenderMode::Snippet);
    let dialog = view.root.find_by_class("wh-popup");
    assert_eq!(dialog[0].get_attr("aria-labelledby"), Some("wh-test-title"));
    assert_eq!(view.root.find_by_class("wh-popup-title")[0].get_attr("id"), Some("wh-test-title"));
}

#[test]
fn overlay_and_close_button_are_optional() {
    let behavior = PopupBehavior { show_overlay: false, closeable: false, ..PopupBehavior::default() };
    let settings = PopupSettings { behavior, ..PopupSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert!(view.root.find_by_class("wh-popup-overlay").is_empty());
    assert!(view.root.find_by_class("wh-popup-close").is_empty());
}

#[test]
fn cta_link_replaces_form_when_capture_disabled() {
    let settings = PopupSettings { show_email_capture: false, button_url: "https://shop.test".into(), ..PopupSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert!(view.root.find_by_class("wh-popup-form").is_empty());
    let button = view.root.find_by_class("wh-popup-button");
    assert_eq!(button[0].tag, "a");
    assert_eq!(button[0].get_attr("href"), Some("https://shop.test"));
}

#[test]
fn script_config_carries_trigger() {
    let settings = PopupSettings::default();
    let snippet = render_snippet(&view(&settings, "wh-test", RenderMode::Snippet));
    assert!(snippet.js.contains("\"trigger\":\"delay\""));
    assert!(snippet.js.contains("\"delayMs\":3000"));
    assert!(snippet.js.contains("if (isDismissed()) return;"));
}

#[test]
fn no_animation_means_instant_transition() {
    let behavior = PopupBehavior { animation: Animation::None, ..PopupBehavior::default() };
    let settings = PopupSettings { behavior, ..PopupSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    let dialog = view.styles.decls_for("#wh-test .wh-popup").unwrap();
    assert!(dialog.contains(&("transition", "transform 0ms ease, opacity 0ms ease".to_string())));
    assert!(dialog.contains(&("opacity", "1".to_string())));
}

#[test]
fn email_capture_without_action_stays_on_page() {
    let view = view(&PopupSettings::default(), "wh-test", RenderMode::Snippet);
    let form = &view.root.find_by_class("wh-popup-form")[0];
    assert_eq!(form.get_attr("action"), None);
    assert_eq!(form.get_attr("method"), None);
    let snippet = render_snippet(&view);
    assert!(snippet.js.contains("if (form && (!action || action === '#'))"));
}

#[test]
fn email_capture_posts_to_configured_action() {
    let settings: PopupSettings =
        decode_settings(&json!({ "action_url": "https://list.example.com/subscribe", "method": "get" })).unwrap();
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    let form = &view.root.find_by_class("wh-popup-form")[0];
    assert_eq!(form.get_attr("action"), Some("https://list.example.com/subscribe"));
    assert_eq!(form.get_attr("method"), Some("get"));
}

#[test]
fn email_capture_action_with_script_scheme_becomes_fragment() {
    let settings = PopupSettings { action_url: "javascript:alert(1)".into(), ..PopupSettings::default() };
    let snippet = render_snippet(&view(&settings, "wh-test", RenderMode::Snippet));
    assert!(!snippet.html.contains("javascript:"));
    assert!(snippet.html.contains("action=\"#\""));
}

#[test]
fn show_once_controls_remembered_dismissal() {
    let settings: PopupSettings = decode_settings(&json!({ "show_once": false })).unwrap();
    assert!(!settings.behavior.show_once);
    let snippet = render_snippet(&view(&settings, "wh-test", RenderMode::Snippet));
    assert!(snippet.js.contains("\"remember\":false"));

    let mut storage = MemoryStorage::new();
    assert!(settings.behavior.dismissal().dismiss(&mut storage));
    assert!(settings.behavior.dismissal().should_show(&storage));
}
