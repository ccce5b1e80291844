use super::*;
use crate::dismissal::{DismissalStore, MemoryStorage};
use crate::render::render_snippet;

#[test]
fn remembered_dismissal_hides_bar_after_reload() {
    let settings = AnnouncementSettings::default();
    let policy = settings.dismissal();
    let mut storage = MemoryStorage::new();

    assert!(policy.should_show(&storage));
    assert!(policy.dismiss(&mut storage));
    assert_eq!(storage.get("wh-announcement-dismissed").as_deref(), Some("1"));
    assert!(!policy.should_show(&storage));
}

#[test]
fn dismissal_without_remember_reappears() {
    let settings = AnnouncementSettings { remember_dismissal: false, ..AnnouncementSettings::default() };
    let policy = settings.dismissal();
    let mut storage = MemoryStorage::new();

    assert!(policy.dismiss(&mut storage));
    assert!(storage.get(&settings.storage_key).is_none());
    assert!(policy.should_show(&storage));
}

#[test]
fn non_closeable_bar_has_no_close_button() {
    let settings = AnnouncementSettings { closeable: false, ..AnnouncementSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    assert!(view.root.find_by_class("wh-bar-close").is_empty());

    let mut storage = MemoryStorage::new();
    assert!(!settings.dismissal().dismiss(&mut storage));
    assert!(settings.dismissal().should_show(&storage));
}

#[test]
fn snippet_starts_hidden_and_preview_starts_visible() {
    let settings = AnnouncementSettings::default();
    let snippet = view(&settings, "wh-test", RenderMode::Snippet);
    assert_eq!(snippet.root.get_attr("hidden"), Some(""));

    let now = time::macros::datetime!(2026-01-01 0:00 UTC);
    let preview = view(&settings, "wh-test", RenderMode::Preview { now });
    assert_eq!(preview.root.get_attr("hidden"), None);
    assert_eq!(preview.root.get_attr("class"), Some("wh-announcement is-visible"));
}

#[test]
fn bottom_position_slides_up_from_bottom() {
    let settings = AnnouncementSettings { position: BarPosition::Bottom, ..AnnouncementSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    let root = view.styles.decls_for("#wh-test").unwrap();
    assert!(root.contains(&("bottom", "0".to_string())));
    assert!(root.contains(&("transform", "translateY(100%)".to_string())));
}

#[test]
fn script_reads_storage_key_from_config() {
    let snippet = render_snippet(&view(&AnnouncementSettings::default(), "wh-test", RenderMode::Snippet));
    assert!(snippet.js.contains("\"storageKey\":\"wh-announcement-dismissed\""));
    assert!(snippet.js.contains("function isDismissed()"));
    assert!(snippet.js.contains("rememberDismissal();"));
}

#[test]
fn unsafe_link_is_neutralized() {
    let settings =
        AnnouncementSettings { link_url: "javascript:alert(1)".into(), ..AnnouncementSettings::default() };
    let view = view(&settings, "wh-test", RenderMode::Snippet);
    let links = view.root.find_by_class("wh-bar-link");
    assert_eq!(links[0].get_attr("href"), Some("#"));
}

#[test]
fn non_closeable_snippet_ignores_stored_dismissal() {
    let settings = AnnouncementSettings { closeable: false, ..AnnouncementSettings::default() };
    let snippet = render_snippet(&view(&settings, "wh-test", RenderMode::Snippet));
    assert!(snippet.js.contains("\"closeable\":false"));
    assert!(snippet.js.contains("\"remember\":true"));
    assert!(snippet.js.contains("if (!cfg.closeable || !cfg.remember) return false;"));
    assert!(snippet.js.contains("if (isDismissed()) {"));

    let mut storage = MemoryStorage::new();
    storage.set(&settings.storage_key, crate::dismissal::DISMISSED_FLAG);
    assert!(settings.dismissal().should_show(&storage));
}

#[test]
fn closeable_snippet_consults_stored_dismissal() {
    let snippet = render_snippet(&view(&AnnouncementSettings::default(), "wh-test", RenderMode::Snippet));
    assert!(snippet.js.contains("\"closeable\":true"));
    assert!(snippet.js.contains("\"duration\":400"));
}
