use super::*;
use crate::render::{render_preview, render_snippet};
use time::Duration;
use time::macros::datetime;

fn settings() -> CountdownSettings {
    CountdownSettings { target_date: "2026-01-02".into(), target_time: "00:00".into(), ..CountdownSettings::default() }
}

#[test]
fn parse_target_accepts_minutes_and_seconds() {
    assert_eq!(parse_target("2026-01-02", "10:30").unwrap(), datetime!(2026-01-02 10:30));
    assert_eq!(parse_target("2026-01-02", "10:30:15").unwrap(), datetime!(2026-01-02 10:30:15));
    assert_eq!(parse_target("2026-01-02", "").unwrap(), datetime!(2026-01-02 0:00));
}

#[test]
fn parse_target_rejects_malformed_dates() {
    assert!(matches!(parse_target("31/12/2026", "10:00"), Err(WidgetError::InvalidSettings(_))));
    assert!(matches!(parse_target("2026-12-31", "noon"), Err(WidgetError::InvalidSettings(_))));
}

#[test]
fn split_remaining_uses_all_units() {
    let total = 86_400 + 2 * 3_600 + 3 * 60 + 4;
    assert_eq!(
        split_remaining(total, &Unit::ALL),
        vec![(Unit::Days, 1), (Unit::Hours, 2), (Unit::Minutes, 3), (Unit::Seconds, 4)]
    );
}

#[test]
fn split_remaining_folds_hidden_units() {
    let total = 86_400 + 2 * 3_600 + 3 * 60 + 4;
    assert_eq!(
        split_remaining(total, &[Unit::Hours, Unit::Minutes]),
        vec![(Unit::Hours, 26), (Unit::Minutes, 3)]
    );
}

#[test]
fn clock_expires_exactly_once() {
    let start = datetime!(2026-01-01 12:00:00 UTC);
    let mut clock = CountdownClock::new(start + Duration::seconds(1), Unit::ALL.to_vec());

    assert_eq!(
        clock.tick(start),
        Tick::Running(vec![(Unit::Days, 0), (Unit::Hours, 0), (Unit::Minutes, 0), (Unit::Seconds, 1)])
    );
    assert!(!clock.is_expired());

    assert_eq!(clock.tick(start + Duration::milliseconds(1100)), Tick::Expired { just_now: true });
    assert_eq!(clock.tick(start + Duration::milliseconds(2100)), Tick::Expired { just_now: false });
    assert_eq!(clock.tick(start + Duration::milliseconds(3100)), Tick::Expired { just_now: false });
    assert!(clock.is_expired());
}

#[test]
fn clock_stays_expired_even_if_time_goes_backwards() {
    let start = datetime!(2026-01-01 12:00:00 UTC);
    let mut clock = CountdownClock::new(start, Unit::ALL.to_vec());
    assert_eq!(clock.tick(start), Tick::Expired { just_now: true });
    assert_eq!(clock.tick(start - Duration::hours(1)), Tick::Expired { just_now: false });
}

#[test]
fn clock_from_settings_reads_target_in_local_offset() {
    let now = datetime!(2026-01-01 23:00:00 +02:00);
    let mut clock = CountdownClock::from_settings(&settings(), now).unwrap();
    assert_eq!(
        clock.tick(now),
        Tick::Running(vec![(Unit::Days, 0), (Unit::Hours, 1), (Unit::Minutes, 0), (Unit::Seconds, 0)])
    );
}

#[test]
fn snippet_renders_only_enabled_units() {
    let s = CountdownSettings { show_days: false, show_seconds: false, ..settings() };
    let view = view(&s, "wh-test", RenderMode::Snippet).unwrap();
    let values = view.root.find_by_class("wh-countdown-value");
    let units: Vec<&str> = values.iter().filter_map(|v| v.get_attr("data-unit")).collect();
    assert_eq!(units, vec!["hours", "minutes"]);
    assert!(values.iter().all(|v| v.text_content() == "00"));
}

#[test]
fn snippet_passes_local_target_to_script() {
    let view = view(&settings(), "wh-test", RenderMode::Snippet).unwrap();
    let snippet = render_snippet(&view);
    assert!(snippet.js.contains("\"target\":\"2026-01-02T00:00:00\""));
    assert!(snippet.js.contains("setInterval(render, 1000)"));
}

#[test]
fn snippet_does_not_depend_on_the_clock() {
    let value = serde_json::to_value(settings()).unwrap();
    let a = render_snippet(&build(&value, RenderMode::Snippet).unwrap());
    let b = render_snippet(&build(&value, RenderMode::Snippet).unwrap());
    assert_eq!(a, b);
}

#[test]
fn preview_shows_padded_digits_at_now() {
    let now = datetime!(2026-01-01 22:58:55 UTC);
    let view = view(&settings(), "wh-test", RenderMode::Preview { now }).unwrap();
    let digits: Vec<String> =
        view.root.find_by_class("wh-countdown-value").iter().map(|v| v.text_content()).collect();
    assert_eq!(digits, vec!["00", "01", "01", "05"]);
    let message = view.root.find_by_class("wh-countdown-message");
    assert_eq!(message[0].get_attr("hidden"), Some(""));
}

#[test]
fn preview_after_target_shows_completion_message() {
    let now = datetime!(2026-01-03 00:00:00 UTC);
    let s = CountdownSettings { hide_on_complete: true, ..settings() };
    let view = view(&s, "wh-test", RenderMode::Preview { now }).unwrap();
    let message = view.root.find_by_class("wh-countdown-message");
    assert_eq!(message[0].get_attr("hidden"), None);
    assert_eq!(view.root.get_attr("style"), Some("display: none"));
    let doc = render_preview(&view);
    assert!(doc.contains("This offer has ended."));
}

#[test]
fn build_rejects_malformed_target() {
    let err = build(&serde_json::json!({ "target_date": "tomorrow" }), RenderMode::Snippet).unwrap_err();
    assert!(err.to_string().contains("target_date"));
}
