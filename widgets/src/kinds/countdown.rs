//! Countdown timer to a local date and time.
//!
//! Remaining time is split across the enabled units, largest first; a
//! disabled unit folds into the next smaller enabled one (no days shown
//! means hours can exceed 23). Once the target passes the widget switches
//! to its completion message and never switches back.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use super::{defaults_of, scoped};
use crate::style::{self, FONT_STACK};
use crate::view::{Element, RenderMode, Script, Stylesheet, WidgetView, decls, decode_settings, instance_id};
use crate::{WidgetError, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownLayout {
    Inline,
    #[default]
    Boxes,
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownSettings {
    pub title: String,
    /// `YYYY-MM-DD`, interpreted in the visitor's local time zone.
    pub target_date: String,
    /// `HH:MM` or `HH:MM:SS`.
    pub target_time: String,
    pub show_days: bool,
    pub show_hours: bool,
    pub show_minutes: bool,
    pub show_seconds: bool,
    pub show_labels: bool,
    pub completion_message: String,
    pub hide_on_complete: bool,
    pub layout: CountdownLayout,
    pub background_color: String,
    pub box_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_size: f64,
    pub border_radius: f64,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            title: "Sale ends in".into(),
            target_date: "2026-12-31".into(),
            target_time: "23:59".into(),
            show_days: true,
            show_hours: true,
            show_minutes: true,
            show_seconds: true,
            show_labels: true,
            completion_message: "This offer has ended.".into(),
            hide_on_complete: false,
            layout: CountdownLayout::Boxes,
            background_color: "#111827".into(),
            box_color: "#1f2937".into(),
            text_color: "#ffffff".into(),
            accent_color: "#f59e0b".into(),
            font_size: 32.0,
            border_radius: 8.0,
        }
    }
}

// =============================================================================
// UNITS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    pub const ALL: [Self; 4] = [Self::Days, Self::Hours, Self::Minutes, Self::Seconds];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Days => "Days",
            Self::Hours => "Hours",
            Self::Minutes => "Minutes",
            Self::Seconds => "Seconds",
        }
    }

    #[must_use]
    pub fn seconds(self) -> i64 {
        match self {
            Self::Days => 86_400,
            Self::Hours => 3_600,
            Self::Minutes => 60,
            Self::Seconds => 1,
        }
    }
}

impl CountdownSettings {
    #[must_use]
    pub fn enabled_units(&self) -> Vec<Unit> {
        Unit::ALL
            .into_iter()
            .filter(|unit| match unit {
                Unit::Days => self.show_days,
                Unit::Hours => self.show_hours,
                Unit::Minutes => self.show_minutes,
                Unit::Seconds => self.show_seconds,
            })
            .collect()
    }

    /// Parse `target_date` and `target_time` into a local date-time.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidSettings`] for malformed values.
    pub fn target(&self) -> Result<PrimitiveDateTime, WidgetError> {
        parse_target(&self.target_date, &self.target_time)
    }
}

/// Parse `YYYY-MM-DD` plus `HH:MM[:SS]`. An empty time means midnight.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed values.
pub fn parse_target(date: &str, time_of_day: &str) -> Result<PrimitiveDateTime, WidgetError> {
    let date = Date::parse(date.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| WidgetError::InvalidSettings(format!("target_date must be YYYY-MM-DD: {e}")))?;

    let raw_time = time_of_day.trim();
    let time = if raw_time.is_empty() {
        Time::MIDNIGHT
    } else {
        Time::parse(raw_time, format_description!("[hour]:[minute]:[second]"))
            .or_else(|_| Time::parse(raw_time, format_description!("[hour]:[minute]")))
            .map_err(|e| WidgetError::InvalidSettings(format!("target_time must be HH:MM: {e}")))?
    };
    Ok(PrimitiveDateTime::new(date, time))
}

/// Split whole remaining seconds across `units`, largest first.
#[must_use]
pub fn split_remaining(total_seconds: i64, units: &[Unit]) -> Vec<(Unit, i64)> {
    let mut rest = total_seconds.max(0);
    units
        .iter()
        .map(|unit| {
            let value = rest / unit.seconds();
            rest %= unit.seconds();
            (*unit, value)
        })
        .collect()
}

// =============================================================================
// CLOCK
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Running(Vec<(Unit, i64)>),
    /// The target has passed. `just_now` is true only on the first expired tick.
    Expired { just_now: bool },
}

/// Tick-driven countdown state, mirroring the generated script.
#[derive(Debug, Clone)]
pub struct CountdownClock {
    target: OffsetDateTime,
    units: Vec<Unit>,
    expired: bool,
}

impl CountdownClock {
    #[must_use]
    pub fn new(target: OffsetDateTime, units: Vec<Unit>) -> Self {
        Self { target, units, expired: false }
    }

    /// Clock for `settings`, with the target read in `now`'s UTC offset.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidSettings`] for a malformed target.
    pub fn from_settings(settings: &CountdownSettings, now: OffsetDateTime) -> Result<Self, WidgetError> {
        let target = settings.target()?.assume_offset(now.offset());
        Ok(Self::new(target, settings.enabled_units()))
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn tick(&mut self, now: OffsetDateTime) -> Tick {
        if self.expired {
            return Tick::Expired { just_now: false };
        }
        let remaining_ms = (self.target - now).whole_milliseconds();
        if remaining_ms <= 0 {
            self.expired = true;
            return Tick::Expired { just_now: true };
        }
        let whole_seconds = i64::try_from(remaining_ms / 1000).unwrap_or(i64::MAX);
        Tick::Running(split_remaining(whole_seconds, &self.units))
    }
}

// =============================================================================
// VIEW
// =============================================================================

const SCRIPT: &str = r"
var target = new Date(cfg.target).getTime();
var sizes = { days: 86400, hours: 3600, minutes: 60, seconds: 1 };
var cells = root.querySelectorAll('[data-unit]');
var units = root.querySelector('.wh-countdown-units');
var message = root.querySelector('.wh-countdown-message');
var done = false;
var timer = null;
function pad(n) { return n < 10 ? '0' + n : String(n); }
function render() {
  var diff = target - Date.now();
  if (!(diff > 0)) {
    if (done) return;
    done = true;
    if (timer) clearInterval(timer);
    if (units) units.hidden = true;
    if (message) message.hidden = false;
    if (cfg.hideOnComplete) root.style.display = 'none';
    return;
  }
  var rest = Math.floor(diff / 1000);
  Array.prototype.forEach.call(cells, function (cell) {
    var size = sizes[cell.getAttribute('data-unit')];
    cell.textContent = pad(Math.floor(rest / size));
    rest = rest % size;
  });
}
render();
if (!done) timer = setInterval(render, 1000);
";

/// Build the view. In preview mode the digits show the state at `now`.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for a malformed target.
pub fn view(settings: &CountdownSettings, id: &str, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let target = settings.target()?;
    let units = settings.enabled_units();

    let (values, expired) = match mode.now() {
        Some(now) => match CountdownClock::from_settings(settings, now)?.tick(now) {
            Tick::Running(values) => (values, false),
            Tick::Expired { .. } => (units.iter().map(|u| (*u, 0)).collect(), true),
        },
        None => (units.iter().map(|u| (*u, 0)).collect(), false),
    };

    let cells = values.iter().map(|(unit, value)| {
        Element::new("div")
            .class("wh-countdown-cell")
            .child(Element::new("span").class("wh-countdown-value").attr("data-unit", unit.key()).text(style::pad2(*value)))
            .child_if(settings.show_labels, || Element::new("span").class("wh-countdown-label").text(unit.label()))
    });

    let root = Element::new("div")
        .id(id)
        .class(format!("wh-countdown wh-countdown--{}", layout_name(settings.layout)))
        .attr_if(expired && settings.hide_on_complete, "style", "display: none")
        .child_if(!settings.title.trim().is_empty(), || {
            Element::new("p").class("wh-countdown-title").text(settings.title.clone())
        })
        .child(Element::new("div").class("wh-countdown-units").attr_if(expired, "hidden", "").children(cells))
        .child(
            Element::new("p")
                .class("wh-countdown-message")
                .attr_if(!expired, "hidden", "")
                .text(settings.completion_message.clone()),
        );

    let target_iso = target
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
        .map_err(|e| WidgetError::Encode(e.to_string()))?;

    Ok(WidgetView {
        kind: WidgetKind::Countdown,
        instance_id: id.to_string(),
        root,
        styles: stylesheet(settings, id),
        script: Some(Script::new(
            id,
            json!({ "target": target_iso, "hideOnComplete": settings.hide_on_complete }),
            SCRIPT,
        )),
    })
}

fn layout_name(layout: CountdownLayout) -> &'static str {
    match layout {
        CountdownLayout::Inline => "inline",
        CountdownLayout::Boxes => "boxes",
        CountdownLayout::Minimal => "minimal",
    }
}

fn stylesheet(s: &CountdownSettings, id: &str) -> Stylesheet {
    let mut sheet = Stylesheet::new();
    let radius = style::px(s.border_radius);
    let minimal = s.layout == CountdownLayout::Minimal;
    sheet.rule(
        scoped(id, ""),
        decls([
            ("background", if minimal { "transparent" } else { s.background_color.as_str() }),
            ("color", &s.text_color),
            ("padding", if minimal { "0" } else { "24px" }),
            ("border-radius", &radius),
            ("text-align", "center"),
            ("font-family", FONT_STACK),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-countdown-title"),
        decls([("margin", "0 0 12px"), ("font-size", "16px"), ("font-weight", "600"), ("color", &s.accent_color)]),
    );
    sheet.rule(
        scoped(id, ".wh-countdown-units"),
        decls([
            ("display", "flex"),
            ("justify-content", "center"),
            ("gap", if s.layout == CountdownLayout::Inline { "6px" } else { "12px" }),
            ("flex-wrap", "wrap"),
        ]),
    );
    let cell_decls = match s.layout {
        CountdownLayout::Boxes => decls([
            ("display", "flex"),
            ("flex-direction", "column"),
            ("align-items", "center"),
            ("min-width", "72px"),
            ("padding", "12px 8px"),
            ("background", &s.box_color),
            ("border-radius", &radius),
        ]),
        CountdownLayout::Inline => decls([("display", "inline-flex"), ("align-items", "baseline"), ("gap", "4px")]),
        CountdownLayout::Minimal => decls([("display", "flex"), ("flex-direction", "column"), ("align-items", "center")]),
    };
    sheet.rule(scoped(id, ".wh-countdown-cell"), cell_decls);
    sheet.rule(
        scoped(id, ".wh-countdown-value"),
        decls([
            ("font-size", &style::px(s.font_size)),
            ("font-weight", "700"),
            ("line-height", "1"),
            ("font-variant-numeric", "tabular-nums"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-countdown-label"),
        decls([("margin-top", "4px"), ("font-size", "12px"), ("text-transform", "uppercase"), ("opacity", "0.75")]),
    );
    sheet.rule(
        scoped(id, ".wh-countdown-message"),
        decls([("margin", "0"), ("font-size", "18px"), ("font-weight", "600")]),
    );
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<CountdownSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: CountdownSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::Countdown, &decoded)?;
    view(&decoded, &id, mode)
}

#[cfg(test)]
#[path = "countdown_test.rs"]
mod tests;
