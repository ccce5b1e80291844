//! Modal popup, plus the dialog shell and trigger behavior shared with the
//! popup builder.
//!
//! DESIGN
//! ======
//! The snippet renders the dialog hidden and its script opens it when the
//! configured trigger fires: a delay, exit intent, or a scroll depth. A
//! remembered dismissal keeps it closed on later visits. Previews render the
//! dialog already open.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{defaults_of, scoped};
use crate::dismissal::DismissalPolicy;
use crate::escape::safe_url;
use crate::style::{self, Animation, FONT_STACK, MOBILE_BREAKPOINT};
use crate::view::{
    Element, RenderMode, Rule, Script, Stylesheet, WidgetView, decls, decode_settings, instance_id,
};
use crate::{WidgetError, WidgetKind};

// =============================================================================
// BEHAVIOR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupTrigger {
    #[default]
    Delay,
    ExitIntent,
    Scroll,
}

impl PopupTrigger {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delay => "delay",
            Self::ExitIntent => "exit_intent",
            Self::Scroll => "scroll",
        }
    }
}

/// HTTP method of an email capture form with an action URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMethod {
    #[default]
    Post,
    Get,
}

impl FormMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Get => "get",
        }
    }
}

/// Page events the popup script reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    Elapsed { ms: u64 },
    Scrolled { percent: f64 },
    ExitIntent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupBehavior {
    pub trigger: PopupTrigger,
    pub delay_seconds: f64,
    pub scroll_percent: f64,
    pub show_overlay: bool,
    pub overlay_color: String,
    pub close_on_overlay_click: bool,
    pub closeable: bool,
    /// Remember a dismissal so the popup stays closed on later visits.
    pub show_once: bool,
    pub storage_key: String,
    pub animation: Animation,
    pub animation_duration_ms: u64,
}

impl Default for PopupBehavior {
    fn default() -> Self {
        Self {
            trigger: PopupTrigger::Delay,
            delay_seconds: 3.0,
            scroll_percent: 50.0,
            show_overlay: true,
            overlay_color: "rgba(0, 0, 0, 0.5)".into(),
            close_on_overlay_click: true,
            closeable: true,
            show_once: true,
            storage_key: "wh-popup-dismissed".into(),
            animation: Animation::Zoom,
            animation_duration_ms: 300,
        }
    }
}

impl PopupBehavior {
    #[must_use]
    pub fn dismissal(&self) -> DismissalPolicy {
        DismissalPolicy {
            closeable: self.closeable,
            remember: self.show_once,
            storage_key: self.storage_key.clone(),
        }
    }

    #[must_use]
    pub fn delay_ms(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ms = (self.delay_seconds.max(0.0) * 1000.0).round() as u64;
        ms
    }

    /// Whether `event` opens the popup under the configured trigger.
    #[must_use]
    pub fn fires_on(&self, event: PageEvent) -> bool {
        match (self.trigger, event) {
            (PopupTrigger::Delay, PageEvent::Elapsed { ms }) => ms >= self.delay_ms(),
            (PopupTrigger::Scroll, PageEvent::Scrolled { percent }) => percent >= self.scroll_percent,
            (PopupTrigger::ExitIntent, PageEvent::ExitIntent) => true,
            _ => false,
        }
    }

    fn script_config(&self) -> Value {
        let mut config = self.dismissal().script_config();
        config.insert("trigger".into(), json!(self.trigger.as_str()));
        config.insert("delayMs".into(), json!(self.delay_ms()));
        config.insert("scrollPercent".into(), json!(self.scroll_percent));
        config.insert("closeOnOverlay".into(), json!(self.close_on_overlay_click));
        config.insert("duration".into(), json!(self.duration_ms()));
        Value::Object(config)
    }

    fn duration_ms(&self) -> u64 {
        if self.animation == Animation::None { 0 } else { self.animation_duration_ms }
    }
}

// =============================================================================
// DIALOG SHELL
// =============================================================================

const SCRIPT: &str = with_dismissal!(r"
if (isDismissed()) return;
var shown = false;
function open() {
  if (shown) return;
  shown = true;
  root.hidden = false;
  requestAnimationFrame(function () {
    requestAnimationFrame(function () { root.classList.add('is-open'); });
  });
}
function close() {
  rememberDismissal();
  root.classList.remove('is-open');
  setTimeout(function () { root.hidden = true; }, cfg.duration);
}
if (cfg.trigger === 'exit_intent') {
  document.addEventListener('mouseout', function onLeave(event) {
    if (!event.relatedTarget && event.clientY <= 0) {
      document.removeEventListener('mouseout', onLeave);
      open();
    }
  });
} else if (cfg.trigger === 'scroll') {
  window.addEventListener('scroll', function onScroll() {
    var max = document.documentElement.scrollHeight - window.innerHeight;
    var percent = max > 0 ? (window.scrollY / max) * 100 : 100;
    if (percent >= cfg.scrollPercent) {
      window.removeEventListener('scroll', onScroll);
      open();
    }
  }, { passive: true });
} else {
  setTimeout(open, cfg.delayMs);
}
var closeButton = root.querySelector('.wh-popup-close');
if (closeButton && cfg.closeable) closeButton.addEventListener('click', close);
var overlay = root.querySelector('.wh-popup-overlay');
if (overlay && cfg.closeable && cfg.closeOnOverlay) overlay.addEventListener('click', close);
document.addEventListener('keydown', function (event) {
  if (event.key === 'Escape' && cfg.closeable && root.classList.contains('is-open')) close();
});
var form = root.querySelector('.wh-popup-form');
var action = form ? form.getAttribute('action') : null;
if (form && (!action || action === '#')) {
  form.addEventListener('submit', function (event) {
    event.preventDefault();
    form.hidden = true;
    var done = root.querySelector('.wh-popup-success');
    if (done) done.hidden = false;
  });
}
");

/// Colors and size of the dialog box.
pub(crate) struct DialogLook<'a> {
    pub max_width: f64,
    pub background_color: &'a str,
    pub text_color: &'a str,
    pub border_radius: f64,
}

/// Wrap dialog content in the overlay/close-button shell.
pub(crate) fn shell(id: &str, behavior: &PopupBehavior, mode: RenderMode, content: Element) -> Element {
    let open = mode.is_preview();
    Element::new("div")
        .id(id)
        .class(if open { "wh-popup-root is-open" } else { "wh-popup-root" })
        .attr_if(!open, "hidden", "")
        .child_if(behavior.show_overlay, || Element::new("div").class("wh-popup-overlay"))
        .child(
            Element::new("div")
                .class("wh-popup")
                .attr("role", "dialog")
                .attr("aria-modal", "true")
                .attr("aria-labelledby", format!("{id}-title"))
                .child_if(behavior.closeable, || {
                    Element::new("button").class("wh-popup-close").attr("type", "button").attr("aria-label", "Close").text("×")
                })
                .child(content),
        )
}

pub(crate) fn shell_styles(sheet: &mut Stylesheet, id: &str, behavior: &PopupBehavior, look: &DialogLook<'_>) {
    let (hidden_transform, shown_transform) = style::entrance(behavior.animation, "bottom");
    let hidden_opacity = if behavior.animation == Animation::None { "1" } else { "0" };
    let transition = format!("transform {0} ease, opacity {0} ease", style::ms(behavior.duration_ms()));
    let radius = style::px(look.border_radius);

    sheet.rule(
        scoped(id, ""),
        decls([
            ("position", "fixed"),
            ("inset", "0"),
            ("z-index", "10000"),
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("padding", "16px"),
            ("font-family", FONT_STACK),
        ]),
    );
    sheet.rule(format!("#{id}[hidden]"), decls([("display", "none")]));
    sheet.rule(
        scoped(id, ".wh-popup-overlay"),
        decls([("position", "absolute"), ("inset", "0"), ("background", &behavior.overlay_color)]),
    );
    sheet.rule(
        scoped(id, ".wh-popup"),
        decls([
            ("position", "relative"),
            ("width", "100%"),
            ("max-width", &style::px(look.max_width)),
            ("box-sizing", "border-box"),
            ("padding", "32px"),
            ("background", look.background_color),
            ("color", look.text_color),
            ("border-radius", &radius),
            ("box-shadow", style::card_shadow(true)),
            ("text-align", "center"),
            ("transform", hidden_transform),
            ("opacity", hidden_opacity),
            ("transition", &transition),
        ]),
    );
    sheet.rule(format!("#{id}.is-open .wh-popup"), decls([("transform", shown_transform), ("opacity", "1")]));
    sheet.rule(
        scoped(id, ".wh-popup-close"),
        decls([
            ("position", "absolute"),
            ("top", "8px"),
            ("right", "12px"),
            ("background", "none"),
            ("border", "0"),
            ("color", "inherit"),
            ("font-size", "24px"),
            ("line-height", "1"),
            ("cursor", "pointer"),
            ("opacity", "0.6"),
        ]),
    );
    sheet.media(
        MOBILE_BREAKPOINT,
        vec![Rule { selector: scoped(id, ".wh-popup"), decls: decls([("padding", "24px 16px")]) }],
    );
}

pub(crate) fn shell_script(id: &str, behavior: &PopupBehavior) -> Script {
    Script::new(id, behavior.script_config(), SCRIPT)
}

/// Where an email capture form posts to. An empty action keeps the
/// submission on the page and only shows the success message.
pub(crate) struct FormTarget<'a> {
    pub action_url: &'a str,
    pub method: FormMethod,
}

/// Email capture form with its hidden success message.
pub(crate) fn email_form(
    placeholder: &str,
    button_text: &str,
    success_message: &str,
    target: &FormTarget<'_>,
) -> [Element; 2] {
    let has_action = !target.action_url.trim().is_empty();
    [
        Element::new("form")
            .class("wh-popup-form")
            .attr_if(has_action, "action", safe_url(target.action_url))
            .attr_if(has_action, "method", target.method.as_str())
            .child(
                Element::new("input")
                    .attr("type", "email")
                    .attr("name", "email")
                    .attr("required", "")
                    .attr("placeholder", placeholder)
                    .attr("aria-label", placeholder),
            )
            .child(Element::new("button").class("wh-popup-button").attr("type", "submit").text(button_text)),
        Element::new("p").class("wh-popup-success").attr("hidden", "").text(success_message),
    ]
}

pub(crate) fn form_styles(sheet: &mut Stylesheet, id: &str, accent: &str, accent_text: &str) {
    sheet.rule(scoped(id, ".wh-popup-form"), decls([("display", "flex"), ("gap", "8px"), ("margin-top", "16px")]));
    sheet.rule(
        scoped(id, ".wh-popup-form input"),
        decls([("flex", "1"), ("min-width", "0"), ("padding", "10px 12px"), ("border", "1px solid #d1d5db"), ("border-radius", "6px")]),
    );
    sheet.rule(
        scoped(id, ".wh-popup-button"),
        decls([
            ("display", "inline-block"),
            ("padding", "10px 20px"),
            ("border", "0"),
            ("border-radius", "6px"),
            ("background", accent),
            ("color", accent_text),
            ("font-weight", "600"),
            ("text-decoration", "none"),
            ("cursor", "pointer"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-popup-success"), decls([("margin-top", "16px"), ("font-weight", "600")]));
}

// =============================================================================
// POPUP WIDGET
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    pub title: String,
    pub message: String,
    pub image_url: String,
    pub show_email_capture: bool,
    pub action_url: String,
    pub method: FormMethod,
    pub email_placeholder: String,
    pub success_message: String,
    pub button_text: String,
    pub button_url: String,
    #[serde(flatten)]
    pub behavior: PopupBehavior,
    pub max_width: f64,
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub border_radius: f64,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            title: "Get 10% off your first order".into(),
            message: "Join our newsletter for exclusive deals and updates.".into(),
            image_url: String::new(),
            show_email_capture: true,
            action_url: String::new(),
            method: FormMethod::Post,
            email_placeholder: "Enter your email".into(),
            success_message: "Thanks for subscribing!".into(),
            button_text: "Subscribe".into(),
            button_url: "#".into(),
            behavior: PopupBehavior::default(),
            max_width: 440.0,
            background_color: "#ffffff".into(),
            text_color: "#111827".into(),
            button_color: "#4f46e5".into(),
            button_text_color: "#ffffff".into(),
            border_radius: 12.0,
        }
    }
}

#[must_use]
pub fn view(settings: &PopupSettings, id: &str, mode: RenderMode) -> WidgetView {
    let mut content = Element::new("div")
        .class("wh-popup-content")
        .child_if(!settings.image_url.trim().is_empty(), || {
            Element::new("img").class("wh-popup-image").attr("src", safe_url(&settings.image_url)).attr("alt", "")
        })
        .child(Element::new("h2").class("wh-popup-title").id(format!("{id}-title")).text(settings.title.clone()))
        .child(Element::new("p").class("wh-popup-message").text(settings.message.clone()));
    content = if settings.show_email_capture {
        let target = FormTarget { action_url: &settings.action_url, method: settings.method };
        content.children(email_form(
            &settings.email_placeholder,
            &settings.button_text,
            &settings.success_message,
            &target,
        ))
    } else {
        content.child(
            Element::new("a")
                .class("wh-popup-button")
                .attr("href", safe_url(&settings.button_url))
                .text(settings.button_text.clone()),
        )
    };

    let look = DialogLook {
        max_width: settings.max_width,
        background_color: &settings.background_color,
        text_color: &settings.text_color,
        border_radius: settings.border_radius,
    };
    let mut styles = Stylesheet::new();
    shell_styles(&mut styles, id, &settings.behavior, &look);
    form_styles(&mut styles, id, &settings.button_color, &settings.button_text_color);
    styles.rule(
        scoped(id, ".wh-popup-image"),
        decls([("display", "block"), ("max-width", "100%"), ("margin", "0 auto 16px"), ("border-radius", "8px")]),
    );
    styles.rule(scoped(id, ".wh-popup-title"), decls([("margin", "0 0 8px"), ("font-size", "24px")]));
    styles.rule(scoped(id, ".wh-popup-message"), decls([("margin", "0"), ("line-height", "1.5"), ("opacity", "0.8")]));

    WidgetView {
        kind: WidgetKind::Popup,
        instance_id: id.to_string(),
        root: shell(id, &settings.behavior, mode, content),
        styles,
        script: Some(shell_script(id, &settings.behavior)),
    }
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<PopupSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: PopupSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::Popup, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

#[cfg(test)]
#[path = "popup_test.rs"]
mod tests;
