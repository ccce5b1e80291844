//! Announcement bar pinned to the top or bottom of the host page.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{defaults_of, scoped};
use crate::dismissal::DismissalPolicy;
use crate::escape::safe_url;
use crate::style::{self, Animation, FONT_STACK};
use crate::view::{Element, RenderMode, Script, Stylesheet, WidgetView, decls, decode_settings, instance_id};
use crate::{WidgetError, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarPosition {
    #[default]
    Top,
    Bottom,
}

impl BarPosition {
    #[must_use]
    pub fn edge(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementSettings {
    pub message: String,
    pub show_link: bool,
    pub link_text: String,
    pub link_url: String,
    pub open_in_new_tab: bool,
    pub position: BarPosition,
    pub sticky: bool,
    pub closeable: bool,
    pub remember_dismissal: bool,
    pub storage_key: String,
    pub animation: Animation,
    pub animation_duration_ms: u64,
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub font_size: f64,
}

impl Default for AnnouncementSettings {
    fn default() -> Self {
        Self {
            message: "Free shipping on all orders over $50!".into(),
            show_link: true,
            link_text: "Shop now".into(),
            link_url: "#".into(),
            open_in_new_tab: false,
            position: BarPosition::Top,
            sticky: true,
            closeable: true,
            remember_dismissal: true,
            storage_key: "wh-announcement-dismissed".into(),
            animation: Animation::Slide,
            animation_duration_ms: 400,
            background_color: "#4f46e5".into(),
            text_color: "#ffffff".into(),
            button_color: "#ffffff".into(),
            button_text_color: "#4f46e5".into(),
            font_size: 14.0,
        }
    }
}

impl AnnouncementSettings {
    #[must_use]
    pub fn dismissal(&self) -> DismissalPolicy {
        DismissalPolicy {
            closeable: self.closeable,
            remember: self.remember_dismissal,
            storage_key: self.storage_key.clone(),
        }
    }
}

const SCRIPT: &str = with_dismissal!(r"
if (isDismissed()) {
  root.parentNode && root.parentNode.removeChild(root);
  return;
}
root.hidden = false;
requestAnimationFrame(function () {
  requestAnimationFrame(function () { root.classList.add('is-visible'); });
});
var close = root.querySelector('.wh-bar-close');
if (close && cfg.closeable) {
  close.addEventListener('click', function () {
    rememberDismissal();
    root.classList.remove('is-visible');
    setTimeout(function () {
      root.parentNode && root.parentNode.removeChild(root);
    }, cfg.duration);
  });
}
");

#[must_use]
pub fn view(settings: &AnnouncementSettings, id: &str, mode: RenderMode) -> WidgetView {
    let visible = mode.is_preview();
    let root = Element::new("div")
        .id(id)
        .class(if visible { "wh-announcement is-visible" } else { "wh-announcement" })
        .attr("role", "region")
        .attr("aria-label", "Announcement")
        .attr_if(!visible, "hidden", "")
        .child(
            Element::new("div")
                .class("wh-bar-content")
                .child(Element::new("span").class("wh-bar-message").text(settings.message.clone()))
                .child_if(settings.show_link && !settings.link_text.trim().is_empty(), || {
                    Element::new("a")
                        .class("wh-bar-link")
                        .attr("href", safe_url(&settings.link_url))
                        .attr_if(settings.open_in_new_tab, "target", "_blank")
                        .attr_if(settings.open_in_new_tab, "rel", "noopener")
                        .text(settings.link_text.clone())
                }),
        )
        .child_if(settings.closeable, || {
            Element::new("button")
                .class("wh-bar-close")
                .attr("type", "button")
                .attr("aria-label", "Close announcement")
                .text("×")
        });

    let mut config = settings.dismissal().script_config();
    config.insert("duration".into(), json!(settings.animation_duration_ms));

    WidgetView {
        kind: WidgetKind::AnnouncementBar,
        instance_id: id.to_string(),
        root,
        styles: stylesheet(settings, id),
        script: Some(Script::new(id, Value::Object(config), SCRIPT)),
    }
}

fn stylesheet(s: &AnnouncementSettings, id: &str) -> Stylesheet {
    let edge = s.position.edge();
    let (hidden_transform, shown_transform) = style::entrance(s.animation, edge);
    let hidden_opacity = if matches!(s.animation, Animation::None) { "1" } else { "0" };
    let duration = if matches!(s.animation, Animation::None) { 0 } else { s.animation_duration_ms };
    let transition = format!("transform {0} ease, opacity {0} ease", style::ms(duration));

    let mut root_decls = decls([
        ("position", if s.sticky { "fixed" } else { "relative" }),
        ("left", "0"),
        ("right", "0"),
        ("z-index", "9999"),
        ("background", &s.background_color),
        ("color", &s.text_color),
        ("font-family", FONT_STACK),
        ("font-size", &style::px(s.font_size)),
        ("transform", hidden_transform),
        ("opacity", hidden_opacity),
        ("transition", &transition),
    ]);
    if s.sticky {
        root_decls.push((edge, "0".to_string()));
    }

    let mut sheet = Stylesheet::new();
    sheet.rule(scoped(id, ""), root_decls);
    sheet.rule(format!("#{id}.is-visible"), decls([("transform", shown_transform), ("opacity", "1")]));
    sheet.rule(
        scoped(id, ".wh-bar-content"),
        decls([
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("flex-wrap", "wrap"),
            ("gap", "12px"),
            ("padding", "10px 48px"),
            ("text-align", "center"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-bar-link"),
        decls([
            ("display", "inline-block"),
            ("padding", "4px 12px"),
            ("border-radius", "4px"),
            ("background", &s.button_color),
            ("color", &s.button_text_color),
            ("font-weight", "600"),
            ("text-decoration", "none"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-bar-close"),
        decls([
            ("position", "absolute"),
            ("top", "50%"),
            ("right", "12px"),
            ("transform", "translateY(-50%)"),
            ("background", "none"),
            ("border", "0"),
            ("color", "inherit"),
            ("font-size", "20px"),
            ("line-height", "1"),
            ("cursor", "pointer"),
        ]),
    );
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<AnnouncementSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: AnnouncementSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::AnnouncementBar, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

#[cfg(test)]
#[path = "announcement_test.rs"]
mod tests;
