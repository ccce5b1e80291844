//! Logo ticker: an endlessly scrolling strip of logos.
//!
//! The logo list is rendered twice in one track and the track is animated
//! by exactly half its width, so the second copy lands where the first
//! started and the loop has no visible seam.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{defaults_of, scoped};
use crate::escape::safe_url;
use crate::style::{self, BackgroundMode, FONT_STACK, MOBILE_BREAKPOINT};
use crate::view::{Element, RenderMode, Rule, Script, Stylesheet, WidgetView, decls, decode_settings, instance_id};
use crate::{WidgetError, WidgetKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logo {
    pub url: String,
    pub alt: String,
    pub link: String,
}

impl Default for Logo {
    fn default() -> Self {
        Self { url: String::new(), alt: "Logo".into(), link: String::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoTickerSettings {
    pub title: String,
    pub logos: Vec<Logo>,
    /// Seconds for one full loop.
    pub speed: f64,
    pub direction: Direction,
    pub pause_on_hover: bool,
    pub grayscale: bool,
    pub hover_scale: f64,
    pub logo_height: f64,
    pub mobile_logo_height: f64,
    pub gap: f64,
    pub padding_y: f64,
    pub background_mode: BackgroundMode,
    pub background_color: String,
    pub gradient_start: String,
    pub gradient_end: String,
    pub gradient_angle: f64,
    pub title_color: String,
}

impl Default for LogoTickerSettings {
    fn default() -> Self {
        let logos = (1..=5)
            .map(|n| Logo {
                url: format!("https://placehold.co/140x48?text=Logo+{n}"),
                alt: format!("Partner {n}"),
                link: String::new(),
            })
            .collect();
        Self {
            title: "Trusted by leading brands".into(),
            logos,
            speed: 30.0,
            direction: Direction::Left,
            pause_on_hover: true,
            grayscale: true,
            hover_scale: 1.1,
            logo_height: 40.0,
            mobile_logo_height: 28.0,
            gap: 48.0,
            padding_y: 24.0,
            background_mode: BackgroundMode::Solid,
            background_color: "#ffffff".into(),
            gradient_start: "#f8fafc".into(),
            gradient_end: "#e2e8f0".into(),
            gradient_angle: 90.0,
            title_color: "#64748b".into(),
        }
    }
}

const SCRIPT: &str = r"
var logos = root.querySelectorAll('.wh-ticker-logo');
Array.prototype.forEach.call(logos, function (logo) {
  logo.addEventListener('mouseenter', function () {
    logo.style.filter = 'grayscale(0)';
    logo.style.opacity = '1';
    logo.style.transform = 'scale(' + cfg.hoverScale + ')';
  });
  logo.addEventListener('mouseleave', function () {
    logo.style.filter = cfg.grayscale ? 'grayscale(1)' : '';
    logo.style.opacity = cfg.grayscale ? '0.6' : '';
    logo.style.transform = '';
  });
});
";

/// The track's logo sequence: the configured list followed by one copy.
#[must_use]
pub fn track_sequence(logos: &[Logo]) -> Vec<(&Logo, bool)> {
    logos
        .iter()
        .map(|logo| (logo, false))
        .chain(logos.iter().map(|logo| (logo, true)))
        .collect()
}

#[must_use]
pub fn view(settings: &LogoTickerSettings, id: &str, _mode: RenderMode) -> WidgetView {
    let items = track_sequence(&settings.logos).into_iter().map(|(logo, duplicate)| {
        let img = Element::new("img")
            .class("wh-ticker-logo")
            .attr("src", safe_url(&logo.url))
            .attr("alt", if duplicate { String::new() } else { logo.alt.clone() })
            .attr("loading", "lazy");
        let inner = if logo.link.trim().is_empty() {
            img
        } else {
            Element::new("a")
                .attr("href", safe_url(&logo.link))
                .attr("target", "_blank")
                .attr("rel", "noopener")
                .attr_if(duplicate, "tabindex", "-1")
                .child(img)
        };
        Element::new("div").class("wh-ticker-item").attr_if(duplicate, "aria-hidden", "true").child(inner)
    });

    let root = Element::new("section")
        .id(id)
        .class("wh-logo-ticker")
        .child_if(!settings.title.trim().is_empty(), || {
            Element::new("p").class("wh-ticker-title").text(settings.title.clone())
        })
        .child(
            Element::new("div")
                .class("wh-ticker-viewport")
                .child(Element::new("div").class("wh-ticker-track").children(items)),
        );

    WidgetView {
        kind: WidgetKind::LogoTicker,
        instance_id: id.to_string(),
        root,
        styles: stylesheet(settings, id),
        script: Some(Script::new(
            id,
            json!({ "grayscale": settings.grayscale, "hoverScale": settings.hover_scale }),
            SCRIPT,
        )),
    }
}

fn stylesheet(s: &LogoTickerSettings, id: &str) -> Stylesheet {
    let animation_name = format!("{id}-scroll");
    let bg = style::background(s.background_mode, &s.background_color, &s.gradient_start, &s.gradient_end, s.gradient_angle);
    let direction = match s.direction {
        Direction::Left => "normal",
        Direction::Right => "reverse",
    };

    let mut sheet = Stylesheet::new();
    sheet.rule(
        scoped(id, ""),
        decls([
            ("background", &bg),
            ("padding", &format!("{} 0", style::px(s.padding_y))),
            ("overflow", "hidden"),
            ("font-family", FONT_STACK),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-ticker-title"),
        decls([
            ("margin", "0 0 16px"),
            ("text-align", "center"),
            ("font-size", "14px"),
            ("letter-spacing", "0.05em"),
            ("text-transform", "uppercase"),
            ("color", &s.title_color),
        ]),
    );
    sheet.rule(scoped(id, ".wh-ticker-viewport"), decls([("overflow", "hidden"), ("width", "100%")]));
    sheet.rule(
        scoped(id, ".wh-ticker-track"),
        decls([
            ("display", "flex"),
            ("align-items", "center"),
            ("width", "max-content"),
            ("animation", &format!("{animation_name} {} linear infinite", style::seconds(s.speed))),
            ("animation-direction", direction),
        ]),
    );
    if s.pause_on_hover {
        sheet.rule(scoped(id, ".wh-ticker-viewport:hover .wh-ticker-track"), decls([("animation-play-state", "paused")]));
    }
    sheet.rule(
        scoped(id, ".wh-ticker-item"),
        decls([("flex", "0 0 auto"), ("padding", &format!("0 {}", style::px(s.gap / 2.0)))]),
    );
    sheet.rule(
        scoped(id, ".wh-ticker-logo"),
        decls([
            ("display", "block"),
            ("height", &style::px(s.logo_height)),
            ("width", "auto"),
            ("filter", if s.grayscale { "grayscale(1)" } else { "none" }),
            ("opacity", if s.grayscale { "0.6" } else { "1" }),
            ("transition", "filter 0.3s ease, opacity 0.3s ease, transform 0.3s ease"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-ticker-logo:hover"),
        decls([
            ("filter", "grayscale(0)"),
            ("opacity", "1"),
            ("transform", &format!("scale({})", style::number(s.hover_scale))),
        ]),
    );
    sheet.keyframes(
        animation_name,
        vec![
            ("from".into(), decls([("transform", "translateX(0)")])),
            ("to".into(), decls([("transform", "translateX(-50%)")])),
        ],
    );
    sheet.media(
        MOBILE_BREAKPOINT,
        vec![
            Rule { selector: scoped(id, ".wh-ticker-logo"), decls: decls([("height", &style::px(s.mobile_logo_height))]) },
            Rule {
                selector: scoped(id, ".wh-ticker-item"),
                decls: decls([("padding", &format!("0 {}", style::px(s.gap / 4.0)))]),
            },
        ],
    );
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<LogoTickerSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: LogoTickerSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::LogoTicker, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

#[cfg(test)]
#[path = "logo_ticker_test.rs"]
mod tests;
