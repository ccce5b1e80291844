//! FAQ accordion.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{defaults_of, edit, move_within, remove_from, scoped};
use crate::list;
use crate::style::{self, FONT_STACK};
use crate::view::{Element, RenderMode, Script, Stylesheet, WidgetView, decls, decode_settings, instance_id};
use crate::{WidgetError, WidgetKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub id: u32,
    pub question: String,
    pub answer: String,
}

impl Default for FaqItem {
    fn default() -> Self {
        Self { id: 1, question: "New question".into(), answer: "Answer goes here.".into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqIcon {
    #[default]
    Chevron,
    Plus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqSettings {
    pub title: String,
    pub items: Vec<FaqItem>,
    pub allow_multiple_open: bool,
    pub default_open_first: bool,
    pub show_search: bool,
    pub search_placeholder: String,
    pub icon: FaqIcon,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    pub border_radius: f64,
    pub max_width: f64,
}

impl Default for FaqSettings {
    fn default() -> Self {
        let items = [
            ("What is your return policy?", "You can return any item within 30 days of purchase for a full refund."),
            ("How long does shipping take?", "Orders ship within 1-2 business days and arrive in 3-5 days."),
            ("Do you ship internationally?", "Yes, we ship to over 50 countries worldwide."),
        ]
        .into_iter()
        .zip(1..)
        .map(|((question, answer), id)| FaqItem { id, question: question.into(), answer: answer.into() })
        .collect();
        Self {
            title: "Frequently Asked Questions".into(),
            items,
            allow_multiple_open: false,
            default_open_first: true,
            show_search: false,
            search_placeholder: "Search questions...".into(),
            icon: FaqIcon::Chevron,
            accent_color: "#4f46e5".into(),
            background_color: "#ffffff".into(),
            text_color: "#111827".into(),
            border_color: "#e5e7eb".into(),
            border_radius: 8.0,
            max_width: 720.0,
        }
    }
}

impl FaqSettings {
    /// Append a blank item with a fresh id.
    pub fn add_item(&mut self) -> &mut FaqItem {
        let id = list::next_id(&self.items, |item| item.id);
        self.items.push(FaqItem { id, ..FaqItem::default() });
        let last = self.items.len() - 1;
        &mut self.items[last]
    }
}

// =============================================================================
// ACCORDION STATE
// =============================================================================

/// Open/closed state for each item, with single-open semantics unless
/// multiple open items are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    open: Vec<bool>,
    allow_multiple: bool,
}

impl Accordion {
    #[must_use]
    pub fn new(len: usize, allow_multiple: bool, default_open_first: bool) -> Self {
        let mut open = vec![false; len];
        if default_open_first {
            if let Some(first) = open.first_mut() {
                *first = true;
            }
        }
        Self { open, allow_multiple }
    }

    #[must_use]
    pub fn for_settings(settings: &FaqSettings) -> Self {
        Self::new(settings.items.len(), settings.allow_multiple_open, settings.default_open_first)
    }

    /// Toggle one item. Returns its new state; out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(current) = self.open.get(index).copied() else {
            return false;
        };
        let next = !current;
        if next && !self.allow_multiple {
            self.open.iter_mut().for_each(|o| *o = false);
        }
        self.open[index] = next;
        next
    }

    #[must_use]
    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }
}

// =============================================================================
// VIEW
// =============================================================================

const SCRIPT: &str = r"
var items = root.querySelectorAll('.wh-faq-item');
function setOpen(item, open) {
  item.classList.toggle('is-open', open);
  item.querySelector('.wh-faq-question').setAttribute('aria-expanded', open ? 'true' : 'false');
  item.querySelector('.wh-faq-answer').hidden = !open;
}
Array.prototype.forEach.call(items, function (item) {
  item.querySelector('.wh-faq-question').addEventListener('click', function () {
    var open = !item.classList.contains('is-open');
    if (open && !cfg.allowMultiple) {
      Array.prototype.forEach.call(items, function (other) {
        if (other !== item) setOpen(other, false);
      });
    }
    setOpen(item, open);
  });
});
var search = root.querySelector('.wh-faq-search');
if (search) {
  search.addEventListener('input', function () {
    var query = search.value.trim().toLowerCase();
    Array.prototype.forEach.call(items, function (item) {
      var match = !query || item.textContent.toLowerCase().indexOf(query) !== -1;
      item.style.display = match ? '' : 'none';
    });
  });
}
";

#[must_use]
pub fn view(settings: &FaqSettings, id: &str, _mode: RenderMode) -> WidgetView {
    let state = Accordion::for_settings(settings);
    let icon = match settings.icon {
        FaqIcon::Chevron => "▾",
        FaqIcon::Plus => "+",
    };

    let items = settings.items.iter().enumerate().map(|(index, item)| {
        let open = state.is_open(index);
        let answer_id = format!("{id}-answer-{}", item.id);
        Element::new("div")
            .class(if open { "wh-faq-item is-open" } else { "wh-faq-item" })
            .child(
                Element::new("button")
                    .class("wh-faq-question")
                    .attr("type", "button")
                    .attr("aria-expanded", if open { "true" } else { "false" })
                    .attr("aria-controls", answer_id.clone())
                    .child(Element::new("span").text(item.question.clone()))
                    .child(Element::new("span").class("wh-faq-icon").attr("aria-hidden", "true").text(icon)),
            )
            .child(
                Element::new("div")
                    .class("wh-faq-answer")
                    .id(answer_id)
                    .attr_if(!open, "hidden", "")
                    .text(item.answer.clone()),
            )
    });

    let root = Element::new("div")
        .id(id)
        .class("wh-faq")
        .child_if(!settings.title.trim().is_empty(), || {
            Element::new("h2").class("wh-faq-title").text(settings.title.clone())
        })
        .child_if(settings.show_search, || {
            Element::new("input")
                .class("wh-faq-search")
                .attr("type", "search")
                .attr("placeholder", settings.search_placeholder.clone())
                .attr("aria-label", settings.search_placeholder.clone())
        })
        .child(Element::new("div").class("wh-faq-list").children(items));

    WidgetView {
        kind: WidgetKind::Faq,
        instance_id: id.to_string(),
        root,
        styles: stylesheet(settings, id),
        script: Some(Script::new(id, json!({ "allowMultiple": settings.allow_multiple_open }), SCRIPT)),
    }
}

fn stylesheet(s: &FaqSettings, id: &str) -> Stylesheet {
    let radius = style::px(s.border_radius);
    let border = format!("1px solid {}", s.border_color);
    let open_rotation = match s.icon {
        FaqIcon::Chevron => "rotate(180deg)",
        FaqIcon::Plus => "rotate(45deg)",
    };

    let mut sheet = Stylesheet::new();
    sheet.rule(
        scoped(id, ""),
        decls([
            ("max-width", &style::px(s.max_width)),
            ("margin", "0 auto"),
            ("color", &s.text_color),
            ("font-family", FONT_STACK),
        ]),
    );
    sheet.rule(scoped(id, ".wh-faq-title"), decls([("margin", "0 0 16px"), ("font-size", "24px"), ("text-align", "center")]));
    sheet.rule(
        scoped(id, ".wh-faq-search"),
        decls([
            ("width", "100%"),
            ("box-sizing", "border-box"),
            ("margin-bottom", "12px"),
            ("padding", "10px 12px"),
            ("border", &border),
            ("border-radius", &radius),
            ("font-size", "14px"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-faq-item"),
        decls([
            ("background", &s.background_color),
            ("border", &border),
            ("border-radius", &radius),
            ("margin-bottom", "8px"),
            ("overflow", "hidden"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-faq-question"),
        decls([
            ("display", "flex"),
            ("width", "100%"),
            ("justify-content", "space-between"),
            ("align-items", "center"),
            ("gap", "12px"),
            ("padding", "16px"),
            ("background", "none"),
            ("border", "0"),
            ("color", "inherit"),
            ("font", "inherit"),
            ("font-weight", "600"),
            ("text-align", "left"),
            ("cursor", "pointer"),
        ]),
    );
    sheet.rule(
        scoped(id, ".wh-faq-icon"),
        decls([("color", &s.accent_color), ("transition", "transform 0.2s ease"), ("font-size", "18px")]),
    );
    sheet.rule(scoped(id, ".wh-faq-item.is-open .wh-faq-icon"), decls([("transform", open_rotation)]));
    sheet.rule(scoped(id, ".wh-faq-item.is-open"), decls([("border-color", &s.accent_color)]));
    sheet.rule(
        scoped(id, ".wh-faq-answer"),
        decls([("padding", "0 16px 16px"), ("line-height", "1.6"), ("white-space", "pre-line"), ("opacity", "0.85")]),
    );
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<FaqSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: FaqSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::Faq, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

/// Remove one FAQ item, keeping at least one.
///
/// # Errors
///
/// Returns [`WidgetError::LastItem`] when only one item is left.
pub fn remove_item(settings: &Value, index: usize) -> Result<Value, WidgetError> {
    remove_from(settings, index, "FAQ item", items_of)
}

/// Append a new item. `variant` is unused; FAQ items have one shape.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn add_item(settings: &Value, _variant: Option<&str>) -> Result<Value, WidgetError> {
    edit(settings, |decoded: &mut FaqSettings| {
        decoded.add_item();
        Ok(())
    })
}

/// Move one item from `from` to `to`.
///
/// # Errors
///
/// Returns [`WidgetError::IndexOutOfRange`] if either index is invalid.
pub fn move_item(settings: &Value, from: usize, to: usize) -> Result<Value, WidgetError> {
    move_within(settings, from, to, items_of)
}

fn items_of(settings: &mut FaqSettings) -> &mut Vec<FaqItem> {
    &mut settings.items
}

#[cfg(test)]
#[path = "faq_test.rs"]
mod tests;
