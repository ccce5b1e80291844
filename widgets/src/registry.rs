//! Table-driven widget registry.
//!
//! Every widget kind registers one [`WidgetEntry`]: its label, a defaults
//! constructor, a view builder, and (for kinds that own an item list) the
//! add, remove and move hooks. Compile and preview go through this table
//! only.

use serde_json::Value;
use time::OffsetDateTime;

use crate::kinds;
use crate::render::{self, RenderedSnippet};
use crate::view::{RenderMode, WidgetView};
use crate::{WidgetError, WidgetKind};

pub type BuildFn = fn(&Value, RenderMode) -> Result<WidgetView, WidgetError>;
pub type DefaultsFn = fn() -> Result<Value, WidgetError>;
pub type AddItemFn = fn(&Value, Option<&str>) -> Result<Value, WidgetError>;
pub type RemoveItemFn = fn(&Value, usize) -> Result<Value, WidgetError>;
pub type MoveItemFn = fn(&Value, usize, usize) -> Result<Value, WidgetError>;

/// Settings-in, settings-out editors for a kind's item list.
pub struct ItemHooks {
    pub add: AddItemFn,
    pub remove: RemoveItemFn,
    pub move_to: MoveItemFn,
}

pub struct WidgetEntry {
    pub kind: WidgetKind,
    pub label: &'static str,
    pub description: &'static str,
    pub defaults: DefaultsFn,
    pub build: BuildFn,
    pub items: Option<ItemHooks>,
}

// Ordered like `WidgetKind::ALL` so `entry` can index by discriminant.
static REGISTRY: [WidgetEntry; 9] = [
    WidgetEntry {
        kind: WidgetKind::LogoTicker,
        label: "Logo Ticker",
        description: "Infinitely scrolling strip of partner or client logos.",
        defaults: kinds::logo_ticker::defaults,
        build: kinds::logo_ticker::build,
        items: None,
    },
    WidgetEntry {
        kind: WidgetKind::Countdown,
        label: "Countdown Timer",
        description: "Live countdown to a date with a completion message.",
        defaults: kinds::countdown::defaults,
        build: kinds::countdown::build,
        items: None,
    },
    WidgetEntry {
        kind: WidgetKind::Faq,
        label: "FAQ Accordion",
        description: "Collapsible questions and answers with optional search.",
        defaults: kinds::faq::defaults,
        build: kinds::faq::build,
        items: Some(ItemHooks {
            add: kinds::faq::add_item,
            remove: kinds::faq::remove_item,
            move_to: kinds::faq::move_item,
        }),
    },
    WidgetEntry {
        kind: WidgetKind::AnnouncementBar,
        label: "Announcement Bar",
        description: "Dismissible top or bottom bar with an optional link.",
        defaults: kinds::announcement::defaults,
        build: kinds::announcement::build,
        items: None,
    },
    WidgetEntry {
        kind: WidgetKind::PricingTable,
        label: "Pricing Table",
        description: "Quantity tiers with per-unit pricing and savings badges.",
        defaults: kinds::pricing::defaults,
        build: kinds::pricing::build,
        items: Some(ItemHooks {
            add: kinds::pricing::add_item,
            remove: kinds::pricing::remove_item,
            move_to: kinds::pricing::move_item,
        }),
    },
    WidgetEntry {
        kind: WidgetKind::Reviews,
        label: "Google Reviews",
        description: "Customer reviews in one of six layouts.",
        defaults: kinds::reviews::defaults,
        build: kinds::reviews::build,
        items: Some(ItemHooks {
            add: kinds::reviews::add_item,
            remove: kinds::reviews::remove_item,
            move_to: kinds::reviews::move_item,
        }),
    },
    WidgetEntry {
        kind: WidgetKind::Popup,
        label: "Popup",
        description: "Timed, scroll or exit-intent modal with a call to action.",
        defaults: kinds::popup::defaults,
        build: kinds::popup::build,
        items: None,
    },
    WidgetEntry {
        kind: WidgetKind::PopupBuilder,
        label: "Popup Builder",
        description: "Modal assembled from heading, text, image, button and form blocks.",
        defaults: kinds::popup_builder::defaults,
        build: kinds::popup_builder::build,
        items: Some(ItemHooks {
            add: kinds::popup_builder::add_item,
            remove: kinds::popup_builder::remove_item,
            move_to: kinds::popup_builder::move_item,
        }),
    },
    WidgetEntry {
        kind: WidgetKind::InstagramFeed,
        label: "Instagram Feed",
        description: "Grid of recent posts with profile header.",
        defaults: kinds::instagram::defaults,
        build: kinds::instagram::build,
        items: None,
    },
];

#[must_use]
pub fn entries() -> &'static [WidgetEntry] {
    &REGISTRY
}

#[must_use]
pub fn entry(kind: WidgetKind) -> &'static WidgetEntry {
    &REGISTRY[kind as usize]
}

/// Resolve a wire tag to its registry entry.
///
/// # Errors
///
/// Returns [`WidgetError::UnknownKind`] for unregistered tags.
pub fn lookup(tag: &str) -> Result<&'static WidgetEntry, WidgetError> {
    WidgetKind::parse(tag)
        .map(entry)
        .ok_or_else(|| WidgetError::UnknownKind(tag.to_string()))
}

/// Default settings record for a kind, as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if the defaults cannot be serialized.
pub fn defaults(kind: WidgetKind) -> Result<Value, WidgetError> {
    (entry(kind).defaults)()
}

/// Build the declarative view for a kind.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] when the settings do not decode.
pub fn build(kind: WidgetKind, settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    (entry(kind).build)(settings, mode)
}

/// Compile settings into embed code. Deterministic for equal settings.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] when the settings do not decode.
pub fn compile(kind: WidgetKind, settings: &Value) -> Result<RenderedSnippet, WidgetError> {
    let view = build(kind, settings, RenderMode::Snippet)?;
    Ok(render::render_snippet(&view))
}

/// Render a static preview document with time-dependent state at `now`.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] when the settings do not decode.
pub fn preview(kind: WidgetKind, settings: &Value, now: OffsetDateTime) -> Result<String, WidgetError> {
    let view = build(kind, settings, RenderMode::Preview { now })?;
    Ok(render::render_preview(&view))
}

fn item_hooks(kind: WidgetKind) -> Result<&'static ItemHooks, WidgetError> {
    entry(kind).items.as_ref().ok_or(WidgetError::NoItemList(kind))
}

/// Append a default item to the kind's item list and return the new
/// settings. `variant` picks the item type for kinds with several.
///
/// # Errors
///
/// Returns [`WidgetError::NoItemList`] for kinds without a list and
/// [`WidgetError::InvalidSettings`] for malformed settings or variants.
pub fn add_item(kind: WidgetKind, settings: &Value, variant: Option<&str>) -> Result<Value, WidgetError> {
    (item_hooks(kind)?.add)(settings, variant)
}

/// Remove one item from the kind's item list and return the new settings.
///
/// # Errors
///
/// Returns [`WidgetError::NoItemList`] for kinds without a list, and
/// [`WidgetError::LastItem`] when the removal would empty the list.
pub fn remove_item(kind: WidgetKind, settings: &Value, index: usize) -> Result<Value, WidgetError> {
    (item_hooks(kind)?.remove)(settings, index)
}

/// Move one item to a new position and return the new settings.
///
/// # Errors
///
/// Returns [`WidgetError::NoItemList`] for kinds without a list and
/// [`WidgetError::IndexOutOfRange`] for invalid positions.
pub fn move_item(kind: WidgetKind, settings: &Value, from: usize, to: usize) -> Result<Value, WidgetError> {
    (item_hooks(kind)?.move_to)(settings, from, to)
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
