//! Widget configuration model and embeddable-snippet compiler.
//!
//! This crate owns everything that turns a widget settings record into
//! markup. It is shared by the `widgethub` server and the `cli` binary and
//! has no I/O of its own.
//!
//! DESIGN
//! ======
//! Each widget kind builds one declarative [`WidgetView`] (element tree,
//! scoped stylesheet, optional script program). Two renderers consume that
//! view: [`render::render_snippet`] produces the exported embed code and
//! [`render::render_preview`] produces a static preview document. Because
//! both read the same view, preview and export cannot drift apart.
//!
//! Kinds are looked up through the table in [`registry`], so callers never
//! match on widget types themselves.

pub mod dismissal;
pub mod escape;
pub mod kinds;
pub mod list;
pub mod registry;
pub mod render;
pub mod style;
pub mod view;

use serde::{Deserialize, Serialize};

pub use registry::{add_item, compile, defaults, entries, entry, move_item, preview, remove_item};
pub use render::RenderedSnippet;
pub use view::{RenderMode, WidgetView};

// =============================================================================
// WIDGET KIND
// =============================================================================

/// Every widget type the builder can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    LogoTicker,
    Countdown,
    Faq,
    AnnouncementBar,
    PricingTable,
    Reviews,
    Popup,
    PopupBuilder,
    InstagramFeed,
}

impl WidgetKind {
    pub const ALL: [Self; 9] = [
        Self::LogoTicker,
        Self::Countdown,
        Self::Faq,
        Self::AnnouncementBar,
        Self::PricingTable,
        Self::Reviews,
        Self::Popup,
        Self::PopupBuilder,
        Self::InstagramFeed,
    ];

    /// Stable wire tag, used in URLs and element ids.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogoTicker => "logo_ticker",
            Self::Countdown => "countdown",
            Self::Faq => "faq",
            Self::AnnouncementBar => "announcement_bar",
            Self::PricingTable => "pricing_table",
            Self::Reviews => "reviews",
            Self::Popup => "popup",
            Self::PopupBuilder => "popup_builder",
            Self::InstagramFeed => "instagram_feed",
        }
    }

    /// Parse a wire tag. Hyphenated spellings are accepted too.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|kind| kind.as_str() == normalized)
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while decoding settings or editing item lists.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The requested widget tag is not in the registry.
    #[error("unknown widget type: {0}")]
    UnknownKind(String),

    /// The settings payload could not be decoded into the widget's record.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Removing the item would leave the list empty.
    #[error("At least one {noun} is required.")]
    LastItem { noun: &'static str },

    /// An item index does not exist in the list.
    #[error("item index {index} out of range (list has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The widget kind has no user-editable item list.
    #[error("{0} has no editable item list")]
    NoItemList(WidgetKind),

    /// Settings could not be re-encoded as JSON.
    #[error("settings encode failed: {0}")]
    Encode(String),
}

impl WidgetError {
    /// Machine-readable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "E_UNKNOWN_WIDGET",
            Self::InvalidSettings(_) => "E_INVALID_SETTINGS",
            Self::LastItem { .. } => "E_LAST_ITEM",
            Self::IndexOutOfRange { .. } => "E_INDEX_OUT_OF_RANGE",
            Self::NoItemList(_) => "E_NO_ITEM_LIST",
            Self::Encode(_) => "E_ENCODE",
        }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
