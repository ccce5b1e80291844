//! Declarative widget description shared by the snippet and preview renderers.
//!
//! Builders assemble an [`Element`] tree, a [`Stylesheet`] of rules scoped to
//! the widget's instance id, and an optional [`Script`] program. Values are
//! stored raw; escaping happens once, in `render`.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::{WidgetError, WidgetKind};

// =============================================================================
// RENDER MODE
// =============================================================================

/// Which renderer a view is being built for.
///
/// Snippet views never depend on the clock, so compiling is deterministic.
/// Preview views evaluate time-dependent state at `now` and render
/// interactive widgets in their opened state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Snippet,
    Preview { now: OffsetDateTime },
}

impl RenderMode {
    #[must_use]
    pub fn is_preview(self) -> bool {
        matches!(self, Self::Preview { .. })
    }

    #[must_use]
    pub fn now(self) -> Option<OffsetDateTime> {
        match self {
            Self::Snippet => None,
            Self::Preview { now } => Some(now),
        }
    }
}

// =============================================================================
// ELEMENT TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

const VOID_TAGS: [&str; 4] = ["img", "input", "br", "hr"];

impl Element {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self { tag, attrs: Vec::new(), children: Vec::new() }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag)
    }

    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    #[must_use]
    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    /// Add an attribute only when `cond` holds.
    #[must_use]
    pub fn attr_if(self, cond: bool, key: &'static str, value: impl Into<String>) -> Self {
        if cond { self.attr(key, value) } else { self }
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn child_if(self, cond: bool, child: impl FnOnce() -> Element) -> Self {
        if cond { self.child(child()) } else { self }
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    /// Return the first attribute value for `key`.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    /// Depth-first search for elements carrying `class` in their class list.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.get_attr("class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class)) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                el.collect_by_class(class, found);
            }
        }
    }

    /// Concatenated text content of this element and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) => out.push_str(&el.text_content()),
            }
        }
        out
    }
}

// =============================================================================
// STYLESHEET
// =============================================================================

pub type Decl = (&'static str, String);

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaBlock {
    pub query: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    pub name: String,
    pub steps: Vec<(String, Vec<Decl>)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    pub keyframes: Vec<Keyframes>,
    pub media: Vec<MediaBlock>,
}

impl Stylesheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(&mut self, selector: impl Into<String>, decls: Vec<Decl>) {
        self.rules.push(Rule { selector: selector.into(), decls });
    }

    pub fn keyframes(&mut self, name: impl Into<String>, steps: Vec<(String, Vec<Decl>)>) {
        self.keyframes.push(Keyframes { name: name.into(), steps });
    }

    pub fn media(&mut self, query: impl Into<String>, rules: Vec<Rule>) {
        self.media.push(MediaBlock { query: query.into(), rules });
    }

    /// Find the declarations of the first rule with an exact selector match.
    #[must_use]
    pub fn decls_for(&self, selector: &str) -> Option<&[Decl]> {
        self.rules.iter().find(|r| r.selector == selector).map(|r| r.decls.as_slice())
    }
}

/// Build a declaration list from `(property, value)` pairs.
#[must_use]
pub fn decls<const N: usize>(pairs: [(&'static str, &str); N]) -> Vec<Decl> {
    pairs.into_iter().map(|(k, v)| (k, v.to_string())).collect()
}

// =============================================================================
// SCRIPT
// =============================================================================

/// A fixed runtime body plus the settings it reads.
///
/// The body is a constant per widget kind and never interpolated; all
/// user data travels through `config`, which the renderer emits as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub config: Value,
    pub body: &'static str,
}

impl Script {
    /// Create a script whose config carries the widget's element id.
    #[must_use]
    pub fn new(instance_id: &str, config: Value, body: &'static str) -> Self {
        let mut map = match config {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                map
            }
        };
        map.insert("id".into(), Value::String(instance_id.to_string()));
        Self { config: Value::Object(map), body }
    }
}

// =============================================================================
// WIDGET VIEW
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub kind: WidgetKind,
    pub instance_id: String,
    pub root: Element,
    pub styles: Stylesheet,
    pub script: Option<Script>,
}

/// Derive a stable element id from the kind and the canonical settings JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if the settings cannot be serialized.
pub fn instance_id<S: serde::Serialize>(kind: WidgetKind, settings: &S) -> Result<String, WidgetError> {
    let canonical = serde_json::to_vec(settings).map_err(|e| WidgetError::Encode(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(&canonical);
    let digest = hasher.finalize();
    let short: String = digest.iter().take(4).map(|b| format!("{b:02x}")).collect();
    Ok(format!("wh-{}-{short}", kind.as_str().replace('_', "-")))
}

/// Decode a settings payload, filling missing fields with defaults.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] when the payload has the wrong shape.
pub fn decode_settings<S: serde::de::DeserializeOwned>(settings: &Value) -> Result<S, WidgetError> {
    let payload = if settings.is_null() { Value::Object(Map::new()) } else { settings.clone() };
    serde_json::from_value(payload).map_err(|e| WidgetError::InvalidSettings(e.to_string()))
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
