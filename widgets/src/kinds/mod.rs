//! Per-kind settings records and view builders.

/// Prefix a script body with the dismissal helpers shared by the
/// announcement bar and both popup kinds. The body reads `cfg.closeable`,
/// `cfg.remember` and `cfg.storageKey`.
macro_rules! with_dismissal {
    ($body:literal) => {
        concat!(
            r"
function isDismissed() {
  if (!cfg.closeable || !cfg.remember) return false;
  try { return window.localStorage.getItem(cfg.storageKey) === '1'; } catch (e) { return false; }
}
function rememberDismissal() {
  if (!cfg.remember) return;
  try { window.localStorage.setItem(cfg.storageKey, '1'); } catch (e) {}
}",
            $body
        )
    };
}

pub mod announcement;
pub mod countdown;
pub mod faq;
pub mod instagram;
pub mod logo_ticker;
pub mod popup;
pub mod popup_builder;
pub mod pricing;
pub mod reviews;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::WidgetError;
use crate::list;
use crate::view::decode_settings;

pub(crate) fn encode<S: Serialize>(settings: &S) -> Result<Value, WidgetError> {
    serde_json::to_value(settings).map_err(|e| WidgetError::Encode(e.to_string()))
}

pub(crate) fn defaults_of<S: Default + Serialize>() -> Result<Value, WidgetError> {
    encode(&S::default())
}

/// Decode settings, apply `edit`, and re-encode.
pub(crate) fn edit<S>(settings: &Value, apply: impl FnOnce(&mut S) -> Result<(), WidgetError>) -> Result<Value, WidgetError>
where
    S: DeserializeOwned + Serialize,
{
    let mut decoded: S = decode_settings(settings)?;
    apply(&mut decoded)?;
    encode(&decoded)
}

/// Decode, remove one list item through `list_of`, and re-encode.
pub(crate) fn remove_from<S, T>(
    settings: &Value,
    index: usize,
    noun: &'static str,
    list_of: fn(&mut S) -> &mut Vec<T>,
) -> Result<Value, WidgetError>
where
    S: DeserializeOwned + Serialize,
{
    edit(settings, |decoded: &mut S| list::remove_item(list_of(decoded), index, noun).map(drop))
}

/// Decode, reorder one list item through `list_of`, and re-encode.
pub(crate) fn move_within<S, T>(
    settings: &Value,
    from: usize,
    to: usize,
    list_of: fn(&mut S) -> &mut Vec<T>,
) -> Result<Value, WidgetError>
where
    S: DeserializeOwned + Serialize,
{
    edit(settings, |decoded: &mut S| list::move_item(list_of(decoded), from, to))
}

/// `#id` or `#id suffix` selector scoped to one widget instance.
pub(crate) fn scoped(id: &str, suffix: &str) -> String {
    if suffix.is_empty() { format!("#{id}") } else { format!("#{id} {suffix}") }
}
