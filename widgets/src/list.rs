//! Editing helpers for the ordered item lists owned by widget settings.
//!
//! FAQ items, reviews, pricing tiers and popup blocks must never become
//! empty; [`remove_item`] rejects removal of the last element with a
//! message meant to be shown to the user as-is.

use crate::WidgetError;

/// Remove and return the item at `index`.
///
/// # Errors
///
/// Returns [`WidgetError::LastItem`] when only one item remains and
/// [`WidgetError::IndexOutOfRange`] for an invalid index.
pub fn remove_item<T>(items: &mut Vec<T>, index: usize, noun: &'static str) -> Result<T, WidgetError> {
    if index >= items.len() {
        return Err(WidgetError::IndexOutOfRange { index, len: items.len() });
    }
    if items.len() <= 1 {
        return Err(WidgetError::LastItem { noun });
    }
    Ok(items.remove(index))
}

/// Move the item at `from` so it ends up at position `to`.
///
/// # Errors
///
/// Returns [`WidgetError::IndexOutOfRange`] if either index is invalid.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), WidgetError> {
    let len = items.len();
    if from >= len {
        return Err(WidgetError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(WidgetError::IndexOutOfRange { index: to, len });
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// Next free numeric id for a list keyed by `id`.
pub fn next_id<T>(items: &[T], id: impl Fn(&T) -> u32) -> u32 {
    items.iter().map(id).max().map_or(1, |max| max.saturating_add(1))
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
