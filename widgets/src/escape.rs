//! Context-aware escaping for generated markup.
//!
//! Every user-supplied string that ends up in a snippet passes through one of
//! these functions, chosen by where it lands: element text, attribute value,
//! inline script data, CSS declaration value, or link target.

use serde_json::Value;

/// Escape text placed between tags.
#[must_use]
pub fn html_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
#[must_use]
pub fn html_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize a value as a JSON literal safe to inline inside `<script>`.
///
/// `<`, `>` and `&` are emitted as unicode escapes so neither `</script>`
/// nor `<!--` can appear in the output, and the JS line terminators
/// U+2028/U+2029 are escaped as well.
#[must_use]
pub fn script_json(value: &Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}

/// Sanitize a CSS declaration value.
///
/// Characters that could close the declaration, the rule, or the surrounding
/// `<style>` element are dropped, as are comment openers.
#[must_use]
pub fn css_value(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !matches!(ch, ';' | '{' | '}' | '<' | '>' | '\\' | '"' | '\'' | '\n' | '\r'))
        .collect();
    cleaned.replace("/*", "").replace("*/", "").trim().to_string()
}

/// Neutralize link targets with script-capable schemes.
///
/// Relative URLs, fragments, `http(s)`, `mailto`, `tel`, and `data:image/`
/// pass through; anything else with a scheme becomes `#`.
#[must_use]
pub fn safe_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "#".to_string();
    }

    let lowered: String = trimmed
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && !ch.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let Some(colon) = lowered.find(':') else {
        return trimmed.to_string();
    };
    // A colon after a path, query, or fragment separator is not a scheme.
    if lowered[..colon].contains(['/', '?', '#']) {
        return trimmed.to_string();
    }

    let scheme = &lowered[..colon];
    match scheme {
        "http" | "https" | "mailto" | "tel" => trimmed.to_string(),
        "data" if lowered.starts_with("data:image/") => trimmed.to_string(),
        _ => "#".to_string(),
    }
}

#[cfg(test)]
#[path = "escape_test.rs"]
mod tests;
