//! Snippet and preview renderers over a [`WidgetView`].
//!
//! Both renderers share the element and stylesheet writers below; the
//! snippet adds the script program, the preview wraps everything in a
//! standalone document.

use std::fmt::Write as _;

use serde::Serialize;

use crate::WidgetKind;
use crate::escape;
use crate::registry;
use crate::view::{Element, Node, Rule, Stylesheet, WidgetView};

/// Compiled embed code for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSnippet {
    pub kind: WidgetKind,
    pub instance_id: String,
    pub html: String,
    pub css: String,
    pub js: String,
}

impl RenderedSnippet {
    /// Combine markup, style and script into one paste-ready block.
    #[must_use]
    pub fn embed(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "<!-- WidgetHub: {} -->", registry::entry(self.kind).label);
        out.push_str(&self.html);
        if !self.css.is_empty() {
            out.push_str("<style>\n");
            out.push_str(&self.css);
            out.push_str("</style>\n");
        }
        if !self.js.is_empty() {
            out.push_str("<script>\n");
            out.push_str(&self.js);
            out.push_str("</script>\n");
        }
        out
    }
}

/// Render the exported snippet for a view.
#[must_use]
pub fn render_snippet(view: &WidgetView) -> RenderedSnippet {
    RenderedSnippet {
        kind: view.kind,
        instance_id: view.instance_id.clone(),
        html: render_html(&view.root),
        css: render_css(&view.styles),
        js: render_script(view),
    }
}

/// Render a static preview document for a view. No script is included.
#[must_use]
pub fn render_preview(view: &WidgetView) -> String {
    let label = registry::entry(view.kind).label;
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(out, "<title>{} preview</title>", escape::html_text(label));
    out.push_str("<style>\nbody {\n  margin: 0;\n  padding: 24px;\n  min-height: 100vh;\n  box-sizing: border-box;\n  background: #f3f4f6;\n}\n</style>\n");
    out.push_str("<style>\n");
    out.push_str(&render_css(&view.styles));
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str(&render_html(&view.root));
    out.push_str("</body>\n</html>\n");
    out
}

// =============================================================================
// HTML
// =============================================================================

#[must_use]
pub fn render_html(root: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    indent(out, depth);
    out.push('<');
    out.push_str(el.tag);
    for (key, value) in &el.attrs {
        let _ = write!(out, " {key}=\"{}\"", escape::html_attr(value));
    }
    out.push('>');

    if el.is_void() {
        out.push('\n');
        return;
    }

    let inline = el.children.iter().all(|child| matches!(child, Node::Text(_)));
    if inline {
        for child in &el.children {
            if let Node::Text(text) = child {
                out.push_str(&escape::html_text(text));
            }
        }
    } else {
        out.push('\n');
        for child in &el.children {
            match child {
                Node::Element(child_el) => write_element(out, child_el, depth + 1),
                Node::Text(text) => {
                    indent(out, depth + 1);
                    out.push_str(&escape::html_text(text));
                    out.push('\n');
                }
            }
        }
        indent(out, depth);
    }
    let _ = writeln!(out, "</{}>", el.tag);
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

// =============================================================================
// CSS
// =============================================================================

#[must_use]
pub fn render_css(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    for rule in &sheet.rules {
        write_rule(&mut out, rule, 0);
    }
    for frames in &sheet.keyframes {
        let _ = writeln!(out, "@keyframes {} {{", frames.name);
        for (step, decls) in &frames.steps {
            let _ = writeln!(out, "  {step} {{");
            for (prop, value) in decls {
                let _ = writeln!(out, "    {prop}: {};", escape::css_value(value));
            }
            out.push_str("  }\n");
        }
        out.push_str("}\n");
    }
    for block in &sheet.media {
        let _ = writeln!(out, "@media {} {{", block.query);
        for rule in &block.rules {
            write_rule(&mut out, rule, 1);
        }
        out.push_str("}\n");
    }
    out
}

fn write_rule(out: &mut String, rule: &Rule, depth: usize) {
    if rule.decls.is_empty() {
        return;
    }
    indent(out, depth);
    let _ = writeln!(out, "{} {{", rule.selector);
    for (prop, value) in &rule.decls {
        indent(out, depth + 1);
        let _ = writeln!(out, "{prop}: {};", escape::css_value(value));
    }
    indent(out, depth);
    out.push_str("}\n");
}

// =============================================================================
// SCRIPT
// =============================================================================

fn render_script(view: &WidgetView) -> String {
    let Some(script) = &view.script else {
        return String::new();
    };
    let mut out = String::new();
    out.push_str("(function () {\n");
    let _ = writeln!(out, "  var cfg = {};", escape::script_json(&script.config));
    out.push_str("  var root = document.getElementById(cfg.id);\n");
    out.push_str("  if (!root) return;\n");
    for line in script.body.trim_matches('\n').lines() {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "  {line}");
        }
    }
    out.push_str("})();\n");
    out
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
