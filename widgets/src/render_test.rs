use super::*;
use crate::view::{Script, decls};
use serde_json::json;

fn sample_view(with_script: bool) -> WidgetView {
    let root = Element::new("div")
        .id("wh-faq-00000000")
        .class("wh-faq")
        .child(Element::new("h3").text("Questions & <answers>"))
        .child(Element::new("img").attr("src", "a.png").attr("alt", "say \"hi\""));
    let mut styles = Stylesheet::new();
    styles.rule("#wh-faq-00000000", decls([("color", "#111"), ("padding", "8px")]));
    styles.rule("#wh-faq-00000000 .empty", Vec::new());
    styles.keyframes("wh-spin", vec![("0%".into(), decls([("opacity", "0")]))]);
    styles.media("(max-width: 768px)", vec![Rule {
        selector: "#wh-faq-00000000".into(),
        decls: decls([("padding", "4px")]),
    }]);
    WidgetView {
        kind: WidgetKind::Faq,
        instance_id: "wh-faq-00000000".into(),
        root,
        styles,
        script: with_script.then(|| {
            Script::new("wh-faq-00000000", json!({ "title": "</script>" }), "root.hidden = false;\n")
        }),
    }
}

#[test]
fn html_escapes_text_and_attributes() {
    let html = render_html(&sample_view(false).root);
    assert!(html.contains("<h3>Questions &amp; &lt;answers&gt;</h3>"));
    assert!(html.contains("alt=\"say &quot;hi&quot;\""));
}

#[test]
fn html_void_elements_have_no_closing_tag() {
    let html = render_html(&sample_view(false).root);
    assert!(html.contains("<img src=\"a.png\""));
    assert!(!html.contains("</img>"));
}

#[test]
fn html_nests_with_indentation() {
    let html = render_html(&sample_view(false).root);
    let expected = "<div id=\"wh-faq-00000000\" class=\"wh-faq\">\n  <h3>";
    assert!(html.starts_with(expected), "{html}");
    assert!(html.ends_with("</div>\n"));
}

#[test]
fn css_writes_rules_keyframes_and_media() {
    let css = render_css(&sample_view(false).styles);
    assert!(css.contains("#wh-faq-00000000 {\n  color: #111;\n  padding: 8px;\n}\n"));
    assert!(css.contains("@keyframes wh-spin {\n  0% {\n    opacity: 0;\n  }\n}\n"));
    assert!(css.contains("@media (max-width: 768px) {\n  #wh-faq-00000000 {\n    padding: 4px;\n  }\n}\n"));
}

#[test]
fn css_skips_empty_rules() {
    let css = render_css(&sample_view(false).styles);
    assert!(!css.contains(".empty"));
}

#[test]
fn snippet_without_script_has_empty_js() {
    let snippet = render_snippet(&sample_view(false));
    assert!(snippet.js.is_empty());
    assert!(!snippet.embed().contains("<script>"));
}

#[test]
fn snippet_script_is_self_executing_and_escaped() {
    let snippet = render_snippet(&sample_view(true));
    assert!(snippet.js.starts_with("(function () {\n"));
    assert!(snippet.js.ends_with("})();\n"));
    assert!(snippet.js.contains("var root = document.getElementById(cfg.id);"));
    assert!(snippet.js.contains("  root.hidden = false;\n"));
    assert!(!snippet.js.contains("</script>"));
}

#[test]
fn embed_combines_sections_in_order() {
    let embed = render_snippet(&sample_view(true)).embed();
    assert!(embed.starts_with("<!-- WidgetHub: FAQ Accordion -->\n<div"));
    let style_at = embed.find("<style>").unwrap();
    let script_at = embed.find("<script>").unwrap();
    let div_at = embed.find("<div").unwrap();
    assert!(div_at < style_at && style_at < script_at);
}

#[test]
fn preview_is_a_full_document_without_script() {
    let doc = render_preview(&sample_view(true));
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<title>FAQ Accordion preview</title>"));
    assert!(doc.contains("#wh-faq-00000000 {"));
    assert!(!doc.contains("<script>"));
    assert!(doc.trim_end().ends_with("</html>"));
}
