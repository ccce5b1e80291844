//! Block-based popup builder.
//!
//! Content is an ordered list of typed blocks rendered top to bottom inside
//! the same dialog shell and trigger behavior as the plain popup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::popup::{self, DialogLook, FormMethod, FormTarget, PopupBehavior};
use super::{defaults_of, edit, move_within, remove_from, scoped};
use crate::escape::safe_url;
use crate::list;
use crate::style;
use crate::view::{Element, RenderMode, Stylesheet, WidgetView, decls, decode_settings, instance_id};
use crate::{WidgetError, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingBlock {
    pub text: String,
    pub level: u8,
    pub align: Align,
}

impl Default for HeadingBlock {
    fn default() -> Self {
        Self { text: "Heading".into(), level: 2, align: Align::Center }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    pub text: String,
    pub align: Align,
}

impl Default for TextBlock {
    fn default() -> Self {
        Self { text: "Add your text here.".into(), align: Align::Center }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    pub url: String,
    pub alt: String,
    pub width_percent: f64,
}

impl Default for ImageBlock {
    fn default() -> Self {
        Self { url: "https://placehold.co/400x200?text=Image".into(), alt: String::new(), width_percent: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonBlock {
    pub text: String,
    pub url: String,
    pub open_in_new_tab: bool,
}

impl Default for ButtonBlock {
    fn default() -> Self {
        Self { text: "Shop now".into(), url: "#".into(), open_in_new_tab: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerBlock {
    pub height: f64,
}

impl Default for SpacerBlock {
    fn default() -> Self {
        Self { height: 16.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailFormBlock {
    /// Form `action`; empty keeps the submission on the page.
    pub action_url: String,
    pub method: FormMethod,
    pub placeholder: String,
    pub button_text: String,
    pub success_message: String,
}

impl Default for EmailFormBlock {
    fn default() -> Self {
        Self {
            action_url: String::new(),
            method: FormMethod::Post,
            placeholder: "Enter your email".into(),
            button_text: "Subscribe".into(),
            success_message: "Thanks for subscribing!".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Heading(HeadingBlock),
    Text(TextBlock),
    Image(ImageBlock),
    Button(ButtonBlock),
    Divider,
    Spacer(SpacerBlock),
    EmailForm(EmailFormBlock),
}

impl BlockKind {
    /// Fresh block of the given type tag with default content.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "heading" => Self::Heading(HeadingBlock::default()),
            "text" => Self::Text(TextBlock::default()),
            "image" => Self::Image(ImageBlock::default()),
            "button" => Self::Button(ButtonBlock::default()),
            "divider" => Self::Divider,
            "spacer" => Self::Spacer(SpacerBlock::default()),
            "email_form" => Self::EmailForm(EmailFormBlock::default()),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    #[serde(flatten)]
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupBuilderSettings {
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub behavior: PopupBehavior,
    pub max_width: f64,
    pub background_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub accent_text_color: String,
    pub border_radius: f64,
}

impl Default for PopupBuilderSettings {
    fn default() -> Self {
        let blocks = vec![
            BlockKind::Heading(HeadingBlock { text: "Welcome!".into(), ..HeadingBlock::default() }),
            BlockKind::Text(TextBlock {
                text: "Sign up today and get free shipping on your first order.".into(),
                ..TextBlock::default()
            }),
            BlockKind::EmailForm(EmailFormBlock::default()),
        ]
        .into_iter()
        .zip(1..)
        .map(|(kind, id)| Block { id, kind })
        .collect();
        Self {
            blocks,
            behavior: PopupBehavior { storage_key: "wh-popup-builder-dismissed".into(), ..PopupBehavior::default() },
            max_width: 480.0,
            background_color: "#ffffff".into(),
            text_color: "#111827".into(),
            accent_color: "#4f46e5".into(),
            accent_text_color: "#ffffff".into(),
            border_radius: 12.0,
        }
    }
}

impl PopupBuilderSettings {
    pub fn add_block(&mut self, kind: BlockKind) -> &mut Block {
        let id = list::next_id(&self.blocks, |block| block.id);
        self.blocks.push(Block { id, kind });
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }
}

// =============================================================================
// VIEW
// =============================================================================

fn heading_tag(level: u8) -> &'static str {
    match level {
        0 | 1 => "h1",
        2 => "h2",
        _ => "h3",
    }
}

fn render_block(block: &Block, title_id: Option<&str>) -> Vec<Element> {
    match &block.kind {
        BlockKind::Heading(h) => {
            let mut el = Element::new(heading_tag(h.level))
                .class(format!("wh-block-heading wh-align-{}", h.align.as_str()))
                .text(h.text.clone());
            if let Some(title_id) = title_id {
                el = el.id(title_id);
            }
            vec![el]
        }
        BlockKind::Text(t) => {
            vec![Element::new("p").class(format!("wh-block-text wh-align-{}", t.align.as_str())).text(t.text.clone())]
        }
        BlockKind::Image(img) => vec![
            Element::new("img")
                .class("wh-block-image")
                .attr("src", safe_url(&img.url))
                .attr("alt", img.alt.clone())
                .attr("style", format!("width: {}%", style::number(img.width_percent.clamp(0.0, 100.0)))),
        ],
        BlockKind::Button(b) => vec![
            Element::new("a")
                .class("wh-popup-button wh-block-button")
                .attr("href", safe_url(&b.url))
                .attr_if(b.open_in_new_tab, "target", "_blank")
                .attr_if(b.open_in_new_tab, "rel", "noopener")
                .text(b.text.clone()),
        ],
        BlockKind::Divider => vec![Element::new("hr").class("wh-block-divider")],
        BlockKind::Spacer(s) => vec![
            Element::new("div")
                .class("wh-block-spacer")
                .attr("aria-hidden", "true")
                .attr("style", format!("height: {}", style::px(s.height.max(0.0)))),
        ],
        BlockKind::EmailForm(f) => {
            let target = FormTarget { action_url: &f.action_url, method: f.method };
            popup::email_form(&f.placeholder, &f.button_text, &f.success_message, &target).into()
        }
    }
}

#[must_use]
pub fn view(settings: &PopupBuilderSettings, id: &str, mode: RenderMode) -> WidgetView {
    let title_id = format!("{id}-title");
    let first_heading = settings.blocks.iter().position(|block| matches!(block.kind, BlockKind::Heading(_)));
    let content = Element::new("div").class("wh-popup-content").children(
        settings
            .blocks
            .iter()
            .enumerate()
            .flat_map(|(index, block)| render_block(block, (Some(index) == first_heading).then_some(title_id.as_str()))),
    );

    let look = DialogLook {
        max_width: settings.max_width,
        background_color: &settings.background_color,
        text_color: &settings.text_color,
        border_radius: settings.border_radius,
    };
    let mut styles = Stylesheet::new();
    popup::shell_styles(&mut styles, id, &settings.behavior, &look);
    popup::form_styles(&mut styles, id, &settings.accent_color, &settings.accent_text_color);
    block_styles(&mut styles, id);

    WidgetView {
        kind: WidgetKind::PopupBuilder,
        instance_id: id.to_string(),
        root: popup::shell(id, &settings.behavior, mode, content),
        styles,
        script: Some(popup::shell_script(id, &settings.behavior)),
    }
}

fn block_styles(sheet: &mut Stylesheet, id: &str) {
    sheet.rule(scoped(id, ".wh-popup-content > * + *"), decls([("margin-top", "12px")]));
    sheet.rule(scoped(id, ".wh-block-heading"), decls([("margin-bottom", "0"), ("line-height", "1.2")]));
    sheet.rule(scoped(id, ".wh-block-text"), decls([("margin-bottom", "0"), ("line-height", "1.5")]));
    for align in [Align::Left, Align::Center, Align::Right] {
        sheet.rule(scoped(id, &format!(".wh-align-{}", align.as_str())), decls([("text-align", align.as_str())]));
    }
    sheet.rule(
        scoped(id, ".wh-block-image"),
        decls([("display", "block"), ("max-width", "100%"), ("height", "auto"), ("margin-left", "auto"), ("margin-right", "auto")]),
    );
    sheet.rule(scoped(id, ".wh-block-divider"), decls([("border", "0"), ("border-top", "1px solid #e5e7eb")]));
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<PopupBuilderSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: PopupBuilderSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::PopupBuilder, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

/// Remove one block, keeping at least one.
///
/// # Errors
///
/// Returns [`WidgetError::LastItem`] when only one block is left.
pub fn remove_item(settings: &Value, index: usize) -> Result<Value, WidgetError> {
    remove_from(settings, index, "block", blocks_of)
}

/// Append a block of type `variant` (`text` when omitted) with default content.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings or an
/// unknown block type.
pub fn add_item(settings: &Value, variant: Option<&str>) -> Result<Value, WidgetError> {
    let tag = variant.unwrap_or("text");
    let kind = BlockKind::from_tag(tag).ok_or_else(|| WidgetError::InvalidSettings(format!("unknown block type: {tag}")))?;
    edit(settings, |decoded: &mut PopupBuilderSettings| {
        decoded.add_block(kind);
        Ok(())
    })
}

/// Move one block from `from` to `to`.
///
/// # Errors
///
/// Returns [`WidgetError::IndexOutOfRange`] if either index is invalid.
pub fn move_item(settings: &Value, from: usize, to: usize) -> Result<Value, WidgetError> {
    move_within(settings, from, to, blocks_of)
}

fn blocks_of(settings: &mut PopupBuilderSettings) -> &mut Vec<Block> {
    &mut settings.blocks
}

#[cfg(test)]
#[path = "popup_builder_test.rs"]
mod tests;
