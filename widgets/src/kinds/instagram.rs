//! Instagram feed mockup: a profile header and a grid of posts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{defaults_of, scoped};
use crate::escape::safe_url;
use crate::style::{self, FONT_STACK, MOBILE_BREAKPOINT};
use crate::view::{Element, RenderMode, Rule, Stylesheet, WidgetView, decls, decode_settings, instance_id};
use crate::{WidgetError, WidgetKind};

const PROFILE_URL: &str = "https://www.instagram.com/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: String,
    pub image_url: String,
    pub caption: String,
    pub likes: u64,
    pub comments: u64,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstagramSettings {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub posts: Vec<Post>,
    pub post_count: usize,
    pub columns: u32,
    pub gap: f64,
    pub show_header: bool,
    pub show_follow_button: bool,
    pub show_overlay: bool,
    pub rounded_corners: bool,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for InstagramSettings {
    fn default() -> Self {
        Self {
            username: "yourbrand".into(),
            display_name: "Your Brand".into(),
            avatar_url: String::new(),
            posts: mock_posts("yourbrand", 9),
            post_count: 9,
            columns: 3,
            gap: 4.0,
            show_header: true,
            show_follow_button: true,
            show_overlay: true,
            rounded_corners: false,
            accent_color: "#0095f6".into(),
            background_color: "#ffffff".into(),
            text_color: "#262626".into(),
        }
    }
}

impl InstagramSettings {
    #[must_use]
    pub fn profile_url(&self) -> String {
        format!("{PROFILE_URL}{}/", self.username.trim().trim_start_matches('@'))
    }

    #[must_use]
    pub fn visible_posts(&self) -> &[Post] {
        &self.posts[..self.posts.len().min(self.post_count)]
    }
}

/// Deterministic demo posts for `username`.
///
/// Counts are derived from a hash of the username and post index, so the
/// same profile always shows the same numbers.
#[must_use]
pub fn mock_posts(username: &str, count: usize) -> Vec<Post> {
    const CAPTIONS: [&str; 6] = [
        "New arrivals are here ✨",
        "Behind the scenes at the studio",
        "Weekend vibes",
        "Our bestseller, restocked",
        "Thank you for 10k followers!",
        "Sneak peek of what's next",
    ];
    let handle = username.trim().trim_start_matches('@');
    (0..count)
        .map(|index| {
            let digest = Sha256::digest(format!("{handle}:{index}").as_bytes());
            let likes = u64::from(u16::from_be_bytes([digest[0], digest[1]])) % 5_000 + 50;
            let comments = u64::from(digest[2]) % 120 + 1;
            let n = index + 1;
            Post {
                id: format!("{handle}-{n}"),
                image_url: format!("https://picsum.photos/seed/{handle}{n}/400/400"),
                caption: CAPTIONS[index % CAPTIONS.len()].to_string(),
                likes,
                comments,
                permalink: format!("{PROFILE_URL}{handle}/"),
            }
        })
        .collect()
}

// =============================================================================
// VIEW
// =============================================================================

#[must_use]
pub fn view(settings: &InstagramSettings, id: &str, _mode: RenderMode) -> WidgetView {
    let profile = settings.profile_url();
    let handle = settings.username.trim().trim_start_matches('@').to_string();

    let header = || {
        let avatar = if settings.avatar_url.trim().is_empty() {
            Element::new("span")
                .class("wh-ig-avatar")
                .attr("aria-hidden", "true")
                .text(handle.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default())
        } else {
            Element::new("img").class("wh-ig-avatar").attr("src", safe_url(&settings.avatar_url)).attr("alt", "")
        };
        Element::new("div")
            .class("wh-ig-header")
            .child(avatar)
            .child(
                Element::new("div")
                    .class("wh-ig-names")
                    .child(Element::new("div").class("wh-ig-display-name").text(settings.display_name.clone()))
                    .child(Element::new("div").class("wh-ig-username").text(format!("@{handle}"))),
            )
            .child_if(settings.show_follow_button, || {
                Element::new("a")
                    .class("wh-ig-follow")
                    .attr("href", safe_url(&profile))
                    .attr("target", "_blank")
                    .attr("rel", "noopener")
                    .text("Follow")
            })
    };

    let posts = settings.visible_posts().iter().map(|post| {
        let link = if post.permalink.is_empty() { profile.as_str() } else { post.permalink.as_str() };
        Element::new("a")
            .class("wh-ig-post")
            .attr("href", safe_url(link))
            .attr("target", "_blank")
            .attr("rel", "noopener")
            .child(Element::new("img").attr("src", safe_url(&post.image_url)).attr("alt", post.caption.clone()).attr("loading", "lazy"))
            .child_if(settings.show_overlay, || {
                Element::new("span")
                    .class("wh-ig-overlay")
                    .child(Element::new("span").text(format!("♥ {}", style::compact_count(post.likes))))
                    .child(Element::new("span").text(format!("💬 {}", style::compact_count(post.comments))))
            })
    });

    let root = Element::new("div")
        .id(id)
        .class("wh-ig")
        .child_if(settings.show_header, header)
        .child(Element::new("div").class("wh-ig-grid").children(posts));

    WidgetView { kind: WidgetKind::InstagramFeed, instance_id: id.to_string(), root, styles: stylesheet(settings, id), script: None }
}

fn stylesheet(s: &InstagramSettings, id: &str) -> Stylesheet {
    let columns = format!("repeat({}, minmax(0, 1fr))", s.columns.max(1));
    let radius = if s.rounded_corners { "8px" } else { "0" };

    let mut sheet = Stylesheet::new();
    sheet.rule(
        scoped(id, ""),
        decls([("background", &s.background_color), ("color", &s.text_color), ("font-family", FONT_STACK), ("padding", "16px")]),
    );
    sheet.rule(scoped(id, ".wh-ig-header"), decls([("display", "flex"), ("align-items", "center"), ("gap", "12px"), ("margin-bottom", "16px")]));
    sheet.rule(
        scoped(id, ".wh-ig-avatar"),
        decls([
            ("display", "inline-flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("width", "56px"),
            ("height", "56px"),
            ("border-radius", "50%"),
            ("object-fit", "cover"),
            ("background", "linear-gradient(45deg, #f09433, #dc2743, #bc1888)"),
            ("color", "#ffffff"),
            ("font-size", "22px"),
            ("font-weight", "700"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-ig-names"), decls([("flex", "1")]));
    sheet.rule(scoped(id, ".wh-ig-display-name"), decls([("font-weight", "600")]));
    sheet.rule(scoped(id, ".wh-ig-username"), decls([("font-size", "14px"), ("opacity", "0.6")]));
    sheet.rule(
        scoped(id, ".wh-ig-follow"),
        decls([
            ("padding", "6px 16px"),
            ("border-radius", "8px"),
            ("background", &s.accent_color),
            ("color", "#ffffff"),
            ("font-weight", "600"),
            ("text-decoration", "none"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-ig-grid"), decls([("display", "grid"), ("grid-template-columns", &columns), ("gap", &style::px(s.gap))]));
    sheet.rule(
        scoped(id, ".wh-ig-post"),
        decls([("position", "relative"), ("display", "block"), ("aspect-ratio", "1 / 1"), ("overflow", "hidden"), ("border-radius", radius)]),
    );
    sheet.rule(
        scoped(id, ".wh-ig-post img"),
        decls([("width", "100%"), ("height", "100%"), ("object-fit", "cover"), ("display", "block")]),
    );
    sheet.rule(
        scoped(id, ".wh-ig-overlay"),
        decls([
            ("position", "absolute"),
            ("inset", "0"),
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("gap", "16px"),
            ("background", "rgba(0, 0, 0, 0.4)"),
            ("color", "#ffffff"),
            ("font-weight", "600"),
            ("opacity", "0"),
            ("transition", "opacity 0.2s ease"),
        ]),
    );
    sheet.rule(scoped(id, ".wh-ig-post:hover .wh-ig-overlay"), decls([("opacity", "1")]));
    sheet.media(
        MOBILE_BREAKPOINT,
        vec![Rule {
            selector: scoped(id, ".wh-ig-grid"),
            decls: decls([("grid-template-columns", &format!("repeat({}, minmax(0, 1fr))", s.columns.clamp(1, 2)))]),
        }],
    );
    sheet
}

/// Default settings as JSON.
///
/// # Errors
///
/// Returns [`WidgetError::Encode`] if serialization fails.
pub fn defaults() -> Result<Value, WidgetError> {
    defaults_of::<InstagramSettings>()
}

/// Decode settings and build the view.
///
/// # Errors
///
/// Returns [`WidgetError::InvalidSettings`] for malformed settings.
pub fn build(settings: &Value, mode: RenderMode) -> Result<WidgetView, WidgetError> {
    let decoded: InstagramSettings = decode_settings(settings)?;
    let id = instance_id(WidgetKind::InstagramFeed, &decoded)?;
    Ok(view(&decoded, &id, mode))
}

#[cfg(test)]
#[path = "instagram_test.rs"]
mod tests;
