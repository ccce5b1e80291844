//! Instagram profile lookup with demo fallback.
//!
//! Calls the unauthenticated web profile endpoint. The payload shape is not
//! a stable API, so parsing is lenient and any failure yields
//! [`mock_posts`] for the requested handle.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use widgets::kinds::instagram::{Post, mock_posts};

use crate::config::{Config, HttpTimeouts};
use crate::services::lookup::{DataSource, LookupError, get_json};

const WEB_APP_ID: &str = "936619743392459";
const POST_URL: &str = "https://www.instagram.com/p/";
pub const DEFAULT_POST_COUNT: usize = 9;
pub const MAX_POST_COUNT: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileLookup {
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub profile: Profile,
}

#[async_trait::async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile(&self, username: &str) -> Result<Profile, LookupError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct InstagramClient {
    http: reqwest::Client,
    base_url: String,
}

impl InstagramClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: String, timeouts: HttpTimeouts) -> Result<Self, LookupError> {
        let http = timeouts.client().map_err(|e| LookupError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        Self::new(config.instagram_base_url.clone(), config.http)
    }
}

#[async_trait::async_trait]
impl ProfileSource for InstagramClient {
    async fn profile(&self, username: &str) -> Result<Profile, LookupError> {
        let request = self
            .http
            .get(format!("{}/users/web_profile_info/", self.base_url))
            .header("x-ig-app-id", WEB_APP_ID)
            .query(&[("username", username)]);
        parse_profile(username, &get_json(request).await?)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct WebProfile {
    data: WebProfileData,
}

#[derive(Deserialize)]
struct WebProfileData {
    user: Option<WebUser>,
}

#[derive(Deserialize)]
struct WebUser {
    #[serde(default)]
    username: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    profile_pic_url: String,
    #[serde(default)]
    edge_owner_to_timeline_media: Edges<WebMedia>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Edges<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
}

impl<T> Default for Edges<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Count {
    count: u64,
}

#[derive(Deserialize)]
struct CaptionNode {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct WebMedia {
    #[serde(default)]
    id: String,
    #[serde(default)]
    shortcode: String,
    #[serde(default)]
    display_url: String,
    #[serde(default)]
    edge_liked_by: Count,
    #[serde(default)]
    edge_media_to_comment: Count,
    #[serde(default)]
    edge_media_to_caption: Edges<CaptionNode>,
}

fn parse_profile(username: &str, json: &str) -> Result<Profile, LookupError> {
    let resp: WebProfile = serde_json::from_str(json).map_err(|e| LookupError::Parse(e.to_string()))?;
    let user = resp.data.user.ok_or_else(|| LookupError::NoMatch(username.to_string()))?;
    let posts = user
        .edge_owner_to_timeline_media
        .edges
        .into_iter()
        .map(|Edge { node }| Post {
            id: node.id,
            image_url: node.display_url,
            caption: node
                .edge_media_to_caption
                .edges
                .into_iter()
                .next()
                .map(|e| e.node.text)
                .unwrap_or_default(),
            likes: node.edge_liked_by.count,
            comments: node.edge_media_to_comment.count,
            permalink: format!("{POST_URL}{}/", node.shortcode),
        })
        .collect();
    Ok(Profile {
        username: if user.username.is_empty() { username.to_string() } else { user.username },
        display_name: user.full_name,
        avatar_url: user.profile_pic_url,
        posts,
    })
}

// =============================================================================
// LOOKUP
// =============================================================================

#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}

#[must_use]
pub fn demo_profile(username: &str, count: usize) -> Profile {
    Profile {
        username: username.to_string(),
        display_name: username.to_string(),
        avatar_url: String::new(),
        posts: mock_posts(username, count),
    }
}

/// Fetch up to `count` recent posts for `raw_username`, falling back to demo posts.
pub async fn lookup_profile(source: &dyn ProfileSource, raw_username: &str, count: usize) -> ProfileLookup {
    let username = normalize_username(raw_username);
    let count = count.clamp(1, MAX_POST_COUNT);
    let result = if username.is_empty() { Err(LookupError::EmptyQuery) } else { source.profile(&username).await };

    match result {
        Ok(mut profile) if !profile.posts.is_empty() => {
            profile.posts.truncate(count);
            info!(%username, posts = profile.posts.len(), "instagram profile loaded");
            ProfileLookup { source: DataSource::Live, note: None, profile }
        }
        Ok(_) => {
            info!(%username, "instagram profile has no public posts; using demo posts");
            ProfileLookup {
                source: DataSource::Mock,
                note: Some("This profile has no public posts. Showing demo posts.".into()),
                profile: demo_profile(&username, count),
            }
        }
        Err(e) => {
            if !e.is_configuration() {
                warn!(%username, error = %e, "instagram lookup failed; using demo posts");
            }
            let note = match e {
                LookupError::EmptyQuery => "Enter an Instagram username. Showing demo posts.",
                _ => "Instagram could not be reached. Showing demo posts.",
            };
            let handle = if username.is_empty() { "yourbrand" } else { username.as_str() };
            ProfileLookup { source: DataSource::Mock, note: Some(note.into()), profile: demo_profile(handle, count) }
        }
    }
}

#[cfg(test)]
#[path = "instagram_test.rs"]
mod tests;
