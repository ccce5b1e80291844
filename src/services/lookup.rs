//! Shared error and provenance types for third-party lookups.
//!
//! ERROR HANDLING
//! ==============
//! Lookups never fail from the caller's point of view. Every
//! [`LookupError`] is turned into demo data plus a short note, and the
//! response says which one it got via [`DataSource`].

use serde::Serialize;

/// Where lookup data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Mock,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Required credentials are not configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Nothing to search for.
    #[error("lookup query is empty")]
    EmptyQuery,

    /// The provider found no match.
    #[error("no match for {0:?}")]
    NoMatch(String),

    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status.
    #[error("provider returned status {0}")]
    Status(u16),

    /// The provider answered 200 with an error status in the body.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LookupError {
    /// Configuration problems are the caller's to fix; they are not logged as failures.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NotConfigured(_) | Self::EmptyQuery)
    }
}

impl crate::error::ErrorCode for LookupError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "E_NOT_CONFIGURED",
            Self::EmptyQuery => "E_EMPTY_QUERY",
            Self::NoMatch(_) => "E_NO_MATCH",
            Self::Request(_) => "E_REQUEST",
            Self::Status(_) => "E_UPSTREAM_STATUS",
            Self::Provider(_) => "E_UPSTREAM",
            Self::Parse(_) => "E_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status(500..=599))
    }
}

pub(crate) async fn get_json(request: reqwest::RequestBuilder) -> Result<String, LookupError> {
    let response = request.send().await.map_err(|e| LookupError::Request(e.to_string()))?;
    let status = response.status().as_u16();
    let text = response.text().await.map_err(|e| LookupError::Request(e.to_string()))?;
    if status != 200 {
        return Err(LookupError::Status(status));
    }
    Ok(text)
}

#[cfg(test)]
#[path = "lookup_test.rs"]
mod tests;
