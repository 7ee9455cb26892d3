use crate::config::FeedConfig;
use crate::internal::models::Article;
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use strum_macros::Display;
use thiserror::Error;

/// The fixed set of categories shown in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Category {
    #[default]
    World,
    #[strum(serialize = "U.S.")]
    Us,
    Politics,
    Business,
    Tech,
    Culture,
    Sports,
    Opinion,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::World,
        Self::Us,
        Self::Politics,
        Self::Business,
        Self::Tech,
        Self::Culture,
        Self::Sports,
        Self::Opinion,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Category for a zero-based navigation slot.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Everything that can go wrong while fetching the feed.
///
/// The UI shows the same message for every variant; the variant only
/// enriches the log line.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("HTTP error: status {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the article feed endpoint.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    endpoint: String,
    category_param: Option<String>,
}

impl ApiService {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            category_param: config.category_param.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the selected category is forwarded to the endpoint.
    pub fn filters_by_category(&self) -> bool {
        self.category_param.is_some()
    }

    /// Fetch the article feed.
    ///
    /// The category is only sent when a `category_param` is configured;
    /// otherwise every category receives the same unfiltered feed.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_articles(&self, category: Category) -> Result<Vec<Article>, FetchError> {
        let start = Instant::now();

        let mut request = self.client.get(&self.endpoint);
        if let Some(param) = &self.category_param {
            request = request.query(&[(param.as_str(), category.to_string())]);
        }

        let resp = request.send().await.map_err(FetchError::Network)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = resp.bytes().await.map_err(FetchError::Network)?;
        let articles = parse_articles(&body)?;

        tracing::debug!(
            elapsed = ?start.elapsed(),
            count = articles.len(),
            "fetched articles"
        );
        Ok(articles)
    }
}

/// Decode a feed body.
///
/// An empty body or `null` means no articles. Valid JSON that is not an array
/// also yields no articles; only bytes that are not JSON at all are an error.
pub fn parse_articles(body: &[u8]) -> Result<Vec<Article>, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let value: serde_json::Value = serde_json::from_slice(body)?;
    match value {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(Article::from_value).collect()),
        serde_json::Value::Null => Ok(Vec::new()),
        other => {
            tracing::warn!(kind = json_kind(&other), "feed body is not an array");
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
