use super::dto::{SearchResponse, TweetResult};
use super::urls::{TWEET_FIELDS, URL_SEARCH_RECENT};
use async_trait::async_trait;
use log::info;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("missing env {0}")]
    MissingEnv(&'static str),
    #[error("http error: {0}")]
    Http(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Read-only recent-search contract, kept behind a trait so the collector
/// can be driven by a stub in tests.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search_recent(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<TweetResult>, SearchError>;
}

/// Twitter Session - bearer-token session against the v2 search API.
pub struct TwitterSession {
    client: reqwest::Client,
    bearer_token: String,
}

impl TwitterSession {
    pub fn new(bearer_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bearer_token,
        }
    }

    pub fn from_env() -> Result<Self, SearchError> {
        let bearer_token = std::env::var("TWITTER_BEARER_TOKEN")
            .map_err(|_| SearchError::MissingEnv("TWITTER_BEARER_TOKEN"))?;
        Ok(Self::new(bearer_token))
    }
}

#[async_trait]
impl SearchApi for TwitterSession {
    async fn search_recent(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<TweetResult>, SearchError> {
        // API bounds for this endpoint are 10..=100 per page.
        let max_results = max_results.clamp(10, 100).to_string();
        info!("{} search_recent({:?}, {})", self, query, max_results);

        let resp = self
            .client
            .get(URL_SEARCH_RECENT)
            .query(&[
                ("query", query),
                ("tweet.fields", TWEET_FIELDS),
                ("max_results", max_results.as_str()),
            ])
            .bearer_auth(&self.bearer_token)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SearchError::Unauthorized)
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(SearchError::RateLimited),
            _ => {}
        }

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| SearchError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(SearchError::Http(format!("{} {}", status.as_u16(), raw)));
        }

        let parsed: SearchResponse = serde_json::from_str(&raw)
            .map_err(|e| SearchError::InvalidResponse(format!("json parse failed: {e}, raw={raw}")))?;
        Ok(parsed.data.unwrap_or_default())
    }
}

impl std::fmt::Display for TwitterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<TwitterSession>")
    }
}

impl std::fmt::Debug for TwitterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<TwitterSession>")
    }
}
