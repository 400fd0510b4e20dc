use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Envelope of the v2 recent-search endpoint. `data` is omitted entirely
/// when nothing matched, so it stays optional.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub data: Option<Vec<TweetResult>>,
    pub meta: Option<SearchMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TweetResult {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub public_metrics: PublicMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicMetrics {
    pub like_count: u64,
    pub retweet_count: u64,
    pub reply_count: Option<u64>,
    pub quote_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMeta {
    pub result_count: u64,
    pub newest_id: Option<String>,
    pub oldest_id: Option<String>,
    pub next_token: Option<String>,
}
