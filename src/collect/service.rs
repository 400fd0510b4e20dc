use crate::dataset::{write_csv, RawRecord};
use crate::search::SearchApi;
use chrono::Local;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CollectConfig {
    /// Topic filter, e.g. a hashtag. Retweet/language filters are appended
    /// at request time.
    pub query: String,
    pub max_results: usize,
    pub data_dir: PathBuf,
}

impl CollectConfig {
    pub fn from_env() -> Self {
        let query = std::env::var("SEARCH_QUERY").unwrap_or_else(|_| "#筋トレ".to_string());
        let max_results = std::env::var("SEARCH_MAX_RESULTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50);
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        Self {
            query,
            max_results,
            data_dir,
        }
    }
}

pub struct CollectorService<S: SearchApi> {
    api: S,
}

impl<S: SearchApi> CollectorService<S> {
    pub fn new(api: S) -> Self {
        Self { api }
    }

    /// Query the search service and write one timestamped raw dataset file.
    /// Returns the written path, or `None` when nothing matched (which is
    /// logged, not fatal).
    pub async fn collect(&self, cfg: &CollectConfig) -> anyhow::Result<Option<PathBuf>> {
        let query = format!("{} -is:retweet lang:ja", cfg.query);
        let mut results = self.api.search_recent(&query, cfg.max_results).await?;
        // The live endpoint has a floor of 10 per page, so a smaller
        // configured bound is enforced here.
        results.truncate(cfg.max_results);

        if results.is_empty() {
            warn!("no tweets matched query {:?}", query);
            return Ok(None);
        }

        let records: Vec<RawRecord> = results
            .into_iter()
            .map(|t| RawRecord {
                text: t.text,
                likes: t.public_metrics.like_count,
                retweets: t.public_metrics.retweet_count,
                created_at: t.created_at.naive_utc(),
            })
            .collect();

        fs::create_dir_all(&cfg.data_dir)?;
        // Timestamped name so repeated runs never clobber earlier output.
        let stamp = Local::now().format("%Y%m%d-%H%M");
        let path = cfg.data_dir.join(format!("tweets_{stamp}.csv"));
        write_csv(&path, &records)?;

        info!("collected {} tweets -> {}", records.len(), path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::dto::{PublicMetrics, TweetResult};
    use crate::search::{SearchApi, SearchError};
    use async_trait::async_trait;

    struct StubSearch {
        results: Vec<TweetResult>,
    }

    #[async_trait]
    impl SearchApi for StubSearch {
        async fn search_recent(
            &self,
            _query: &str,
            max_results: usize,
        ) -> Result<Vec<TweetResult>, SearchError> {
            Ok(self.results.iter().take(max_results).cloned().collect())
        }
    }

    fn tweet(text: &str, likes: u64) -> TweetResult {
        TweetResult {
            id: "1".to_string(),
            text: text.to_string(),
            author_id: Some("42".to_string()),
            created_at: "2025-07-25T07:35:00Z".parse().unwrap(),
            public_metrics: PublicMetrics {
                like_count: likes,
                retweet_count: 1,
                reply_count: None,
                quote_count: None,
            },
        }
    }

    #[tokio::test]
    async fn writes_one_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CollectConfig {
            query: "#筋トレ".to_string(),
            max_results: 50,
            data_dir: dir.path().to_path_buf(),
        };
        let service = CollectorService::new(StubSearch {
            results: vec![tweet("朝トレ完了", 3), tweet("今日は脚の日", 7)],
        });

        let path = service.collect(&cfg).await.unwrap().expect("file written");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("tweets_") && name.ends_with(".csv"));

        let rows: Vec<RawRecord> = crate::dataset::read_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].likes, 3);
    }

    #[tokio::test]
    async fn bound_below_the_api_floor_still_caps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CollectConfig {
            query: "#筋トレ".to_string(),
            max_results: 5,
            data_dir: dir.path().to_path_buf(),
        };
        // The endpoint never returns fewer than 10 rows per page; the
        // service has to drop the surplus itself.
        let service = CollectorService::new(FloorSearch {
            results: (0..10).map(|i| tweet("継続は力なり", i)).collect(),
        });

        let path = service.collect(&cfg).await.unwrap().expect("file written");
        let rows: Vec<RawRecord> = crate::dataset::read_csv(&path).unwrap();
        assert_eq!(rows.len(), 5);
    }

    /// Returns a full page regardless of the requested bound, like the live
    /// endpoint does when asked for fewer than its per-page floor.
    struct FloorSearch {
        results: Vec<TweetResult>,
    }

    #[async_trait]
    impl SearchApi for FloorSearch {
        async fn search_recent(
            &self,
            _query: &str,
            _max_results: usize,
        ) -> Result<Vec<TweetResult>, SearchError> {
            Ok(self.results.clone())
        }
    }

    #[tokio::test]
    async fn empty_result_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CollectConfig {
            query: "#筋トレ".to_string(),
            max_results: 50,
            data_dir: dir.path().to_path_buf(),
        };
        let service = CollectorService::new(StubSearch { results: vec![] });

        let out = service.collect(&cfg).await.unwrap();
        assert!(out.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
