use crate::ai::{ChatRequest, LlmError, LlmProvider};
use crate::classify::parser::parse_category;
use crate::classify::prompt::{classification_prompt, SYSTEM_PROMPT};
use crate::dataset::{read_csv, write_csv, Category, LabeledRecord, RawRecord};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct ClassifyConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl ClassifyConfig {
    pub fn from_env() -> Self {
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Self {
            model,
            temperature: 0.3,
            max_tokens: 10,
            timeout_secs: 20,
        }
    }
}

/// `input.csv` -> `input_labeled.csv`
pub fn labeled_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_labeled.csv"))
}

pub struct ClassifierService<P: LlmProvider> {
    provider: P,
    cfg: ClassifyConfig,
}

impl<P: LlmProvider> ClassifierService<P> {
    pub fn new(provider: P, cfg: ClassifyConfig) -> Self {
        Self { provider, cfg }
    }

    /// Label every row of a raw dataset file and write the result next to
    /// it. Rows are independent: a failed service call marks that row with
    /// the sentinel and the batch keeps going.
    pub async fn classify_file(&self, input: &Path) -> anyhow::Result<PathBuf> {
        let rows: Vec<RawRecord> = read_csv(input)?;
        info!("classifying {} rows from {}", rows.len(), input.display());

        let labeled = self.classify_records(rows).await;
        let failed = labeled
            .iter()
            .filter(|r| r.category == Category::Failed)
            .count();
        if failed > 0 {
            warn!("{failed} rows could not be classified");
        }

        let output = labeled_path(input);
        write_csv(&output, &labeled)?;
        info!("labeled dataset -> {}", output.display());
        Ok(output)
    }

    pub async fn classify_records(&self, rows: Vec<RawRecord>) -> Vec<LabeledRecord> {
        let mut labeled = Vec::with_capacity(rows.len());
        for row in rows {
            let category = match self.classify_text(&row.text).await {
                Ok(category) => category,
                Err(e) => {
                    warn!("classification failed for row: {e}");
                    Category::Failed
                }
            };
            labeled.push(LabeledRecord::from_raw(row, category));
        }
        labeled
    }

    async fn classify_text(&self, text: &str) -> Result<Category, LlmError> {
        let req = ChatRequest {
            model: self.cfg.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user: classification_prompt(text),
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
            timeout_secs: self.cfg.timeout_secs,
        };
        let resp = self.provider.chat(req).await?;
        parse_category(&resp.text)
            .ok_or_else(|| LlmError::InvalidResponse(format!("unrecognized label: {}", resp.text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatResponse;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Deterministic stand-in: picks a label from the tweet text itself.
    struct StubLlm {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
            if let Some(marker) = self.fail_on {
                if req.user.contains(marker) {
                    return Err(LlmError::Http("connection reset".to_string()));
                }
            }
            let text = if req.user.contains("プロテイン") {
                "食事・栄養系"
            } else {
                "記録系"
            };
            Ok(ChatResponse {
                text: text.to_string(),
                raw: None,
            })
        }
    }

    fn raw(text: &str, hour: u32) -> RawRecord {
        RawRecord {
            text: text.to_string(),
            likes: 1,
            retweets: 0,
            created_at: NaiveDate::from_ymd_opt(2025, 7, 25)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn deterministic_provider_gives_identical_columns() {
        let rows = vec![raw("スクワット30回", 8), raw("プロテイン補給", 23)];
        let service = ClassifierService::new(StubLlm { fail_on: None }, ClassifyConfig::from_env());

        let first = service.classify_records(rows.clone()).await;
        let second = service.classify_records(rows).await;

        let cols: Vec<_> = first.iter().map(|r| r.category).collect();
        assert_eq!(cols, vec![Category::TrainingLog, Category::Nutrition]);
        assert_eq!(
            cols,
            second.iter().map(|r| r.category).collect::<Vec<_>>()
        );
        assert_eq!(first[0].time_zone, crate::dataset::TimeBucket::Morning);
        assert_eq!(first[1].time_zone, crate::dataset::TimeBucket::LateNight);
    }

    #[tokio::test]
    async fn row_failure_gets_sentinel_without_stopping_batch() {
        let rows = vec![raw("壊れる行", 9), raw("スクワット30回", 10)];
        let service = ClassifierService::new(
            StubLlm {
                fail_on: Some("壊れる行"),
            },
            ClassifyConfig::from_env(),
        );

        let labeled = service.classify_records(rows).await;
        assert_eq!(labeled[0].category, Category::Failed);
        assert_eq!(labeled[1].category, Category::TrainingLog);
    }

    #[tokio::test]
    async fn classify_file_writes_labeled_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tweets_20250725-0735.csv");
        write_csv(&input, &[raw("スクワット30回", 10)]).unwrap();

        let service = ClassifierService::new(StubLlm { fail_on: None }, ClassifyConfig::from_env());
        let output = service.classify_file(&input).await.unwrap();

        assert_eq!(
            output.file_name().unwrap().to_string_lossy(),
            "tweets_20250725-0735_labeled.csv"
        );
        let back: Vec<LabeledRecord> = read_csv(&output).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].category, Category::TrainingLog);
    }
}
