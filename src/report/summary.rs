use crate::ai::{ChatRequest, LlmProvider};
use crate::report::aggregate::Aggregates;
use log::warn;

pub const SYSTEM_PROMPT: &str = "あなたはSNSマーケティングの分析アシスタントです。";

#[derive(Clone, Debug)]
pub struct SummaryConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl SummaryConfig {
    pub fn from_env() -> Self {
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        Self {
            model,
            temperature: 0.7,
            max_tokens: 800,
            timeout_secs: 60,
        }
    }
}

/// Fixed weekly-report prompt carrying the aggregate numbers, capped at an
/// 800-character output target.
pub fn summary_prompt(agg: &Aggregates, date_str: &str) -> String {
    let mut lines = Vec::new();
    lines.push(
        "あなたはTwitter分析アシスタントです。以下の条件で週次レポートの文章を日本語で生成してください。"
            .to_string(),
    );
    lines.push(String::new());
    lines.push("# 条件:".to_string());
    lines.push(format!("- 日付: {date_str}"));
    lines.push(format!("- 分析対象の投稿数: {}件", agg.total));
    lines.push("- カテゴリ別の投稿数:".to_string());
    for (category, count) in &agg.category_counts {
        lines.push(format!("  - {category}: {count}件"));
    }
    lines.push("- 時間帯別の投稿件数と平均いいね数:".to_string());
    for ((bucket, count), (_, mean)) in agg.bucket_counts.iter().zip(&agg.bucket_likes) {
        let mean = mean
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "投稿なし".to_string());
        lines.push(format!("  - {bucket}: {count}件 / 平均いいね {mean}"));
    }
    lines.push("- カテゴリ×時間帯の平均いいね数:".to_string());
    for &category in &agg.cross.categories {
        let cells: Vec<String> = agg
            .cross
            .buckets
            .iter()
            .map(|&bucket| match agg.cross.mean_likes(category, bucket) {
                Some(v) => format!("{bucket}={v:.1}"),
                None => format!("{bucket}=-"),
            })
            .collect();
        lines.push(format!("  - {category}: {}", cells.join(", ")));
    }
    lines.push(String::new());
    lines.push("# 指示:".to_string());
    lines.push("- note用の読みやすい週次レポートの本文として".to_string());
    lines.push("- 口調は丁寧でわかりやすく".to_string());
    lines.push("- 箇条書きや見出しを交えて".to_string());
    lines.push("- SNS運用者が参考にできる具体的な分析を含めてください".to_string());
    lines.push("- 800文字以内で出力してください".to_string());
    lines.join("\n")
}

/// Ask the generation service for the prose summary. Service failure keeps
/// the report alive: the returned text becomes an error note instead.
pub async fn generate_summary<P: LlmProvider>(
    provider: &P,
    cfg: &SummaryConfig,
    agg: &Aggregates,
    date_str: &str,
) -> String {
    let req = ChatRequest {
        model: cfg.model.clone(),
        system: SYSTEM_PROMPT.to_string(),
        user: summary_prompt(agg, date_str),
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
        timeout_secs: cfg.timeout_secs,
    };
    match provider.chat(req).await {
        Ok(resp) => resp.text.trim().to_string(),
        Err(e) => {
            warn!("summary generation failed: {e}");
            format!("要約の生成に失敗しました: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Category, LabeledRecord, RawRecord};
    use crate::report::aggregate::aggregate;
    use chrono::NaiveDate;

    fn agg() -> Aggregates {
        let rows: Vec<LabeledRecord> = vec![(7, 1u64), (8, 5), (9, 9)]
            .into_iter()
            .map(|(hour, likes)| {
                LabeledRecord::from_raw(
                    RawRecord {
                        text: "t".to_string(),
                        likes,
                        retweets: 0,
                        created_at: NaiveDate::from_ymd_opt(2025, 7, 25)
                            .unwrap()
                            .and_hms_opt(hour, 0, 0)
                            .unwrap(),
                    },
                    Category::Motivation,
                )
            })
            .collect();
        aggregate(&rows).unwrap()
    }

    #[test]
    fn prompt_carries_the_numbers_and_length_cap() {
        let prompt = summary_prompt(&agg(), "20250725");
        assert!(prompt.contains("- 日付: 20250725"));
        assert!(prompt.contains("モチベ系: 3件"));
        assert!(prompt.contains("朝: 3件 / 平均いいね 5.0"));
        assert!(prompt.contains("昼: 0件 / 平均いいね 投稿なし"));
        assert!(prompt.contains("800文字以内"));
    }
}
