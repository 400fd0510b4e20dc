use crate::ai::LlmProvider;
use crate::dataset::{read_csv, LabeledRecord};
use crate::report::aggregate::{aggregate, Aggregates};
use crate::report::charts::{render_bar, render_heatmap};
use crate::report::render::{
    write_html, write_markdown, write_summary_txt, ReportArtifacts, CATEGORY_COUNT_PNG,
    HEATMAP_PNG, LIKES_BY_CATEGORY_PNG, LIKES_BY_TIMEZONE_PNG, TIMEZONE_COUNT_PNG,
};
use crate::report::summary::{generate_summary, SummaryConfig};
use crate::report::ReportError;
use chrono::Local;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub summary: SummaryConfig,
}

impl ReportConfig {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output"));
        Self {
            data_dir,
            output_dir,
            summary: SummaryConfig::from_env(),
        }
    }
}

/// Explicit input manifest for the report stage: every labeled dataset under
/// the data dir, sorted by name (i.e. by collection timestamp). An empty
/// manifest is the missing-input failure, reported before any chart exists.
pub fn labeled_files(data_dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let entries = fs::read_dir(data_dir)
        .map_err(|_| ReportError::NoInput(data_dir.display().to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if name.starts_with("tweets_") && name.ends_with("_labeled.csv") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ReportError::NoInput(data_dir.display().to_string()));
    }
    Ok(files)
}

pub struct ReportService<P: LlmProvider> {
    provider: P,
    cfg: ReportConfig,
}

impl<P: LlmProvider> ReportService<P> {
    pub fn new(provider: P, cfg: ReportConfig) -> Self {
        Self { provider, cfg }
    }

    /// Concatenate the given labeled files (file order, then row order),
    /// aggregate, render charts, generate the prose summary and emit the
    /// HTML/text/Markdown artifacts.
    pub async fn run(&self, files: &[PathBuf]) -> anyhow::Result<ReportArtifacts> {
        if files.is_empty() {
            return Err(ReportError::NoInput("empty file list".to_string()).into());
        }

        let mut rows: Vec<LabeledRecord> = Vec::new();
        for file in files {
            let part: Vec<LabeledRecord> = read_csv(file)?;
            info!("loaded {} rows from {}", part.len(), file.display());
            rows.extend(part);
        }
        let agg = aggregate(&rows)?;

        fs::create_dir_all(&self.cfg.output_dir)?;
        let charts = self.render_charts(&agg)?;

        let date_str = Local::now().format("%Y%m%d").to_string();
        let summary =
            generate_summary(&self.provider, &self.cfg.summary, &agg, &date_str).await;

        let html = write_html(&self.cfg.output_dir, &date_str, agg.total)?;
        let summary_txt = write_summary_txt(&self.cfg.output_dir, &date_str, &summary)?;
        let markdown = write_markdown(&self.cfg.output_dir, &date_str, &summary)?;
        info!("report written -> {}", html.display());

        Ok(ReportArtifacts {
            html,
            summary_txt,
            markdown,
            charts,
        })
    }

    fn render_charts(&self, agg: &Aggregates) -> Result<Vec<PathBuf>, ReportError> {
        let out = &self.cfg.output_dir;

        let category_counts: Vec<(String, Option<f64>)> = agg
            .category_counts
            .iter()
            .map(|(c, n)| (c.to_string(), Some(*n as f64)))
            .collect();
        let category_likes: Vec<(String, Option<f64>)> = agg
            .category_likes
            .iter()
            .map(|(c, m)| (c.to_string(), Some(*m)))
            .collect();
        let bucket_counts: Vec<(String, Option<f64>)> = agg
            .bucket_counts
            .iter()
            .map(|(b, n)| (b.to_string(), Some(*n as f64)))
            .collect();
        let bucket_likes: Vec<(String, Option<f64>)> = agg
            .bucket_likes
            .iter()
            .map(|(b, m)| (b.to_string(), *m))
            .collect();

        let paths = [
            out.join(CATEGORY_COUNT_PNG),
            out.join(LIKES_BY_CATEGORY_PNG),
            out.join(TIMEZONE_COUNT_PNG),
            out.join(LIKES_BY_TIMEZONE_PNG),
            out.join(HEATMAP_PNG),
        ];

        render_bar(
            &paths[0],
            "カテゴリ別 投稿数",
            "投稿カテゴリ",
            "投稿件数",
            &category_counts,
        )?;
        render_bar(
            &paths[1],
            "カテゴリ別 平均いいね数",
            "投稿カテゴリ",
            "平均いいね数",
            &category_likes,
        )?;
        render_bar(
            &paths[2],
            "時間帯別 投稿数",
            "時間帯",
            "投稿件数",
            &bucket_counts,
        )?;
        render_bar(
            &paths[3],
            "時間帯別 平均いいね数",
            "時間帯",
            "平均いいね数",
            &bucket_likes,
        )?;

        let row_labels: Vec<String> = agg.cross.categories.iter().map(|c| c.to_string()).collect();
        let col_labels: Vec<String> = agg.cross.buckets.iter().map(|b| b.to_string()).collect();
        render_heatmap(
            &paths[4],
            "カテゴリ × 時間帯 × 平均いいね数",
            &row_labels,
            &col_labels,
            &agg.cross.matrix(),
        )?;

        Ok(paths.to_vec())
    }
}
