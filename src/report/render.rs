use crate::report::ReportError;
use std::fs;
use std::path::{Path, PathBuf};

/// Chart file names, fixed so repeated runs overwrite the previous images.
pub const CATEGORY_COUNT_PNG: &str = "category_count.png";
pub const LIKES_BY_CATEGORY_PNG: &str = "likes_by_category.png";
pub const TIMEZONE_COUNT_PNG: &str = "timezone_count.png";
pub const LIKES_BY_TIMEZONE_PNG: &str = "likes_by_timezone.png";
pub const HEATMAP_PNG: &str = "heatmap_category_timezone.png";

#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub html: PathBuf,
    pub summary_txt: PathBuf,
    pub markdown: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// HTML report embedding the chart images by relative name, so the output
/// directory can be published as-is.
pub fn write_html(output_dir: &Path, date_str: &str, total: usize) -> Result<PathBuf, ReportError> {
    let path = output_dir.join(format!("weekly_report_{date_str}.html"));
    let html = format!(
        r#"<html>
<head><meta charset="utf-8"><title>週次Twitter分析レポート</title></head>
<body>
<h1>週次Twitter分析レポート（{date_str}）</h1>
<h2>1. カテゴリ別 投稿数</h2>
<img src="{CATEGORY_COUNT_PNG}" width="600"><br>
<h2>2. カテゴリ別 平均いいね数</h2>
<img src="{LIKES_BY_CATEGORY_PNG}" width="600"><br>
<h2>3. 時間帯別 投稿数</h2>
<img src="{TIMEZONE_COUNT_PNG}" width="600"><br>
<h2>4. 時間帯別 平均いいね数</h2>
<img src="{LIKES_BY_TIMEZONE_PNG}" width="600"><br>
<h2>5. カテゴリ×時間帯 平均いいね数ヒートマップ</h2>
<img src="{HEATMAP_PNG}" width="600"><br>
<p>対象ツイート数：{total} 件</p>
</body>
</html>
"#
    );
    fs::write(&path, html)?;
    Ok(path)
}

pub fn write_summary_txt(
    output_dir: &Path,
    date_str: &str,
    summary: &str,
) -> Result<PathBuf, ReportError> {
    let path = output_dir.join(format!("weekly_summary_{date_str}.txt"));
    fs::write(&path, summary)?;
    Ok(path)
}

/// Markdown variant with Zenn front matter, ready for an articles repo.
pub fn write_markdown(
    output_dir: &Path,
    date_str: &str,
    summary: &str,
) -> Result<PathBuf, ReportError> {
    let path = output_dir.join(format!("weekly-report-{date_str}.md"));
    let body = format!(
        r#"---
title: "Twitter週次レポート（{date_str}）"
emoji: "📈"
type: "idea"
topics: ["Twitter", "SNS分析"]
published: true
---

{summary}
"#
    );
    fs::write(&path, body)?;
    Ok(path)
}
