use crate::dataset::{Category, LabeledRecord, TimeBucket};
use crate::report::ReportError;
use std::collections::BTreeMap;

/// Everything the report stage derives from one concatenated dataset.
/// Held in memory only; the numbers live on solely inside the rendered
/// artifacts.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub total: usize,
    /// Observed categories with post counts, most posts first.
    pub category_counts: Vec<(Category, usize)>,
    /// Observed categories with mean likes, highest mean first.
    pub category_likes: Vec<(Category, f64)>,
    /// Every bucket in enum order; zero when no posts fell into it.
    pub bucket_counts: Vec<(TimeBucket, usize)>,
    /// Every bucket in enum order; `None` when no posts fell into it.
    pub bucket_likes: Vec<(TimeBucket, Option<f64>)>,
    pub cross: CrossTable,
}

/// category × time-bucket mean-likes table. The bucket axis is always the
/// full enum in declaration order; the category axis is the union of the
/// categories observed in the input. Cells without rows are absent, never
/// zero.
#[derive(Debug, Clone)]
pub struct CrossTable {
    pub categories: Vec<Category>,
    pub buckets: [TimeBucket; 4],
    cells: BTreeMap<(Category, TimeBucket), f64>,
}

impl CrossTable {
    pub fn mean_likes(&self, category: Category, bucket: TimeBucket) -> Option<f64> {
        self.cells.get(&(category, bucket)).copied()
    }

    /// Row-major matrix matching `categories` × `buckets`, for rendering.
    pub fn matrix(&self) -> Vec<Vec<Option<f64>>> {
        self.categories
            .iter()
            .map(|&c| self.buckets.iter().map(|&b| self.mean_likes(c, b)).collect())
            .collect()
    }
}

pub fn aggregate(rows: &[LabeledRecord]) -> Result<Aggregates, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoInput("dataset has no rows".to_string()));
    }

    let mut by_category: BTreeMap<Category, (usize, u64)> = BTreeMap::new();
    let mut by_bucket: BTreeMap<TimeBucket, (usize, u64)> = BTreeMap::new();
    let mut by_cell: BTreeMap<(Category, TimeBucket), (usize, u64)> = BTreeMap::new();

    for row in rows {
        let c = by_category.entry(row.category).or_insert((0, 0));
        c.0 += 1;
        c.1 += row.likes;
        let b = by_bucket.entry(row.time_zone).or_insert((0, 0));
        b.0 += 1;
        b.1 += row.likes;
        let cell = by_cell.entry((row.category, row.time_zone)).or_insert((0, 0));
        cell.0 += 1;
        cell.1 += row.likes;
    }

    let mut category_counts: Vec<(Category, usize)> =
        by_category.iter().map(|(&c, &(n, _))| (c, n)).collect();
    category_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut category_likes: Vec<(Category, f64)> = by_category
        .iter()
        .map(|(&c, &(n, likes))| (c, likes as f64 / n as f64))
        .collect();
    category_likes.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let bucket_counts: Vec<(TimeBucket, usize)> = TimeBucket::ALL
        .iter()
        .map(|&b| (b, by_bucket.get(&b).map(|&(n, _)| n).unwrap_or(0)))
        .collect();

    let bucket_likes: Vec<(TimeBucket, Option<f64>)> = TimeBucket::ALL
        .iter()
        .map(|&b| {
            (
                b,
                by_bucket.get(&b).map(|&(n, likes)| likes as f64 / n as f64),
            )
        })
        .collect();

    let categories: Vec<Category> = by_category.keys().copied().collect();
    let cells: BTreeMap<(Category, TimeBucket), f64> = by_cell
        .into_iter()
        .map(|(key, (n, likes))| (key, likes as f64 / n as f64))
        .collect();

    Ok(Aggregates {
        total: rows.len(),
        category_counts,
        category_likes,
        bucket_counts,
        bucket_likes,
        cross: CrossTable {
            categories,
            buckets: TimeBucket::ALL,
            cells,
        },
    })
}
