use super::csv_io::CsvRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Persisted timestamp format, shared by every stage.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One collected post, straight from the search API. Category and time
/// bucket are structurally absent until the classifier runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub text: String,
    pub likes: u64,
    pub retweets: u64,
    #[serde(with = "timestamp_format")]
    pub created_at: NaiveDateTime,
}

impl CsvRecord for RawRecord {
    const HEADERS: &'static [&'static str] = &["text", "likes", "retweets", "created_at"];
}

/// A classified post. Fields are only ever added to a RawRecord, never
/// removed, so the labeled CSV is a superset of the raw one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub text: String,
    pub likes: u64,
    pub retweets: u64,
    #[serde(with = "timestamp_format")]
    pub created_at: NaiveDateTime,
    pub category: Category,
    pub time_zone: TimeBucket,
}

impl CsvRecord for LabeledRecord {
    const HEADERS: &'static [&'static str] =
        &["text", "likes", "retweets", "created_at", "category", "time_zone"];
}

impl LabeledRecord {
    pub fn from_raw(raw: RawRecord, category: Category) -> Self {
        use chrono::Timelike;
        let time_zone = TimeBucket::from_hour(raw.created_at.hour());
        Self {
            text: raw.text,
            likes: raw.likes,
            retweets: raw.retweets,
            created_at: raw.created_at,
            category,
            time_zone,
        }
    }
}

/// Closed topical label set. `Failed` is the per-row sentinel assigned when
/// the classification service errors out; it never appears in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "モチベ系")]
    Motivation,
    #[serde(rename = "記録系")]
    TrainingLog,
    #[serde(rename = "食事・栄養系")]
    Nutrition,
    #[serde(rename = "情報系")]
    Information,
    #[serde(rename = "雑談系")]
    Chat,
    #[serde(rename = "分類失敗")]
    Failed,
}

impl Category {
    /// The five labels the classifier may assign, in display order.
    pub const LABELS: [Category; 5] = [
        Category::Motivation,
        Category::TrainingLog,
        Category::Nutrition,
        Category::Information,
        Category::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Motivation => "モチベ系",
            Category::TrainingLog => "記録系",
            Category::Nutrition => "食事・栄養系",
            Category::Information => "情報系",
            Category::Chat => "雑談系",
            Category::Failed => "分類失敗",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse time-of-day bucket derived from the hour of `created_at`.
/// Variant order is the fixed axis order for charts and cross tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeBucket {
    #[serde(rename = "朝")]
    Morning,
    #[serde(rename = "昼")]
    Midday,
    #[serde(rename = "夜")]
    Evening,
    #[serde(rename = "深夜")]
    LateNight,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 4] = [
        TimeBucket::Morning,
        TimeBucket::Midday,
        TimeBucket::Evening,
        TimeBucket::LateNight,
    ];

    /// Total over every hour of the day: [5,11) 朝, [11,16) 昼, [16,22) 夜,
    /// everything else 深夜. The whole pipeline uses this one policy.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=10 => TimeBucket::Morning,
            11..=15 => TimeBucket::Midday,
            16..=21 => TimeBucket::Evening,
            _ => TimeBucket::LateNight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Morning => "朝",
            TimeBucket::Midday => "昼",
            TimeBucket::Evening => "夜",
            TimeBucket::LateNight => "深夜",
        }
    }
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(super::TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, super::TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_is_total_over_the_day() {
        for hour in 0..24u32 {
            let bucket = TimeBucket::from_hour(hour);
            assert!(TimeBucket::ALL.contains(&bucket), "hour {hour} fell outside the enum");
        }
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(4), TimeBucket::LateNight);
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(10), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(11), TimeBucket::Midday);
        assert_eq!(TimeBucket::from_hour(15), TimeBucket::Midday);
        assert_eq!(TimeBucket::from_hour(16), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(21), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(22), TimeBucket::LateNight);
        assert_eq!(TimeBucket::from_hour(0), TimeBucket::LateNight);
    }

    #[test]
    fn sentinel_is_not_a_prompt_label() {
        assert!(!Category::LABELS.contains(&Category::Failed));
    }
}
