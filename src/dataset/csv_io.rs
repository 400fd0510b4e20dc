use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Excel and friends want the BOM to pick up UTF-8; every file we write
/// starts with it and every file we read may carry it.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Row types that know their own header, so a dataset with zero rows still
/// gets one.
pub trait CsvRecord {
    const HEADERS: &'static [&'static str];
}

/// Write rows as a comma-delimited file with a header row and a UTF-8 BOM.
/// The header is always written, even for an empty dataset.
pub fn write_csv<T, P>(path: P, rows: &[T]) -> Result<(), DatasetError>
where
    T: Serialize + CsvRecord,
    P: AsRef<Path>,
{
    let mut file = fs::File::create(path)?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a headered CSV back into records, tolerating a leading BOM.
pub fn read_csv<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>, DatasetError> {
    let raw = fs::read_to_string(path)?;
    let body = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::{Category, LabeledRecord, RawRecord, TimeBucket};
    use chrono::NaiveDate;

    fn sample_raw() -> Vec<RawRecord> {
        vec![
            RawRecord {
                text: "今日もベンチプレス、100kg更新！".to_string(),
                likes: 12,
                retweets: 3,
                created_at: NaiveDate::from_ymd_opt(2025, 7, 25)
                    .unwrap()
                    .and_hms_opt(7, 35, 2)
                    .unwrap(),
            },
            RawRecord {
                text: "プロテインは\"朝,昼,晩\"の3回\n飲んでいます".to_string(),
                likes: 0,
                retweets: 0,
                created_at: NaiveDate::from_ymd_opt(2025, 7, 25)
                    .unwrap()
                    .and_hms_opt(23, 0, 59)
                    .unwrap(),
            },
        ]
    }

    #[test]
    fn raw_round_trip_preserves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        let rows = sample_raw();
        write_csv(&path, &rows).unwrap();
        let back: Vec<RawRecord> = read_csv(&path).unwrap();
        assert_eq!(rows, back);
    }

    #[test]
    fn labeled_round_trip_keeps_enum_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets_labeled.csv");
        let rows: Vec<LabeledRecord> = sample_raw()
            .into_iter()
            .map(|r| LabeledRecord::from_raw(r, Category::TrainingLog))
            .collect();
        assert_eq!(rows[0].time_zone, TimeBucket::Morning);
        assert_eq!(rows[1].time_zone, TimeBucket::LateNight);
        write_csv(&path, &rows).unwrap();
        let back: Vec<LabeledRecord> = read_csv(&path).unwrap();
        assert_eq!(rows, back);
    }

    #[test]
    fn empty_dataset_still_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv::<RawRecord, _>(&path, &[]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let header = raw.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(header, "text,likes,retweets,created_at");

        let back: Vec<RawRecord> = read_csv(&path).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn writes_bom_and_exact_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header.csv");
        write_csv(&path, &sample_raw()).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "text,likes,retweets,created_at");
    }

    #[test]
    fn labeled_header_extends_raw_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labeled_header.csv");
        let rows: Vec<LabeledRecord> = sample_raw()
            .into_iter()
            .map(|r| LabeledRecord::from_raw(r, Category::Chat))
            .collect();
        write_csv(&path, &rows).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let header = raw.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(header, "text,likes,retweets,created_at,category,time_zone");
    }
}
