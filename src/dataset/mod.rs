pub mod csv_io;
pub mod record;

pub use csv_io::{read_csv, write_csv, CsvRecord, DatasetError};
pub use record::{Category, LabeledRecord, RawRecord, TimeBucket, TIMESTAMP_FORMAT};
