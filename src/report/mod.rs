pub mod aggregate;
pub mod charts;
pub mod render;
pub mod service;
pub mod summary;

pub use aggregate::{aggregate, Aggregates, CrossTable};
pub use render::ReportArtifacts;
pub use service::{labeled_files, ReportConfig, ReportService};
pub use summary::SummaryConfig;

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("no labeled dataset found: {0} (run collect and classify first)")]
    NoInput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset error: {0}")]
    Dataset(#[from] crate::dataset::DatasetError),
    #[error("chart render failed: {0}")]
    Chart(String),
}
