pub mod service;

pub use service::{CollectConfig, CollectorService};
