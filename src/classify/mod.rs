pub mod parser;
pub mod prompt;
pub mod service;

pub use parser::parse_category;
pub use service::{labeled_path, ClassifierService, ClassifyConfig};
