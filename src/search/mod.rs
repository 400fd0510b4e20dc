pub mod dto;
pub mod session;
pub mod urls;

pub use dto::{PublicMetrics, SearchResponse, TweetResult};
pub use session::{SearchApi, SearchError, TwitterSession};
