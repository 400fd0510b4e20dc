/// Recent-search endpoint (last 7 days of posts)
pub const URL_SEARCH_RECENT: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Tweet fields requested alongside the default text field.
pub const TWEET_FIELDS: &str = "created_at,public_metrics,author_id";
