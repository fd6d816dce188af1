use serde::{Deserialize, Serialize};

/// One post as Reddit's public JSON endpoints deliver it. Fields beyond the
/// ones the pipeline consumes are dropped at decode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: String,
    pub created_utc: f64, // unix seconds; the API sends fractional values
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u32,
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String, // "/r/<sub>/comments/<id>/<slug>/"
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild {
    pub data: RawPost,
}
