use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical record derived from one source post. Created unanalyzed by the
/// normalizer; classification fills the optional fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,       // source-prefixed post id, unique within the set
    pub text: String,     // title + body, truncated
    pub location: String, // "city, district"
    pub district: String,
    pub coordinates: [f64; 2], // [lat, lng], jittered around the city center
    pub timestamp: String,     // ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(default)]
    pub analyzed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Complete classification result for one text. Never partial: fallback
/// values cover empty or unmatched input.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub category: String,
    pub sentiment: Sentiment,
    pub emotion: String,
    pub severity: u8, // [1,10]
    pub keywords: Vec<String>,
}

/// User-selected view filters. Category/sentiment/district accept "all"
/// (or empty) as a wildcard; search is a substring match over `text`.
#[derive(Debug, Clone)]
pub struct ReportFilters {
    pub category: String,
    pub sentiment: String,
    pub district: String,
    pub search: String,
}

impl Default for ReportFilters {
    fn default() -> Self {
        ReportFilters {
            category: "all".to_string(),
            sentiment: "all".to_string(),
            district: "all".to_string(),
            search: String::new(),
        }
    }
}

/// Per-district aggregate, recomputed from the current report set on demand.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStats {
    pub district: String,
    pub total_reports: u32,
    pub categories: BTreeMap<String, u32>,
    pub sentiments: BTreeMap<String, u32>,
    pub coordinates: [f64; 2], // first-seen report's coordinate, not a centroid
}
