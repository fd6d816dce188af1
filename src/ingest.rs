//! Ingestion: relevance filtering, within-batch dedup, normalization of raw
//! posts into reports, and the cross-batch merge.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

use crate::api_types::RawPost;
use crate::models::Report;
use crate::taxonomy::{
    lookup_city, CityDef, DEFAULT_COORDINATES, RELEVANCE_KEYWORDS, UNKNOWN_PLACE,
};

/// Reports are namespaced by source so ids can't collide across feeds.
pub const ID_PREFIX: &str = "reddit_";
pub const MAX_TEXT_CHARS: usize = 500;
pub const JITTER_DEGREES: f64 = 0.05;

const MIN_COMBINED_CHARS: usize = 20;
const MIN_SCORE: i64 = -5;
const MIN_TITLE_CHARS: usize = 5;

/// Keep a post iff it mentions a relevance keyword, carries enough text, and
/// isn't buried by downvotes. Duplicate source ids within the batch are
/// dropped, first occurrence wins. Order-preserving.
pub fn filter_relevant(posts: &[RawPost]) -> Vec<RawPost> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept = Vec::new();

    for post in posts {
        let combined = format!("{} {}", post.title, post.selftext).to_lowercase();

        let has_keyword = RELEVANCE_KEYWORDS.iter().any(|k| combined.contains(k));
        let has_min_length = combined.chars().count() > MIN_COMBINED_CHARS;
        let has_decent_score = post.score > MIN_SCORE;
        let has_text =
            post.title.chars().count() > MIN_TITLE_CHARS || !post.selftext.is_empty();

        if has_keyword && has_min_length && has_decent_score && has_text
            && seen.insert(post.id.as_str())
        {
            kept.push(post.clone());
        }
    }

    debug!(
        "Relevance filter - kept={}, dropped={}",
        kept.len(),
        posts.len() - kept.len()
    );
    kept
}

/// What to do when no district name occurs in the post text: pick one
/// uniformly (the original dashboard's behavior) or fall back to the
/// explicit "Unknown" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistrictFallback {
    Random,
    Unknown,
}

/// Converts raw posts into canonical reports. Holds the rng for coordinate
/// jitter and the random-district fallback; seed it for reproducible runs.
pub struct Normalizer {
    fallback: DistrictFallback,
    rng: StdRng,
}

impl Normalizer {
    pub fn new(fallback: DistrictFallback) -> Self {
        Normalizer {
            fallback,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(fallback: DistrictFallback, seed: u64) -> Self {
        Normalizer {
            fallback,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Never fails: unresolvable channels land in the "Unknown" placeholders
    /// rather than failing the batch.
    pub fn normalize(&mut self, post: &RawPost) -> Report {
        let city_def = lookup_city(&post.subreddit);
        let (city, base) = match city_def {
            Some(def) => (def.city, def.coordinates),
            None => (UNKNOWN_PLACE, DEFAULT_COORDINATES),
        };

        let district =
            self.resolve_district(&format!("{} {}", post.title, post.selftext), city_def);

        let full_text = if post.selftext.is_empty() {
            post.title.clone()
        } else {
            format!("{}. {}", post.title, post.selftext)
        };
        let text: String = full_text.chars().take(MAX_TEXT_CHARS).collect();

        Report {
            id: format!("{ID_PREFIX}{}", post.id),
            text,
            location: format!("{}, {}", city, district),
            district,
            coordinates: self.jitter(base),
            timestamp: iso_timestamp(post.created_utc),
            category: None,
            sentiment: None,
            emotion: None,
            severity: None,
            analyzed: false,
        }
    }

    fn resolve_district(&mut self, text: &str, city: Option<&'static CityDef>) -> String {
        let Some(city) = city else {
            return UNKNOWN_PLACE.to_string();
        };

        let lowered = text.to_lowercase();
        if let Some(district) = city
            .districts
            .iter()
            .find(|d| lowered.contains(&d.to_lowercase()))
        {
            return district.to_string();
        }

        match self.fallback {
            DistrictFallback::Random => {
                let idx = self.rng.gen_range(0..city.districts.len());
                city.districts[idx].to_string()
            }
            DistrictFallback::Unknown => UNKNOWN_PLACE.to_string(),
        }
    }

    /// Markers are scattered around the city center, not geocoded.
    fn jitter(&mut self, base: [f64; 2]) -> [f64; 2] {
        [
            base[0] + self.rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
            base[1] + self.rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
        ]
    }
}

/// Filter and normalize one fetched batch.
pub fn ingest_posts(normalizer: &mut Normalizer, posts: &[RawPost]) -> Vec<Report> {
    filter_relevant(posts)
        .iter()
        .map(|post| normalizer.normalize(post))
        .collect()
}

/// Cross-batch dedup: append incoming reports whose id is not already held.
/// Keeps `existing` order, then surviving `incoming` order; duplicates inside
/// `incoming` also collapse to their first occurrence.
pub fn merge(existing: &[Report], incoming: &[Report]) -> Vec<Report> {
    let mut seen: HashSet<&str> = existing.iter().map(|r| r.id.as_str()).collect();
    let mut merged = existing.to_vec();
    for report in incoming {
        if seen.insert(report.id.as_str()) {
            merged.push(report.clone());
        }
    }
    merged
}

fn iso_timestamp(unix_seconds: f64) -> String {
    DateTime::<Utc>::from_timestamp(unix_seconds as i64, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::CITIES;

    fn raw_post(id: &str, title: &str, selftext: &str, subreddit: &str) -> RawPost {
        RawPost {
            id: id.to_string(),
            title: title.to_string(),
            selftext: selftext.to_string(),
            author: "tester".to_string(),
            created_utc: 1_750_000_000.0,
            score: 10,
            num_comments: 2,
            subreddit: subreddit.to_string(),
            permalink: format!("/r/{subreddit}/comments/{id}/"),
            url: format!("https://www.reddit.com/r/{subreddit}/comments/{id}/"),
        }
    }

    #[test]
    fn test_filter_keeps_relevant_posts_only() {
        let posts = vec![
            raw_post("a", "Huge pothole on my street", "ruined my rim", "nyc"),
            raw_post("b", "Look at this sunset", "so pretty over the bay", "nyc"),
        ];
        let kept = filter_relevant(&posts);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_filter_conditions() {
        // too short even though it has a keyword
        let short = raw_post("a", "pothole bad", "", "nyc");
        assert!(filter_relevant(&[short]).is_empty());

        // buried by downvotes
        let mut buried = raw_post("b", "Trash piling up on the corner", "", "nyc");
        buried.score = -5;
        assert!(filter_relevant(&[buried]).is_empty());

        // trivial title and no body
        let mut trivial = raw_post("c", "traffic problem everywhere today", "", "nyc");
        trivial.title = "noise".to_string();
        assert!(filter_relevant(&[trivial]).is_empty());
    }

    #[test]
    fn test_filter_dedups_within_batch_first_seen() {
        let first = raw_post("dup", "Pothole on 5th damaged my car", "", "nyc");
        let second = raw_post("dup", "Totally different traffic problem text", "", "nyc");
        let kept = filter_relevant(&[first, second]);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].title.starts_with("Pothole"));
    }

    #[test]
    fn test_normalize_shapes_the_report() {
        let mut normalizer = Normalizer::with_seed(DistrictFallback::Random, 7);
        let post = raw_post(
            "abc123",
            "Broken streetlight in Brooklyn",
            "Whole block is dark at night",
            "nyc",
        );
        let report = normalizer.normalize(&post);

        assert_eq!(report.id, "reddit_abc123");
        assert_eq!(report.district, "Brooklyn"); // mentioned in the title
        assert_eq!(report.location, "New York, Brooklyn");
        assert_eq!(
            report.text,
            "Broken streetlight in Brooklyn. Whole block is dark at night"
        );
        assert!(report.timestamp.starts_with("2025-"));
        assert!(!report.analyzed);
        assert!(report.category.is_none());
    }

    #[test]
    fn test_normalize_truncates_text() {
        let mut normalizer = Normalizer::with_seed(DistrictFallback::Random, 7);
        let post = raw_post("long", "Endless noise complaint", &"x".repeat(900), "nyc");
        let report = normalizer.normalize(&post);
        assert_eq!(report.text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let mut normalizer = Normalizer::with_seed(DistrictFallback::Random, 42);
        for def in CITIES {
            let post = raw_post("j", "Garbage collection problem here", "", def.key);
            let report = normalizer.normalize(&post);
            assert!((report.coordinates[0] - def.coordinates[0]).abs() <= JITTER_DEGREES);
            assert!((report.coordinates[1] - def.coordinates[1]).abs() <= JITTER_DEGREES);
        }
    }

    #[test]
    fn test_unresolved_channel_uses_placeholders() {
        let mut normalizer = Normalizer::with_seed(DistrictFallback::Random, 1);
        let post = raw_post("u", "Elevator broken again in my building", "", "mildlyinfuriating");
        let report = normalizer.normalize(&post);
        assert_eq!(report.district, UNKNOWN_PLACE);
        assert_eq!(report.location, "Unknown, Unknown");
        assert!((report.coordinates[0] - DEFAULT_COORDINATES[0]).abs() <= JITTER_DEGREES);
    }

    #[test]
    fn test_district_fallback_policies() {
        let post = raw_post("f", "Water problem with no district mention", "", "chicago");

        let mut random = Normalizer::with_seed(DistrictFallback::Random, 3);
        let picked = random.normalize(&post).district;
        let chicago = lookup_city("chicago").unwrap();
        assert!(chicago.districts.contains(&picked.as_str()));

        let mut unknown = Normalizer::with_seed(DistrictFallback::Unknown, 3);
        assert_eq!(unknown.normalize(&post).district, UNKNOWN_PLACE);
    }

    #[test]
    fn test_seeded_normalizer_is_reproducible() {
        let post = raw_post("r", "Parking nightmare downtown again", "", "toronto");
        let a = Normalizer::with_seed(DistrictFallback::Random, 99).normalize(&post);
        let b = Normalizer::with_seed(DistrictFallback::Random, 99).normalize(&post);
        assert_eq!(a, b);
    }

    #[test]
    fn test_merge_dedups_across_batches() {
        let mut normalizer = Normalizer::with_seed(DistrictFallback::Random, 5);
        let first_fetch = ingest_posts(
            &mut normalizer,
            &[raw_post("x1", "Pothole on Main damaged my tire", "", "nyc")],
        );
        let second_fetch = ingest_posts(
            &mut normalizer,
            &[
                raw_post("x1", "Pothole on Main damaged my tire", "", "nyc"),
                raw_post("x2", "Subway delayed for an hour", "", "nyc"),
            ],
        );

        let merged = merge(&first_fetch, &second_fetch);
        assert_eq!(merged.len(), 2);
        let with_id: Vec<_> = merged.iter().filter(|r| r.id == "reddit_x1").collect();
        assert_eq!(with_id.len(), 1);
        // the first ingested copy survives
        assert_eq!(with_id[0].text, first_fetch[0].text);
    }

    #[test]
    fn test_merge_laws() {
        let mut normalizer = Normalizer::with_seed(DistrictFallback::Random, 5);
        let existing = ingest_posts(
            &mut normalizer,
            &[raw_post("m1", "Streetlight out on my block, unsafe", "", "boston")],
        );

        assert_eq!(merge(&existing, &[]), existing);

        let dup = existing[0].clone();
        let merged = merge(&[], &[dup.clone(), dup.clone()]);
        assert_eq!(merged.len(), 1);

        let merged_all = merge(&existing, &existing);
        let ids: HashSet<&str> = merged_all
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids.len(), 1);
    }
}
