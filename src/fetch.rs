//! Transport layer against Reddit's public JSON endpoints: paced requests,
//! capped exponential backoff on throttling, and a multi-subreddit
//! collection pass. Failures degrade to empty results, never to a crash.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::api_types::{Listing, RawPost};

const REDDIT_BASE: &str = "https://www.reddit.com";
const USER_AGENT: &str = "street_voice/0.1 (city reports aggregator)";

const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(3);
const RATE_LIMIT_RETRY_BASE: Duration = Duration::from_secs(60);
const MAX_RETRIES: u32 = 3;

/// Per-request page cap on the public endpoints.
const PAGE_LIMIT: u32 = 25;
/// Overall cap per collection pass.
const COLLECTION_LIMIT: usize = 30;

/// Popular, unquarantined city subreddits worth polling.
const SAFE_SUBREDDITS: &[&str] = &[
    "nyc",
    "LosAngeles",
    "chicago",
    "sanfrancisco",
    "boston",
    "london",
    "toronto",
    "melbourne",
    "sydney",
    "seattle",
    "philadelphia",
];

const CITY_QUERIES: &[&str] = &[
    "traffic jam problem",
    "subway delay",
    "parking nightmare",
    "road construction issue",
    "power outage",
    "water problem",
    "heating issue",
    "trash collection",
    "broken elevator",
    "pothole problem",
    "broken streetlight",
    "noise complaint",
];

pub struct RedditClient {
    client: Client,
    last_request: Option<Instant>,
}

impl RedditClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(RedditClient {
            client,
            last_request: None,
        })
    }

    /// Enforce the minimum gap between requests.
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let since = last.elapsed();
            if since < MIN_REQUEST_INTERVAL {
                let wait = MIN_REQUEST_INTERVAL - since;
                debug!("Rate limiting - waiting {:.1}s before next request", wait.as_secs_f32());
                tokio::time::sleep(wait).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// One listing request with backoff on 429. Non-OK statuses degrade to
    /// `Ok(None)`; only transport/decoding failures are errors.
    async fn get_listing(
        &mut self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<Vec<RawPost>>> {
        for attempt in 0..=MAX_RETRIES {
            self.pace().await;

            let resp = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .with_context(|| format!("Request failed for {url}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                if attempt == MAX_RETRIES {
                    warn!("Max retries reached for rate limiting - url={url}");
                    return Ok(None);
                }
                let delay = RATE_LIMIT_RETRY_BASE * 2u32.pow(attempt);
                warn!(
                    "Rate limited (429) - retry {}/{} after {}s",
                    attempt + 1,
                    MAX_RETRIES,
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !resp.status().is_success() {
                warn!("HTTP error - url={}, status={}", url, resp.status());
                return Ok(None);
            }

            let listing: Listing = resp
                .json()
                .await
                .with_context(|| format!("Decoding JSON for {url}"))?;
            let posts = listing
                .data
                .children
                .into_iter()
                .map(|child| child.data)
                .collect();
            return Ok(Some(posts));
        }
        Ok(None)
    }

    pub async fn subreddit_posts(
        &mut self,
        subreddit: &str,
        sort: &str,
        limit: u32,
    ) -> Result<Vec<RawPost>> {
        let url = format!("{REDDIT_BASE}/r/{subreddit}/{sort}.json");
        let query = [("limit", limit.min(PAGE_LIMIT).to_string())];
        Ok(self.get_listing(&url, &query).await?.unwrap_or_default())
    }

    pub async fn search_posts(
        &mut self,
        terms: &str,
        subreddit: Option<&str>,
        limit: u32,
    ) -> Result<Vec<RawPost>> {
        let url = match subreddit {
            Some(sub) => format!("{REDDIT_BASE}/r/{sub}/search.json"),
            None => format!("{REDDIT_BASE}/search.json"),
        };
        let query = [
            ("q", terms.to_string()),
            ("sort", "new".to_string()),
            ("limit", limit.min(PAGE_LIMIT).to_string()),
            ("restrict_sr", subreddit.is_some().to_string()),
            ("t", "week".to_string()),
        ];
        Ok(self.get_listing(&url, &query).await?.unwrap_or_default())
    }

    /// Poll a few subreddits plus one global search, then prune junk. Kept
    /// deliberately small: the public endpoints throttle aggressively.
    pub async fn collect_city_posts(&mut self) -> Vec<RawPost> {
        let start = Instant::now();
        let mut pooled = Vec::new();

        for subreddit in SAFE_SUBREDDITS.iter().take(3) {
            debug!("Searching in r/{subreddit}");
            match self.subreddit_posts(subreddit, "new", 5).await {
                Ok(posts) => pooled.extend(posts),
                Err(err) => {
                    warn!("Failed to fetch from r/{subreddit} - error={err:#}");
                    continue;
                }
            }
            match self.search_posts(CITY_QUERIES[0], Some(subreddit), 3).await {
                Ok(posts) => pooled.extend(posts),
                Err(err) => warn!("Search failed in r/{subreddit} - error={err:#}"),
            }
        }

        match self.search_posts(CITY_QUERIES[0], None, 5).await {
            Ok(posts) => pooled.extend(posts),
            Err(err) => warn!("Global search failed - error={err:#}"),
        }

        let collected = prune_collected(pooled);
        info!(
            "Collection pass completed - duration={:.1}s, posts={}",
            start.elapsed().as_secs_f32(),
            collected.len()
        );
        collected
    }
}

/// Source-side quality pruning, before the relevance filter ever sees the
/// batch: drop removed/deleted bodies, near-empty titles, heavily downvoted
/// posts, and duplicate ids across the pooled requests.
fn prune_collected(posts: Vec<RawPost>) -> Vec<RawPost> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();
    for post in posts {
        if post.selftext == "[removed]" || post.selftext == "[deleted]" {
            continue;
        }
        if post.title.chars().count() < 10 {
            continue;
        }
        if post.score < -10 {
            continue;
        }
        if !seen.insert(post.id.clone()) {
            continue;
        }
        kept.push(post);
        if kept.len() == COLLECTION_LIMIT {
            break;
        }
    }
    kept
}

/// Fixture batch for offline runs and demos.
pub fn mock_posts() -> Vec<RawPost> {
    let now = Utc::now().timestamp() as f64;
    let post = |id: &str,
                title: &str,
                selftext: &str,
                author: &str,
                age_secs: f64,
                score: i64,
                num_comments: u32,
                subreddit: &str| RawPost {
        id: id.to_string(),
        title: title.to_string(),
        selftext: selftext.to_string(),
        author: author.to_string(),
        created_utc: now - age_secs,
        score,
        num_comments,
        subreddit: subreddit.to_string(),
        permalink: format!("/r/{subreddit}/comments/{id}/"),
        url: format!("https://www.reddit.com/r/{subreddit}/comments/{id}/"),
    };

    vec![
        post(
            "mock1",
            "Subway delays on Line 2 this morning - 20 minute wait",
            "Anyone else experiencing major delays on the subway? Been waiting for 20 minutes and no announcements.",
            "commuter123",
            3_600.0,
            45,
            12,
            "nyc",
        ),
        post(
            "mock2",
            "Huge pothole on Main Street - damaged my tire",
            "The pothole near the intersection of Main and 5th has gotten massive. Just damaged my tire going through it. City needs to fix this ASAP.",
            "driver456",
            7_200.0,
            78,
            23,
            "LosAngeles",
        ),
        post(
            "mock3",
            "Water main break on Oak Avenue - no water for 6 hours",
            "Water main broke early this morning on Oak Avenue. Whole block has been without water since 6 AM. City crews are on site but no ETA for repairs.",
            "resident789",
            21_600.0,
            156,
            45,
            "chicago",
        ),
        post(
            "mock4",
            "Parking meters broken downtown - getting tickets anyway",
            "Half the parking meters on 3rd Street are out of order but parking enforcement is still giving tickets. This is ridiculous.",
            "downtown_parker",
            14_400.0,
            92,
            31,
            "sanfrancisco",
        ),
        post(
            "mock5",
            "Construction noise starting at 5 AM every day",
            "The construction crew next to my building starts heavy machinery at 5 AM every morning. Is this even legal? How do I complain to the city?",
            "sleepy_neighbor",
            10_800.0,
            67,
            18,
            "boston",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_drops_junk_and_duplicates() {
        let mut posts = mock_posts();
        posts[1].selftext = "[removed]".to_string();
        posts[2].score = -11;
        posts.push(mock_posts()[0].clone()); // duplicate id

        let kept = prune_collected(posts);
        let ids: Vec<&str> = kept.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["mock1", "mock4", "mock5"]);
    }

    #[test]
    fn test_prune_caps_the_batch() {
        let mut posts = Vec::new();
        for i in 0..40 {
            let mut post = mock_posts()[0].clone();
            post.id = format!("gen{i}");
            posts.push(post);
        }
        assert_eq!(prune_collected(posts).len(), COLLECTION_LIMIT);
    }

    #[test]
    fn test_mock_posts_are_plausible_inputs() {
        let posts = mock_posts();
        assert_eq!(posts.len(), 5);
        for post in &posts {
            assert!(post.title.chars().count() >= 10);
            assert!(post.created_utc > 0.0);
        }
    }
}
