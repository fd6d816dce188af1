//! Heuristic text classification: category, sentiment, emotion, severity,
//! and keyword extraction over the static taxonomy. Pure and deterministic;
//! every input yields a complete result.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

use crate::models::{AnalysisResult, Report, Sentiment};
use crate::taxonomy::{
    CATEGORIES, FALLBACK_CATEGORY, NEGATIVE_INTENSIFIERS, NEGATIVE_WORDS,
    POSITIVE_WORDS, SEVERITY_CRITICAL, SEVERITY_HIGH, SEVERITY_LOW,
    SEVERITY_MEDIUM, STOP_WORDS,
};

const SEVERITY_BASELINE: i32 = 3;
const KEYWORD_LIMIT: usize = 5;
const MIN_TOKEN_CHARS: usize = 3;

pub fn classify(text: &str) -> AnalysisResult {
    let lowered = text.nfc().collect::<String>().to_lowercase();

    let category = infer_category(&lowered);
    let (negative, positive) = sentiment_scores(&lowered);
    let sentiment = decide_sentiment(negative, positive);
    let severity = severity_score(&lowered);
    let emotion = derive_emotion(sentiment, severity);
    let keywords = extract_keywords(&lowered);

    AnalysisResult {
        category: category.to_string(),
        sentiment,
        emotion: emotion.to_string(),
        severity,
        keywords,
    }
}

/// Classify every unanalyzed report and write the results back in place,
/// matching by id so the result order is independent of the record order.
/// Returns the number of reports updated.
pub fn analyze_reports(reports: &mut [Report]) -> usize {
    let results: Vec<(String, AnalysisResult)> = reports
        .iter()
        .filter(|r| !r.analyzed)
        .map(|r| (r.id.clone(), classify(&r.text)))
        .collect();

    let by_id: HashMap<&str, &AnalysisResult> = results
        .iter()
        .map(|(id, analysis)| (id.as_str(), analysis))
        .collect();

    let mut updated = 0;
    for report in reports.iter_mut() {
        if let Some(analysis) = by_id.get(report.id.as_str()) {
            report.category = Some(analysis.category.clone());
            report.sentiment = Some(analysis.sentiment);
            report.emotion = Some(analysis.emotion.clone());
            report.severity = Some(analysis.severity);
            report.analyzed = true;
            updated += 1;
        }
    }
    updated
}

/// Presence count: how many of `words` occur somewhere in `text`. Matching
/// is plain substring containment, so "lift" also hits inside "uplifting";
/// that looseness is intentional and covered by tests.
fn presence_count(text: &str, words: &[&str]) -> u32 {
    words.iter().filter(|w| text.contains(*w)).count() as u32
}

fn infer_category(text: &str) -> &'static str {
    let mut best = FALLBACK_CATEGORY;
    let mut best_score = 0.0f32;
    for def in CATEGORIES {
        let plain = presence_count(text, def.keywords) as f32;
        let negative = presence_count(text, def.negative_indicators) as f32;
        let score = plain + 1.5 * negative;
        // strict ">" keeps the first-declared category on ties
        if score > best_score {
            best_score = score;
            best = def.name;
        }
    }
    best
}

pub(crate) fn sentiment_scores(text: &str) -> (u32, u32) {
    let mut negative = 0;
    for def in CATEGORIES {
        negative += 2 * presence_count(text, def.negative_indicators);
    }
    negative += presence_count(text, NEGATIVE_INTENSIFIERS);
    negative += presence_count(text, NEGATIVE_WORDS);

    let positive = presence_count(text, POSITIVE_WORDS);
    (negative, positive)
}

/// Complaints corpus, so the scale tilts negative: a text only counts as
/// negative once negativity clears positivity by more than one point.
pub(crate) fn decide_sentiment(negative: u32, positive: u32) -> Sentiment {
    if negative > positive + 1 {
        Sentiment::Negative
    } else if positive > negative {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

fn severity_score(text: &str) -> u8 {
    let mut score = SEVERITY_BASELINE;
    score += 4 * presence_count(text, SEVERITY_CRITICAL) as i32;
    score += 3 * presence_count(text, SEVERITY_HIGH) as i32;
    score += 2 * presence_count(text, SEVERITY_MEDIUM) as i32;
    score -= presence_count(text, SEVERITY_LOW) as i32;
    score += presence_count(text, NEGATIVE_INTENSIFIERS) as i32;
    score.clamp(1, 10) as u8
}

/// The original dashboard sourced this label from a language model; here it
/// is folded deterministically out of sentiment and severity, keeping the
/// same vocabulary.
fn derive_emotion(sentiment: Sentiment, severity: u8) -> &'static str {
    match sentiment {
        Sentiment::Negative if severity >= 8 => "anger",
        Sentiment::Negative if severity >= 6 => "frustration",
        Sentiment::Negative => "disappointment",
        Sentiment::Positive if severity <= 3 => "joy",
        Sentiment::Positive => "satisfaction",
        Sentiment::Neutral if severity >= 7 => "concern",
        Sentiment::Neutral => "neutral",
    }
}

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Top tokens by frequency; ties keep first-occurrence order.
fn extract_keywords(lowered: &str) -> Vec<String> {
    let cleaned = PUNCTUATION.replace_all(lowered, "");

    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for token in cleaned.split_whitespace() {
        if token.chars().count() < MIN_TOKEN_CHARS || STOP_WORDS.contains(token) {
            continue;
        }
        let entry = counts.entry(token.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(token.to_string());
        }
        *entry += 1;
    }

    // sort_by_key is stable, so equal counts stay in first-seen order
    order.sort_by_key(|t| std::cmp::Reverse(counts[t]));
    order.truncate(KEYWORD_LIMIT);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::is_known_category;

    const POTHOLE: &str =
        "Massive pothole on Main St damaged my tire, city needs to fix this ASAP";

    #[test]
    fn test_pothole_report_end_to_end() {
        let result = classify(POTHOLE);
        assert_eq!(result.category, "Roads");
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!(result.severity >= 6, "severity was {}", result.severity);
        for expected in ["pothole", "damaged", "main"] {
            assert!(
                result.keywords.iter().any(|k| k == expected),
                "missing keyword {:?} in {:?}",
                expected,
                result.keywords
            );
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        assert_eq!(classify(POTHOLE), classify(POTHOLE));
    }

    #[test]
    fn test_unmatched_text_falls_back() {
        let result = classify("completely unrelated text about kittens");
        assert_eq!(result.category, "Other");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.severity, 3);
    }

    #[test]
    fn test_empty_text_yields_complete_result() {
        let result = classify("");
        assert_eq!(result.category, "Other");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.severity, 3);
        assert_eq!(result.emotion, "neutral");
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn test_category_tie_keeps_declaration_order() {
        // one Roads keyword, one Transport keyword; Roads is declared first
        let result = classify("the road bus stop");
        assert_eq!(result.category, "Roads");
    }

    #[test]
    fn test_substring_matching_is_not_word_bounded() {
        // "lift" (Housing) matches inside "uplifting"; documented looseness
        let result = classify("what an uplifting community garden event");
        assert_eq!(result.category, "Housing");
    }

    #[test]
    fn test_sentiment_bias_is_exactly_plus_one() {
        assert_eq!(decide_sentiment(3, 2), Sentiment::Neutral); // 3 > 2+1 is false
        assert_eq!(decide_sentiment(4, 2), Sentiment::Negative);
        assert_eq!(decide_sentiment(2, 2), Sentiment::Neutral);
        assert_eq!(decide_sentiment(3, 4), Sentiment::Positive);
        assert_eq!(decide_sentiment(0, 1), Sentiment::Positive);
    }

    #[test]
    fn test_sentiment_boundary_from_text() {
        // "damaged" indicator (+2) and "bad" (+1) against "beautiful" and
        // "nice" (+1 each): 3 vs 2 stays neutral under the +1 margin
        let text = "the damaged fence was bad but the new mural is beautiful and nice";
        assert_eq!(sentiment_scores(text), (3, 2));
        assert_eq!(classify(text).sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_severity_clamps_high() {
        let result =
            classify("fire explosion gas leak flooding injured death emergency");
        assert_eq!(result.severity, 10);
    }

    #[test]
    fn test_severity_clamps_low() {
        let result = classify("minor small slight cosmetic occasional");
        assert_eq!(result.severity, 1);
    }

    #[test]
    fn test_classified_values_stay_in_range() {
        let samples = [
            POTHOLE,
            "Water main break on Oak Avenue - no water for 6 hours",
            "Construction noise starting at 5 AM every day",
            "thanks to the city the park is clean and beautiful now",
            "",
        ];
        for text in samples {
            let result = classify(text);
            assert!(is_known_category(&result.category));
            assert!((1..=10).contains(&result.severity));
            assert!(result.keywords.len() <= 5);
        }
    }

    #[test]
    fn test_keyword_frequency_beats_position() {
        let result = classify("tire tire tire pothole pothole curb lane gravel dust");
        assert_eq!(result.keywords[0], "tire");
        assert_eq!(result.keywords[1], "pothole");
        assert_eq!(result.keywords.len(), 5);
        // ties after the frequent pair keep first-occurrence order
        assert_eq!(&result.keywords[2..], ["curb", "lane", "gravel"]);
    }

    #[test]
    fn test_analyze_reports_matches_by_id() {
        let mut reports = vec![
            sample_report("reddit_a", POTHOLE, false),
            sample_report("reddit_b", "already done", true),
            sample_report("reddit_c", "broken elevator in my building", false),
        ];
        let updated = analyze_reports(&mut reports);
        assert_eq!(updated, 2);
        assert!(reports[0].analyzed);
        assert_eq!(reports[0].category.as_deref(), Some("Roads"));
        // untouched: was already analyzed
        assert!(reports[1].category.is_none());
        assert!(reports[2].analyzed);
        assert_eq!(reports[2].category.as_deref(), Some("Housing"));
        assert!(reports[2].severity.is_some());
    }

    fn sample_report(id: &str, text: &str, analyzed: bool) -> Report {
        Report {
            id: id.to_string(),
            text: text.to_string(),
            location: "New York, Brooklyn".to_string(),
            district: "Brooklyn".to_string(),
            coordinates: [40.7, -74.0],
            timestamp: "2025-06-01T12:00:00Z".to_string(),
            category: None,
            sentiment: None,
            emotion: None,
            severity: None,
            analyzed,
        }
    }
}
