//! View-side aggregation: user filters over the report set and per-district
//! statistics.

use std::collections::{BTreeMap, HashMap};

use crate::models::{DistrictStats, Report, ReportFilters};

fn wildcard(value: &str) -> bool {
    value.is_empty() || value == "all"
}

fn passes(report: &Report, filters: &ReportFilters) -> bool {
    let category_ok = wildcard(&filters.category)
        || report.category.as_deref() == Some(filters.category.as_str());
    let sentiment_ok = wildcard(&filters.sentiment)
        || report
            .sentiment
            .map(|s| s.as_str() == filters.sentiment)
            .unwrap_or(false);
    let district_ok = wildcard(&filters.district) || report.district == filters.district;
    let search_ok = filters.search.is_empty()
        || report
            .text
            .to_lowercase()
            .contains(&filters.search.to_lowercase());

    category_ok && sentiment_ok && district_ok && search_ok
}

/// All four predicates are independent and ANDed.
pub fn filter_reports(reports: &[Report], filters: &ReportFilters) -> Vec<Report> {
    reports
        .iter()
        .filter(|r| passes(r, filters))
        .cloned()
        .collect()
}

/// Group reports by district in first-seen order. Reports without a category
/// or sentiment are counted in the total but excluded from that histogram;
/// the representative coordinate is the district's first-seen report.
pub fn district_stats(reports: &[Report]) -> Vec<DistrictStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<DistrictStats> = Vec::new();

    for report in reports {
        let i = match index.get(report.district.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(report.district.as_str(), stats.len());
                stats.push(DistrictStats {
                    district: report.district.clone(),
                    total_reports: 0,
                    categories: BTreeMap::new(),
                    sentiments: BTreeMap::new(),
                    coordinates: report.coordinates,
                });
                stats.len() - 1
            }
        };

        let entry = &mut stats[i];
        entry.total_reports += 1;
        if let Some(category) = &report.category {
            *entry.categories.entry(category.clone()).or_insert(0) += 1;
        }
        if let Some(sentiment) = report.sentiment {
            *entry
                .sentiments
                .entry(sentiment.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    fn report(
        id: &str,
        district: &str,
        category: Option<&str>,
        sentiment: Option<Sentiment>,
        text: &str,
    ) -> Report {
        Report {
            id: id.to_string(),
            text: text.to_string(),
            location: format!("New York, {district}"),
            district: district.to_string(),
            coordinates: [40.7, -74.0],
            timestamp: "2025-06-01T12:00:00Z".to_string(),
            category: category.map(str::to_string),
            sentiment,
            emotion: None,
            severity: None,
            analyzed: category.is_some(),
        }
    }

    fn sample() -> Vec<Report> {
        vec![
            report("1", "Brooklyn", Some("Roads"), Some(Sentiment::Negative), "pothole on 5th"),
            report("2", "Brooklyn", Some("Transport"), Some(Sentiment::Neutral), "bus rerouted"),
            report("3", "Queens", Some("Roads"), Some(Sentiment::Negative), "cracked sidewalk"),
            report("4", "Queens", None, None, "not analyzed yet"),
        ]
    }

    #[test]
    fn test_single_active_filter_selects_exact_subset() {
        let filters = ReportFilters {
            category: "Roads".to_string(),
            ..ReportFilters::default()
        };
        let out = filter_reports(&sample(), &filters);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_filters_are_anded() {
        let filters = ReportFilters {
            category: "Roads".to_string(),
            district: "Queens".to_string(),
            ..ReportFilters::default()
        };
        let out = filter_reports(&sample(), &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filters = ReportFilters {
            search: "POTHOLE".to_string(),
            ..ReportFilters::default()
        };
        let out = filter_reports(&sample(), &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "1");
    }

    #[test]
    fn test_wildcard_and_empty_are_inactive() {
        assert_eq!(filter_reports(&sample(), &ReportFilters::default()).len(), 4);
        let empty = ReportFilters {
            category: String::new(),
            sentiment: String::new(),
            district: String::new(),
            search: String::new(),
        };
        assert_eq!(filter_reports(&sample(), &empty).len(), 4);
    }

    #[test]
    fn test_unanalyzed_reports_fail_value_filters() {
        let filters = ReportFilters {
            sentiment: "negative".to_string(),
            ..ReportFilters::default()
        };
        let out = filter_reports(&sample(), &filters);
        assert!(out.iter().all(|r| r.sentiment == Some(Sentiment::Negative)));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_district_stats_groups_and_counts() {
        let stats = district_stats(&sample());
        assert_eq!(stats.len(), 2);

        // first-seen order
        assert_eq!(stats[0].district, "Brooklyn");
        assert_eq!(stats[1].district, "Queens");

        assert_eq!(stats[0].total_reports, 2);
        assert_eq!(stats[0].categories["Roads"], 1);
        assert_eq!(stats[0].categories["Transport"], 1);
        assert_eq!(stats[0].sentiments["negative"], 1);

        // unanalyzed report counts toward the total but not the histograms
        assert_eq!(stats[1].total_reports, 2);
        assert_eq!(stats[1].categories.len(), 1);
        assert_eq!(stats[1].sentiments.len(), 1);
    }

    #[test]
    fn test_district_stats_representative_coordinate_is_first_seen() {
        let mut reports = sample();
        reports[0].coordinates = [40.65, -73.95];
        reports[1].coordinates = [40.7, -73.99];
        let stats = district_stats(&reports);
        assert_eq!(stats[0].coordinates, [40.65, -73.95]);
    }
}
