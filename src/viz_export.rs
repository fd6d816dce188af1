//! Emit the dashboard's data files: stat-card summary, chart histograms,
//! district stats, map markers, suggested actions, and a manifest.

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::models::{DistrictStats, Report};
use crate::solutions::Solution;

/* -------------------------------------------------------------------------- */
/* Entry point                                                                */
/* -------------------------------------------------------------------------- */

/// Write the full visualization bundle into `out_dir`.
pub fn write_all_viz(
    out_dir: &Path,
    reports: &[Report],
    stats: &[DistrictStats],
    solutions: &[Solution],
) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;

    let summary = build_summary(reports);
    write_json(out_dir.join("viz.summary.json"), &summary)?;

    write_json(out_dir.join("viz.districts.json"), &stats)?;

    let categories = build_histogram(&summary.categories);
    write_json(out_dir.join("viz.categories.json"), &categories)?;

    let sentiments = build_histogram(&summary.sentiments);
    write_json(out_dir.join("viz.sentiments.json"), &sentiments)?;

    let severity = build_severity_histogram(reports);
    write_json(out_dir.join("viz.severity.json"), &severity)?;

    let markers = build_markers(reports);
    write_json(out_dir.join("viz.map.json"), &markers)?;

    write_json(out_dir.join("viz.solutions.json"), &solutions)?;

    let idx = json!({
        "version": 1,
        "counts": {
            "reports": reports.len(),
            "analyzed": summary.analyzed,
            "districts": stats.len(),
            "solutions": solutions.len(),
        },
        "files": [
            "viz.summary.json",
            "viz.districts.json",
            "viz.categories.json",
            "viz.sentiments.json",
            "viz.severity.json",
            "viz.map.json",
            "viz.solutions.json"
        ]
    });
    write_json(out_dir.join("viz.index.json"), &idx)?;

    Ok(())
}

fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .map(|_| ())
        .map_err(|e| e.into())
}

/* -------------------------------------------------------------------------- */
/* Summary (stat cards)                                                       */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
struct VSummary {
    total_reports: usize,
    analyzed: usize,
    districts: usize,
    categories: BTreeMap<String, u32>,
    sentiments: BTreeMap<String, u32>,
}

fn build_summary(reports: &[Report]) -> VSummary {
    let mut categories: BTreeMap<String, u32> = BTreeMap::new();
    let mut sentiments: BTreeMap<String, u32> = BTreeMap::new();
    let mut districts: BTreeSet<&str> = BTreeSet::new();

    for report in reports {
        districts.insert(report.district.as_str());
        if let Some(category) = &report.category {
            *categories.entry(category.clone()).or_insert(0) += 1;
        }
        if let Some(sentiment) = report.sentiment {
            *sentiments.entry(sentiment.as_str().to_string()).or_insert(0) += 1;
        }
    }

    VSummary {
        total_reports: reports.len(),
        analyzed: reports.iter().filter(|r| r.analyzed).count(),
        districts: districts.len(),
        categories,
        sentiments,
    }
}

/* -------------------------------------------------------------------------- */
/* Chart histograms                                                           */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
struct VBar {
    name: String,
    count: u32,
}

fn build_histogram(counts: &BTreeMap<String, u32>) -> Vec<VBar> {
    counts
        .iter()
        .map(|(name, &count)| VBar {
            name: name.clone(),
            count,
        })
        .sorted_by_key(|b| std::cmp::Reverse(b.count))
        .collect()
}

/// Fixed 1..=10 buckets so the chart axis is stable even when empty.
fn build_severity_histogram(reports: &[Report]) -> Vec<VBar> {
    let mut buckets = [0u32; 10];
    for report in reports {
        if let Some(severity) = report.severity {
            if (1..=10).contains(&severity) {
                buckets[severity as usize - 1] += 1;
            }
        }
    }
    buckets
        .iter()
        .enumerate()
        .map(|(i, &count)| VBar {
            name: (i + 1).to_string(),
            count,
        })
        .collect()
}

/* -------------------------------------------------------------------------- */
/* Map markers                                                                */
/* -------------------------------------------------------------------------- */

const SNIPPET_CHARS: usize = 120;

#[derive(Debug, Serialize)]
struct VMarker {
    id: String,
    lat: f64,
    lng: f64,
    district: String,
    category: Option<String>,
    sentiment: Option<String>,
    severity: Option<u8>,
    snippet: String,
}

/// Marker positions are jittered city-center coordinates, not geocoded
/// locations; consumers must not treat them as authoritative.
fn build_markers(reports: &[Report]) -> Vec<VMarker> {
    reports
        .iter()
        .map(|report| VMarker {
            id: report.id.clone(),
            lat: report.coordinates[0],
            lng: report.coordinates[1],
            district: report.district.clone(),
            category: report.category.clone(),
            sentiment: report.sentiment.map(|s| s.as_str().to_string()),
            severity: report.severity,
            snippet: report.text.chars().take(SNIPPET_CHARS).collect(),
        })
        .collect()
}
