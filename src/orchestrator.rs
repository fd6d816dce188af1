//! End-to-end pipeline: load the store, fetch or mock a batch, ingest and
//! merge it, run the analysis pass, and regenerate the dashboard bundle.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use crate::classify::analyze_reports;
use crate::fetch::{mock_posts, RedditClient};
use crate::ingest::{ingest_posts, merge, DistrictFallback, Normalizer};
use crate::models::{Report, ReportFilters};
use crate::solutions::{batch_solutions, city_wide_solutions};
use crate::stats::{district_stats, filter_reports};
use crate::store::Store;
use crate::viz_export::write_all_viz;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mock: bool,
    pub analyze: bool,
    pub fallback: DistrictFallback,
    pub seed: Option<u64>,
}

pub async fn run(store: &Store, out_dir: &Path, opts: &RunOptions) -> Result<()> {
    let pipeline_start = std::time::Instant::now();
    info!(
        "Pipeline started - mock={}, analyze={}, fallback={:?}",
        opts.mock, opts.analyze, opts.fallback
    );

    // 1) existing records
    let mut reports = store.load();
    info!("Loaded report store - reports={}", reports.len());
    if let Some(when) = store.last_update() {
        info!("Last store update - at={}", when.to_rfc3339());
    }

    // 2) fetch one batch of raw posts
    let fetch_start = std::time::Instant::now();
    let raw_posts = if opts.mock {
        let posts = mock_posts();
        info!("Using mock posts - posts={}", posts.len());
        posts
    } else {
        let mut client = RedditClient::new()?;
        client.collect_city_posts().await
    };
    info!(
        "Fetch completed - duration={:.1}s, posts={}",
        fetch_start.elapsed().as_secs_f32(),
        raw_posts.len()
    );

    // 3) relevance filter + normalization
    let mut normalizer = match opts.seed {
        Some(seed) => Normalizer::with_seed(opts.fallback, seed),
        None => Normalizer::new(opts.fallback),
    };
    let incoming = ingest_posts(&mut normalizer, &raw_posts);
    info!(
        "Ingestion completed - relevant={}, dropped={}",
        incoming.len(),
        raw_posts.len() - incoming.len()
    );

    // 4) cross-batch merge, dedup by id
    let before = reports.len();
    reports = merge(&reports, &incoming);
    info!(
        "Merge completed - added={}, total={}",
        reports.len() - before,
        reports.len()
    );

    // 5) classification pass over unanalyzed records
    if opts.analyze {
        let analyze_start = std::time::Instant::now();
        let updated = analyze_reports(&mut reports);
        info!(
            "Analysis completed - duration={:.2}s, analyzed={}, total={}",
            analyze_start.elapsed().as_secs_f32(),
            updated,
            reports.len()
        );
    }

    // 6) views
    write_views(out_dir, &reports)?;

    // 7) persist, best effort
    if let Err(err) = store.save(&reports) {
        warn!("Failed saving report store - error={err:#}");
    }

    info!(
        "Pipeline completed - total_duration={:.1}s, reports={}",
        pipeline_start.elapsed().as_secs_f32(),
        reports.len()
    );
    Ok(())
}

/// Classify whatever the store holds unanalyzed, then save.
pub fn run_analyze(store: &Store, out_dir: &Path) -> Result<()> {
    let mut reports = store.load();
    let updated = analyze_reports(&mut reports);
    info!(
        "Analysis completed - analyzed={}, total={}",
        updated,
        reports.len()
    );
    write_views(out_dir, &reports)?;
    store.save(&reports)?;
    Ok(())
}

/// Regenerate the view bundle from the stored reports, optionally filtered.
pub fn run_views(store: &Store, out_dir: &Path, filters: &ReportFilters) -> Result<()> {
    let reports = store.load();
    let filtered = filter_reports(&reports, filters);
    info!(
        "Views filter - selected={}, total={}",
        filtered.len(),
        reports.len()
    );
    write_views(out_dir, &filtered)
}

fn write_views(out_dir: &Path, reports: &[Report]) -> Result<()> {
    let stats = district_stats(reports);
    let mut solutions = batch_solutions(reports);
    solutions.extend(city_wide_solutions(reports));
    write_all_viz(out_dir, reports, &stats, &solutions)?;
    info!(
        "View bundle written - directory={}, districts={}, solutions={}",
        out_dir.display(),
        stats.len(),
        solutions.len()
    );
    Ok(())
}
