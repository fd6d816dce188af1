mod api_types;
mod classify;
mod export;
mod fetch;
mod ingest;
mod models;
mod orchestrator;
mod solutions;
mod stats;
mod store;
mod taxonomy;
mod viz_export;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use crate::ingest::DistrictFallback;
use crate::models::ReportFilters;
use crate::orchestrator::RunOptions;
use crate::store::Store;

/// Street Voice - city issue reports dashboard data generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the local report store (default: "data")
    #[arg(short, long, default_value = "data")]
    data_dir: String,

    /// Output directory for the dashboard view bundle (default: "out")
    #[arg(short, long, default_value = "out")]
    output_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch new posts, ingest them, and regenerate the dashboard bundle
    Run {
        /// Use the built-in fixture batch instead of hitting the network
        #[arg(long)]
        mock: bool,

        /// Skip the classification pass over unanalyzed reports
        #[arg(long)]
        no_analyze: bool,

        /// District assignment when no district name occurs in the text
        #[arg(long, value_enum, default_value = "random")]
        unresolved_district: DistrictArg,

        /// Seed for jitter and district randomness (reproducible ingestion)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Classify stored reports that have not been analyzed yet
    Analyze,

    /// Regenerate the view bundle from stored reports, optionally filtered
    Views {
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long, default_value = "all")]
        sentiment: String,
        #[arg(long, default_value = "all")]
        district: String,
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Write an export document with all stored reports
    Export {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace the stored reports with the contents of an export document
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete the local report store
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DistrictArg {
    Random,
    Unknown,
}

impl From<DistrictArg> for DistrictFallback {
    fn from(value: DistrictArg) -> Self {
        match value {
            DistrictArg::Random => DistrictFallback::Random,
            DistrictArg::Unknown => DistrictFallback::Unknown,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    let args = Args::parse();
    let store = Store::new(&args.data_dir);
    let out_dir = PathBuf::from(&args.output_dir);

    match args.command {
        Command::Run {
            mock,
            no_analyze,
            unresolved_district,
            seed,
        } => {
            let opts = RunOptions {
                mock,
                analyze: !no_analyze,
                fallback: unresolved_district.into(),
                seed,
            };
            orchestrator::run(&store, &out_dir, &opts).await
        }

        Command::Analyze => orchestrator::run_analyze(&store, &out_dir),

        Command::Views {
            category,
            sentiment,
            district,
            search,
        } => {
            let filters = ReportFilters {
                category,
                sentiment,
                district,
                search,
            };
            orchestrator::run_views(&store, &out_dir, &filters)
        }

        Command::Export { file } => {
            let reports = store.load();
            export::write_export(&file, &reports)?;
            info!(
                "Export written - file={}, reports={}",
                file.display(),
                reports.len()
            );
            Ok(())
        }

        Command::Import { file } => {
            let reports = export::read_import(&file)?;
            store.save(&reports)?;
            orchestrator::run_views(&store, &out_dir, &ReportFilters::default())?;
            info!(
                "Import applied - file={}, reports={}",
                file.display(),
                reports.len()
            );
            Ok(())
        }

        Command::Clear => {
            store.clear()?;
            info!("Report store cleared - directory={}", args.data_dir);
            Ok(())
        }
    }
}
