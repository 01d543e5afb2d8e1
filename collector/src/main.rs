//! Bulk collection binary entry point

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use collector::{
    ComtradeClient, CoordinateResolver, FlowBuilder, OutputSink, PlanRunner, RealThrottle,
    RunConfig, UnitExecutor,
};

#[derive(Parser)]
#[command(name = "collector")]
#[command(about = "Bulk trade-flow collector for the UN Comtrade API")]
struct Args {
    /// First year to collect (inclusive)
    #[arg(long, default_value_t = 2018)]
    start_year: u16,

    /// Last year to collect (inclusive)
    #[arg(long, default_value_t = 2024)]
    end_year: u16,

    /// Commodity groups or concrete keys (default: all groups)
    #[arg(long, num_args = 1..)]
    items: Vec<String>,

    /// Delay between API requests, in seconds
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Directory for per-unit artifacts and the run ledger
    #[arg(long, default_value = "./data/output")]
    output_dir: PathBuf,

    /// Country reference dataset (GeoJSON FeatureCollection)
    #[arg(long, default_value = "./data/reference/countries.geojson")]
    countries_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    shared::logging::init(args.log_level.as_deref());

    if args.start_year > args.end_year {
        anyhow::bail!("start year must not be after end year");
    }
    if !args.delay.is_finite() || args.delay < 0.0 {
        anyhow::bail!("delay must be a non-negative number of seconds");
    }
    if args.end_year > 2024 {
        tracing::warn!("Data beyond 2024 may not be available yet");
    }

    let items = if args.items.is_empty() {
        shared::group_keys().iter().map(|s| s.to_string()).collect()
    } else {
        args.items.clone()
    };

    let sink = OutputSink::new(&args.output_dir);
    sink.ensure_output_dir()
        .await
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;

    let resolver = CoordinateResolver::load(&args.countries_file)
        .await
        .context("loading country reference data")?;
    tracing::info!("Country coordinates loaded: {} keys", resolver.len());

    let api = Arc::new(ComtradeClient::new(std::env::var("COMTRADE_API_KEY").ok()));
    let runner = PlanRunner::new(
        UnitExecutor::new(api),
        FlowBuilder::new(Arc::new(resolver)),
        sink,
        Arc::new(RealThrottle),
    );

    let config = RunConfig::new(
        args.start_year,
        args.end_year,
        items,
        Duration::from_secs_f64(args.delay),
    );
    let ledger = runner.run(&config).await?;

    if ledger.total_successful > 0 {
        tracing::info!("Bulk collection completed; results in {}", args.output_dir.display());
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("Bulk collection produced no successful units");
        Ok(ExitCode::FAILURE)
    }
}
