//! Retry binary entry point: replays failed units from a collection summary

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use collector::{ComtradeClient, OutputSink, RealThrottle, ResumeDriver, RetryOptions, UnitExecutor};

#[derive(Parser)]
#[command(name = "retry-failed")]
#[command(about = "Retry the failed units recorded in a collection summary")]
struct Args {
    /// Collection summary JSON produced by a prior bulk run
    #[arg(long)]
    summary_file: PathBuf,

    /// Only retry these commodity groups or concrete keys
    #[arg(long, num_args = 1..)]
    items: Vec<String>,

    /// Attempts per unit before marking it still-failed
    #[arg(long, default_value_t = 2)]
    max_retries: u32,

    /// Delay between attempts and between units, in seconds
    #[arg(long, default_value_t = 2.0)]
    delay: f64,

    /// Directory for the retry results ledger
    #[arg(long, default_value = "./data/output")]
    output_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    shared::logging::init(args.log_level.as_deref());

    if !args.delay.is_finite() || args.delay < 0.0 {
        anyhow::bail!("delay must be a non-negative number of seconds");
    }

    let sink = OutputSink::new(&args.output_dir);
    sink.ensure_output_dir()
        .await
        .with_context(|| format!("creating output directory {}", args.output_dir.display()))?;

    let api = Arc::new(ComtradeClient::new(std::env::var("COMTRADE_API_KEY").ok()));
    let driver = ResumeDriver::new(UnitExecutor::new(api), sink, Arc::new(RealThrottle));

    let options = RetryOptions {
        summary_file: args.summary_file,
        items: (!args.items.is_empty()).then_some(args.items),
        max_attempts: args.max_retries,
        delay: Duration::from_secs_f64(args.delay),
    };
    driver.retry(&options).await?;

    Ok(())
}
