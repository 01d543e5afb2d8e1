//! Preset/interactive launcher for bulk collection runs
//!
//! Thin configuration surface over the `collector` binary: picks a named
//! scenario (or builds a custom one interactively), shows an estimate,
//! asks for confirmation and spawns the collector, mirroring its exit code.

mod scenarios;

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::process::Command;

use scenarios::{find, RunPlan, SCENARIOS};

#[derive(Parser)]
#[command(name = "launcher")]
#[command(about = "Launch a bulk collection run from a named scenario")]
struct Args {
    /// Scenario to run (omit for the interactive menu)
    #[arg(long)]
    scenario: Option<String>,

    /// Run without the confirmation prompt
    #[arg(long)]
    no_confirm: bool,

    /// Log level passed through to the collector
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    shared::logging::init(args.log_level.as_deref());

    match &args.scenario {
        Some(key) => {
            let scenario = find(key)
                .with_context(|| format!("unknown scenario '{key}'"))?;
            let plan = RunPlan::from(scenario);
            if !args.no_confirm && !confirm(&plan)? {
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            run_plan(&plan).await
        }
        None => interactive().await,
    }
}

async fn interactive() -> anyhow::Result<ExitCode> {
    print_banner();
    print_scenarios();

    loop {
        println!("Options:");
        println!("  1. Pick a scenario");
        println!("  2. Custom configuration");
        println!("  3. Quit");

        match read_line("Choice (1-3): ")?.as_str() {
            "1" => {
                if let Some(plan) = pick_scenario()? {
                    if confirm(&plan)? {
                        return run_plan(&plan).await;
                    }
                    println!("Cancelled.");
                }
            }
            "2" => {
                if let Some(plan) = custom_plan()? {
                    if confirm(&plan)? {
                        return run_plan(&plan).await;
                    }
                    println!("Cancelled.");
                }
            }
            "3" => {
                println!("Bye.");
                return Ok(ExitCode::SUCCESS);
            }
            _ => println!("Please pick 1, 2 or 3."),
        }
    }
}

fn print_banner() {
    println!("============================================================");
    println!(" UN Comtrade bulk collection launcher");
    println!(" Global trade data, 2018-2024");
    println!("============================================================");
}

fn print_scenarios() {
    println!("\nAvailable scenarios:");
    for scenario in SCENARIOS {
        println!("  {:20} : {}", scenario.key, scenario.description);
        println!(
            "  {:20}   years {}-{}, items {}, delay {}s",
            "",
            scenario.start_year,
            scenario.end_year,
            scenario.items.join(", "),
            scenario.delay
        );
    }
    println!();
}

fn pick_scenario() -> anyhow::Result<Option<RunPlan>> {
    println!("\nScenarios:");
    for (index, scenario) in SCENARIOS.iter().enumerate() {
        println!("  {}. {} - {}", index + 1, scenario.key, scenario.description);
    }

    let choice = read_line(&format!("Choice (1-{}): ", SCENARIOS.len()))?;
    match choice.parse::<usize>() {
        Ok(index) if (1..=SCENARIOS.len()).contains(&index) => {
            Ok(Some(RunPlan::from(&SCENARIOS[index - 1])))
        }
        _ => {
            println!("Invalid choice.");
            Ok(None)
        }
    }
}

fn custom_plan() -> anyhow::Result<Option<RunPlan>> {
    let start_year: u16 = match read_line("Start year (2018-2024): ")?.parse() {
        Ok(year) => year,
        Err(_) => {
            println!("Please enter a number.");
            return Ok(None);
        }
    };
    let end_year: u16 = match read_line("End year (2018-2024): ")?.parse() {
        Ok(year) => year,
        Err(_) => {
            println!("Please enter a number.");
            return Ok(None);
        }
    };
    if !(2018..=2024).contains(&start_year) || !(2018..=2024).contains(&end_year) {
        println!("Years must be within 2018-2024.");
        return Ok(None);
    }
    if start_year > end_year {
        println!("Start year must not be after end year.");
        return Ok(None);
    }

    println!("Items (comma separated): {}", shared::group_keys().join(", "));
    let items: Vec<String> = read_line("Items: ")?
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| shared::group_keys().contains(&item.as_str()))
        .collect();
    if items.is_empty() {
        println!("Please pick at least one valid item.");
        return Ok(None);
    }

    let delay_input = read_line("Delay between requests in seconds (default 1.0): ")?;
    let delay = if delay_input.is_empty() {
        1.0
    } else {
        match delay_input.parse::<f64>() {
            Ok(delay) if delay >= 0.0 => delay,
            _ => {
                println!("Please enter a non-negative number.");
                return Ok(None);
            }
        }
    };

    Ok(Some(RunPlan {
        name: format!("Custom ({start_year}-{end_year})"),
        start_year,
        end_year,
        items,
        delay,
    }))
}

fn confirm(plan: &RunPlan) -> anyhow::Result<bool> {
    let (requests, duration) = plan.estimate();
    let minutes = duration.as_secs() / 60;

    println!("\nSelected: {}", plan.name);
    println!("  years:    {}-{}", plan.start_year, plan.end_year);
    println!("  items:    {}", plan.items.join(", "));
    println!("  requests: {requests}");
    println!("  estimated time: {}h {}m", minutes / 60, minutes % 60);
    println!("\nNote: some requests may fail due to API rate limits;");
    println!("failed units can be replayed later with retry-failed.");

    loop {
        match read_line("Proceed? (y/n): ")?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}

async fn run_plan(plan: &RunPlan) -> anyhow::Result<ExitCode> {
    let mut command = collector_command();
    command
        .arg("--start-year")
        .arg(plan.start_year.to_string())
        .arg("--end-year")
        .arg(plan.end_year.to_string())
        .arg("--items")
        .args(&plan.items)
        .arg("--delay")
        .arg(plan.delay.to_string());

    tracing::info!("Launching collector for '{}'", plan.name);
    let status = command
        .status()
        .await
        .context("spawning the collector binary")?;

    let code = status.code().unwrap_or(1);
    if code == 0 {
        println!("\nBulk collection completed successfully.");
    } else {
        println!("\nBulk collection exited with code {code}.");
    }
    Ok(ExitCode::from(code.clamp(0, u8::MAX as i32) as u8))
}

/// Prefer the collector binary installed next to this one; fall back to
/// `cargo run` for in-workspace use
fn collector_command() -> Command {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| Some(exe.parent()?.join("collector")))
        .filter(|path: &PathBuf| path.exists());

    match sibling {
        Some(path) => Command::new(path),
        None => {
            let mut command = Command::new("cargo");
            command.args(["run", "--quiet", "--bin", "collector", "--"]);
            command
        }
    }
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    stdout().flush()?;
    let mut line = String::new();
    stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
