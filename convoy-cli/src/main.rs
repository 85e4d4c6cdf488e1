//! Convoy CLI
//!
//! Demo front end for the pipeline engine: runs a small mix of callable
//! and command-line units with a live spinner list, prints the message
//! report, and exits with the aggregate code.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use convoy_pipeline::{CancelToken, Config, Pipeline, WorkUnit, report};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Run a demo work-unit pipeline", long_about = None)]
struct Cli {
    /// Max number of units to run concurrently (unbounded if unset)
    #[arg(short = 'j', long, env = "CONVOY_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Milliseconds between rendered frames
    #[arg(long, env = "CONVOY_RENDER_INTERVAL_MS", default_value_t = 80)]
    render_interval_ms: u64,

    /// Commands to run as units; defaults to a built-in demo set
    #[arg(trailing_var_arg = true)]
    commands: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convoy_pipeline=warn,convoy_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new()
        .with_max_concurrency(cli.max_concurrency)
        .with_render_interval(Duration::from_millis(cli.render_interval_ms));
    config.validate().context("invalid configuration")?;

    let units = if cli.commands.is_empty() {
        demo_units()
    } else {
        cli.commands
            .iter()
            .map(|command| WorkUnit::shell(command.clone()).label(command.clone()))
            .collect()
    };

    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, letting in-flight units finish");
            signal_token.cancel();
        }
    });

    let pipeline = Pipeline::new(config);
    let results = pipeline.run_with_cancel(units, cancel).await?;

    report::print_summary(&results);

    let failed = results.iter().filter(|result| result.failed()).count();
    if failed > 0 {
        println!(
            "{}",
            format!("{failed} of {} unit(s) failed", results.len()).red()
        );
        return Ok(ExitCode::FAILURE);
    }

    info!("all {} unit(s) finished", results.len());
    Ok(ExitCode::SUCCESS)
}

/// The built-in demo: a slow success, a warning, an explicit failure, and
/// two command-line units
fn demo_units() -> Vec<WorkUnit> {
    vec![
        WorkUnit::call(|_| {
            std::thread::sleep(Duration::from_secs(2));
            Ok(true)
        })
        .label("Compile sources"),
        WorkUnit::call(|unit| {
            std::thread::sleep(Duration::from_secs(1));
            unit.add_warning("3 tests skipped");
            Ok(true)
        })
        .label("Run test suite"),
        WorkUnit::call(|unit| {
            std::thread::sleep(Duration::from_millis(500));
            unit.add_error("registry unreachable");
            Ok(true)
        })
        .label("Publish artifacts"),
        WorkUnit::shell("echo convoy").label("Print banner"),
        WorkUnit::command(["sleep", "1"]).label("Cool down"),
    ]
}
