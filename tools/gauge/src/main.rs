//! gauge - ClearFlow operator CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use common::shutdown::shutdown_token;
use gauge::render::render_assessment;
use gauge::sender::{run_sender, SendMode};
use gauge::{poll_once, GaugeClient, Poller, DEFAULT_INTERVAL_MS, DEFAULT_SERVER_URL};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gauge")]
#[command(about = "ClearFlow water-quality operator CLI")]
#[command(long_about = "ClearFlow water-quality operator CLI

Commands:
  watch     Live dashboard, refreshed on a fixed interval
  status    Fetch and classify the current readings once
  send      Post mock sensor readings

Examples:
  gauge watch --interval-ms 1000
  gauge status --json
  gauge send --count 10
  gauge send --legacy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the wqsrv service
    #[arg(short, long, global = true, env = "GAUGE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the service and redraw the dashboard until Ctrl+C
    Watch {
        /// Poll period in milliseconds
        #[arg(long, env = "GAUGE_INTERVAL_MS", default_value_t = DEFAULT_INTERVAL_MS)]
        interval_ms: u64,
    },

    /// Print the current assessment once
    Status {
        /// Emit JSON instead of the dashboard
        #[arg(long)]
        json: bool,
    },

    /// Post mock readings like a field device
    Send {
        /// Use the legacy /api/data endpoint
        #[arg(long)]
        legacy: bool,

        /// Number of readings to send (runs until Ctrl+C when omitted)
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Send period in milliseconds
        #[arg(long, env = "GAUGE_INTERVAL_MS", default_value_t = DEFAULT_INTERVAL_MS)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    let client = GaugeClient::new(&cli.server).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Watch { interval_ms } => {
            let poller = Poller::new(client, Duration::from_millis(interval_ms.max(1)));
            let stats = poller
                .run(shutdown_token(), |assessment| {
                    println!("{}", render_assessment(assessment));
                })
                .await;
            println!(
                "{} {} polls, {} failed",
                "Stopped".bright_cyan(),
                stats.succeeded + stats.failed,
                stats.failed
            );
        },
        Commands::Status { json } => {
            let assessment = poll_once(&client)
                .await
                .with_context(|| format!("Failed to query {}", client.base_url()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print!("{}", render_assessment(&assessment));
            }
        },
        Commands::Send {
            legacy,
            count,
            interval_ms,
        } => {
            let mode = if legacy {
                SendMode::Legacy
            } else {
                SendMode::Split
            };
            let delivered = run_sender(
                &client,
                mode,
                Duration::from_millis(interval_ms.max(1)),
                count,
                shutdown_token(),
            )
            .await;
            println!("{} {} readings delivered", "Done".green(), delivered);
        },
    }

    Ok(())
}
