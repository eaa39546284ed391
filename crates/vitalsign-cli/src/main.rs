//! vitalsign - replay telemetry through the monitoring core
//!
//! - `replay`: feed a JSON-lines sample file and print the final health report
//! - `score`: score a single metrics snapshot

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitalsign_core::{InsightConfig, MetricsSnapshot, ServiceMonitor};

mod output;
mod replay;

/// vitalsign CLI
#[derive(Parser)]
#[command(name = "vitalsign")]
#[command(about = "Anomaly detection, trend forecasting and health scoring for service telemetry", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML, YAML or JSON)
    #[arg(short, long, env = "VITALSIGN_CONFIG", global = true)]
    config: Option<String>,

    /// Log level
    #[arg(long, env = "VITALSIGN_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "VITALSIGN_LOG_JSON", global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines file of `{"metric": ..., "value": ...}` samples
    Replay {
        /// Sample file
        file: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Score one snapshot of the four service metrics
    Score {
        /// Failed requests as a fraction (0..1)
        #[arg(long, default_value = "0")]
        error_rate: f64,

        /// Response time in seconds
        #[arg(long, default_value = "0")]
        response_time: f64,

        /// Memory usage as percent of limit
        #[arg(long, default_value = "0")]
        memory_usage: f64,

        /// CPU usage percent
        #[arg(long, default_value = "0")]
        cpu_usage: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_string().into());

    // Logs go to stderr so stdout carries only the report.
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let config = InsightConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let monitor = ServiceMonitor::new(config).context("building monitor")?;

    match cli.command {
        Command::Replay { file, format } => {
            let summary = replay::replay_file(&monitor, &file)
                .with_context(|| format!("replaying {}", file))?;
            let report = monitor.health(summary.snapshot);
            output::print_report(&report, Some(&summary), format)?;
        }
        Command::Score {
            error_rate,
            response_time,
            memory_usage,
            cpu_usage,
            format,
        } => {
            let snapshot = MetricsSnapshot::new(error_rate, response_time, memory_usage, cpu_usage);
            let report = monitor.health(snapshot);
            output::print_report(&report, None, format)?;
        }
    }

    Ok(())
}
