//! Splunk MCP server - Model Context Protocol tools for Splunk Enterprise.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables into a `Config`.
//! - Install logging (stderr), optional OTLP export and the Prometheus exporter.
//! - Serve the Splunk tools over JSON-RPC on stdin/stdout.
//!
//! Does NOT handle:
//! - Splunk REST semantics (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values reach clap's env defaults.
//! - Nothing but protocol messages is written to stdout.
//! - A failing tool never stops the server; only startup errors exit non-zero.

mod args;
mod jsonrpc;
mod resources;
mod server;
mod tools;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use server::McpServer;
use splunk_client::metrics_exporter::MetricsExporter;
use splunk_client::tracing::TracingConfig;
use splunk_client::{MetricsCollector, SplunkService};
use splunk_config::ConfigLoader;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    let loader = ConfigLoader::new()
        .load_dotenv()
        .context("Failed to load environment")?;

    let cli = Cli::parse();

    let mut tracing_config = TracingConfig::new().with_json(cli.log_json);
    if let Some(ref endpoint) = cli.otlp_endpoint {
        tracing_config = tracing_config.with_otlp_endpoint(endpoint);
    }
    if let Some(ref name) = cli.otel_service_name {
        tracing_config = tracing_config.with_service_name(name);
    }
    let tracing_guard = tracing_config
        .init()
        .context("Failed to initialize tracing")?;

    let metrics = match cli.metrics_bind {
        Some(ref bind_addr) => {
            MetricsExporter::install(bind_addr).context("Failed to start metrics exporter")?;
            MetricsCollector::new()
        }
        None => MetricsCollector::disabled(),
    };

    let loader = loader
        .from_env()
        .context("Failed to load configuration from environment")?;
    let config = cli
        .apply_overrides(loader)
        .build()
        .context("Failed to build configuration")?;

    let service = SplunkService::from_config(&config, metrics)
        .context("Failed to create Splunk client")?;
    info!(
        base_url = %config.connection.base_url,
        max_attempts = config.poll.max_attempts,
        interval_ms = config.poll.interval.as_millis() as u64,
        "Serving Splunk tools on stdio"
    );

    let result = McpServer::new(service)
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Protocol stream failed");

    info!("Input closed, shutting down");
    tracing_guard.shutdown();
    result
}
