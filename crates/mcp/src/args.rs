//! Command-line arguments of the server binary.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Mirror every `SPLUNK_*` setting as a flag so either source works.
//! - Fold the flags into a `ConfigLoader` as overrides.
//!
//! Non-responsibilities:
//! - Does not read the environment itself; `ConfigLoader::from_env` does.

use std::time::Duration;

use clap::Parser;
use splunk_config::ConfigLoader;

#[derive(Debug, Parser)]
#[command(name = "splunk-mcp")]
#[command(about = "MCP server exposing Splunk search and metadata tools over stdio", long_about = None)]
#[command(version)]
#[command(
    after_help = "The server speaks line-delimited JSON-RPC on stdin/stdout. Logs go to stderr.\n\nExamples:\n  SPLUNK_BASE_URL=https://splunk:8089 SPLUNK_API_TOKEN=... splunk-mcp\n  splunk-mcp --host splunk.internal --username admin --password changeme\n  RUST_LOG=splunk_client=debug splunk-mcp --metrics-bind 127.0.0.1:9090\n"
)]
pub struct Cli {
    /// Base URL of the Splunk management endpoint (e.g., https://localhost:8089)
    #[arg(short, long, env = "SPLUNK_BASE_URL")]
    pub base_url: Option<String>,

    /// Splunk host, used when no base URL is given
    #[arg(long, env = "SPLUNK_HOST")]
    pub host: Option<String>,

    /// Management port used with --host
    #[arg(long, env = "SPLUNK_PORT")]
    pub port: Option<u16>,

    /// URL scheme used with --host
    #[arg(long, env = "SPLUNK_SCHEME")]
    pub scheme: Option<String>,

    /// Username for session authentication
    #[arg(short, long, env = "SPLUNK_USERNAME")]
    pub username: Option<String>,

    /// Password for session authentication
    #[arg(short, long, env = "SPLUNK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// API token (preferred over username/password)
    #[arg(short, long, env = "SPLUNK_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SPLUNK_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, env = "SPLUNK_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Number of result polls before a search is reported as timed out
    #[arg(long, env = "SPLUNK_POLL_MAX_ATTEMPTS")]
    pub poll_max_attempts: Option<u32>,

    /// Milliseconds between result polls
    #[arg(long, env = "SPLUNK_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// End a search on the first connection-level poll failure instead of retrying
    #[arg(long, env = "SPLUNK_POLL_ABORT_ON_TRANSPORT_ERROR")]
    pub poll_abort_on_transport_error: bool,

    /// OTLP endpoint for span export (e.g., http://localhost:4317)
    #[arg(long, env = "SPLUNK_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Service name reported with exported spans
    #[arg(long, env = "OTEL_SERVICE_NAME")]
    pub otel_service_name: Option<String>,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, env = "SPLUNK_METRICS_BIND")]
    pub metrics_bind: Option<String>,

    /// Write log lines to stderr as JSON
    #[arg(long, env = "SPLUNK_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Layer the explicit flags over whatever `loader` already holds.
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> ConfigLoader {
        if let Some(ref url) = self.base_url {
            loader = loader.with_base_url(url.clone());
        }
        if let Some(ref host) = self.host {
            loader = loader.with_host(host.clone());
        }
        if let Some(port) = self.port {
            loader = loader.with_port(port);
        }
        if let Some(ref scheme) = self.scheme {
            loader = loader.with_scheme(scheme.clone());
        }
        if let Some(ref username) = self.username {
            loader = loader.with_username(username.clone());
        }
        if let Some(ref password) = self.password {
            loader = loader.with_password(password.clone());
        }
        if let Some(ref token) = self.api_token {
            loader = loader.with_api_token(token.clone());
        }
        if let Some(timeout_secs) = self.timeout {
            loader = loader.with_timeout(Duration::from_secs(timeout_secs));
        }
        if self.skip_verify {
            loader = loader.with_skip_verify(true);
        }
        if let Some(attempts) = self.poll_max_attempts {
            loader = loader.with_poll_max_attempts(attempts);
        }
        if let Some(interval_ms) = self.poll_interval_ms {
            loader = loader.with_poll_interval(Duration::from_millis(interval_ms));
        }
        if self.poll_abort_on_transport_error {
            loader = loader.with_poll_abort_on_transport_fault(true);
        }
        loader
    }
}
