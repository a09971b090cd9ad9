//! Shared helpers for splunk-mcp integration tests.
//!
//! Invariants / Assumptions:
//! - Commands are hermetic: `.env` loading is disabled and host `SPLUNK_*`
//!   variables are cleared.
//! - The base URL points at a closed local port, so any tool that reaches
//!   Splunk fails fast instead of hanging.

use assert_cmd::Command;
use serde_json::Value;

/// Returns a hermetic `splunk-mcp` command with a dummy API token.
pub fn mcp_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("splunk-mcp");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("SPLUNK_BASE_URL")
        .env_remove("SPLUNK_HOST")
        .env_remove("SPLUNK_USERNAME")
        .env_remove("SPLUNK_PASSWORD")
        .env_remove("SPLUNK_OTLP_ENDPOINT")
        .env_remove("SPLUNK_METRICS_BIND");

    cmd.env("SPLUNK_BASE_URL", "http://127.0.0.1:9")
        .env("SPLUNK_API_TOKEN", "test-token")
        .env("SPLUNK_TIMEOUT", "2");

    cmd
}

/// Parse every stdout line as a JSON-RPC message.
pub fn parse_replies(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

/// The reply whose id equals `id`.
pub fn reply_for(replies: &[Value], id: i64) -> &Value {
    replies
        .iter()
        .find(|r| r["id"].as_i64() == Some(id))
        .unwrap_or_else(|| panic!("no reply with id {id}: {replies:?}"))
}

/// Decoded JSON of a tool reply's text content.
pub fn extract_tool_text(reply: &Value) -> Value {
    let text = reply["result"]["content"][0]["text"]
        .as_str()
        .expect("result.content[0].text");
    serde_json::from_str(text).expect("tool text is JSON")
}
