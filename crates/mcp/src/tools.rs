//! The MCP tool surface.
//!
//! Responsibilities:
//! - Name and describe every tool, including its JSON input schema.
//! - Decode tool arguments, applying the documented defaults.
//! - Route each call to the matching `SplunkService` operation.
//!
//! Does NOT handle:
//! - JSON-RPC framing or task scheduling (see `server`).
//!
//! Invariants:
//! - A Splunk-side failure is a normal answer with `success: false`. Only a
//!   malformed call (unknown tool, bad arguments) is a `ToolCallError`.

use std::num::NonZeroU64;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use splunk_client::{CancellationToken, SearchRequest, SplunkService, Transport};
use splunk_config::constants::{
    DEFAULT_EARLIEST_TIME, DEFAULT_ERROR_SEARCH_INDEX, DEFAULT_ERROR_SEARCH_MAX_COUNT,
    DEFAULT_KNOWLEDGE_OBJECT_COUNT, DEFAULT_LATEST_TIME, DEFAULT_MAX_COUNT,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    SearchSplunk,
    GetSplunkIndexes,
    GetLogStats,
    SearchErrors,
    GetKnowledgeObjects,
    GetAllUsers,
    GetUserInfo,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::SearchSplunk,
        Tool::GetSplunkIndexes,
        Tool::GetLogStats,
        Tool::SearchErrors,
        Tool::GetKnowledgeObjects,
        Tool::GetAllUsers,
        Tool::GetUserInfo,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Tool::SearchSplunk => "search_splunk",
            Tool::GetSplunkIndexes => "get_splunk_indexes",
            Tool::GetLogStats => "get_log_stats",
            Tool::SearchErrors => "search_errors",
            Tool::GetKnowledgeObjects => "get_knowledge_objects",
            Tool::GetAllUsers => "get_all_users",
            Tool::GetUserInfo => "get_user_info",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Tool::SearchSplunk => "Search Splunk logs with the given query.",
            Tool::GetSplunkIndexes => "Get list of available Splunk indexes.",
            Tool::GetLogStats => "Get log statistics (event count by sourcetype) for a specific index.",
            Tool::SearchErrors => "Search for error logs across indexes.",
            Tool::GetKnowledgeObjects => {
                "Get knowledge objects from Splunk. Supported types include saved_searches, lookups, macros, etc."
            }
            Tool::GetAllUsers => "Fetch all Splunk users.",
            Tool::GetUserInfo => "Get detailed information about a specific Splunk user.",
        }
    }

    fn input_schema(self) -> Value {
        match self {
            Tool::SearchSplunk => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "SPL query, without the leading `search` command"},
                    "earliest_time": {"type": "string", "default": DEFAULT_EARLIEST_TIME},
                    "latest_time": {"type": "string", "default": DEFAULT_LATEST_TIME},
                    "max_count": {"type": "integer", "minimum": 1, "default": DEFAULT_MAX_COUNT}
                },
                "required": ["query"]
            }),
            Tool::GetLogStats => json!({
                "type": "object",
                "properties": {
                    "index": {"type": "string"},
                    "time_range": {"type": "string", "default": DEFAULT_EARLIEST_TIME}
                },
                "required": ["index"]
            }),
            Tool::SearchErrors => json!({
                "type": "object",
                "properties": {
                    "index": {"type": "string", "default": DEFAULT_ERROR_SEARCH_INDEX},
                    "time_range": {"type": "string", "default": DEFAULT_EARLIEST_TIME},
                    "max_count": {"type": "integer", "minimum": 1, "default": DEFAULT_ERROR_SEARCH_MAX_COUNT}
                }
            }),
            Tool::GetKnowledgeObjects => json!({
                "type": "object",
                "properties": {
                    "type": {"type": "string", "description": "Knowledge object category, e.g. saved_searches, macros, lookups"},
                    "count": {"type": "integer", "minimum": 0, "default": DEFAULT_KNOWLEDGE_OBJECT_COUNT}
                },
                "required": ["type"]
            }),
            Tool::GetUserInfo => json!({
                "type": "object",
                "properties": {
                    "username": {"type": "string"}
                },
                "required": ["username"]
            }),
            Tool::GetSplunkIndexes | Tool::GetAllUsers => {
                json!({"type": "object", "properties": {}})
            }
        }
    }

    fn definition(self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

impl FromStr for Tool {
    type Err = ToolCallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| ToolCallError::UnknownTool(s.to_string()))
    }
}

/// `tools/list` payload entries.
pub fn tool_definitions() -> Vec<Value> {
    Tool::ALL.into_iter().map(Tool::definition).collect()
}

/// A call that never reached Splunk.
#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialized envelope of one tool call plus its success flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReply {
    pub payload: Value,
    pub success: bool,
}

impl ToolReply {
    fn from_serialize<P: serde::Serialize>(payload: &P, success: bool) -> Self {
        let payload = serde_json::to_value(payload).unwrap_or_else(|e| {
            json!({"success": false, "error": format!("Failed to serialize result: {e}")})
        });
        Self { payload, success }
    }
}

fn default_earliest_time() -> String {
    DEFAULT_EARLIEST_TIME.to_string()
}

fn default_latest_time() -> String {
    DEFAULT_LATEST_TIME.to_string()
}

fn default_max_count() -> NonZeroU64 {
    DEFAULT_MAX_COUNT
}

fn default_error_index() -> String {
    DEFAULT_ERROR_SEARCH_INDEX.to_string()
}

fn default_error_max_count() -> NonZeroU64 {
    DEFAULT_ERROR_SEARCH_MAX_COUNT
}

fn default_object_count() -> u64 {
    DEFAULT_KNOWLEDGE_OBJECT_COUNT
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default = "default_earliest_time")]
    earliest_time: String,
    #[serde(default = "default_latest_time")]
    latest_time: String,
    #[serde(default = "default_max_count")]
    max_count: NonZeroU64,
}

#[derive(Debug, Deserialize)]
struct LogStatsArgs {
    index: String,
    #[serde(default = "default_earliest_time")]
    time_range: String,
}

#[derive(Debug, Deserialize)]
struct ErrorSearchArgs {
    #[serde(default = "default_error_index")]
    index: String,
    #[serde(default = "default_earliest_time")]
    time_range: String,
    #[serde(default = "default_error_max_count")]
    max_count: NonZeroU64,
}

#[derive(Debug, Deserialize)]
struct KnowledgeObjectArgs {
    #[serde(rename = "type")]
    object_type: String,
    #[serde(default = "default_object_count")]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct UserInfoArgs {
    username: String,
}

fn decode<A: DeserializeOwned>(tool: Tool, arguments: Value) -> Result<A, ToolCallError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|source| ToolCallError::InvalidArguments {
        tool: tool.name(),
        source,
    })
}

/// Run the tool called `name` with `arguments`.
///
/// # Errors
///
/// Returns an error for unknown tool names and undecodable arguments. Splunk
/// faults are reported inside the reply.
pub async fn call_tool<T: Transport>(
    service: &SplunkService<T>,
    name: &str,
    arguments: Value,
    cancel: &CancellationToken,
) -> Result<ToolReply, ToolCallError> {
    let tool: Tool = name.parse()?;

    let reply = match tool {
        Tool::SearchSplunk => {
            let args: SearchArgs = decode(tool, arguments)?;
            let request = SearchRequest::new(args.query)
                .with_earliest_time(args.earliest_time)
                .with_latest_time(args.latest_time)
                .with_max_count(args.max_count);
            let outcome = service.search(&request, cancel).await;
            ToolReply::from_serialize(&outcome, outcome.is_success())
        }
        Tool::GetSplunkIndexes => {
            let result = service.get_indexes().await;
            ToolReply::from_serialize(&result, result.is_success())
        }
        Tool::GetLogStats => {
            let args: LogStatsArgs = decode(tool, arguments)?;
            let result = service
                .get_log_stats(&args.index, &args.time_range, cancel)
                .await;
            ToolReply::from_serialize(&result, result.outcome.is_success())
        }
        Tool::SearchErrors => {
            let args: ErrorSearchArgs = decode(tool, arguments)?;
            let outcome = service
                .search_errors(&args.index, &args.time_range, args.max_count, cancel)
                .await;
            ToolReply::from_serialize(&outcome, outcome.is_success())
        }
        Tool::GetKnowledgeObjects => {
            let args: KnowledgeObjectArgs = decode(tool, arguments)?;
            let result = service
                .get_knowledge_objects(&args.object_type, args.count)
                .await;
            ToolReply::from_serialize(&result, result.is_success())
        }
        Tool::GetAllUsers => {
            let result = service.get_all_users().await;
            ToolReply::from_serialize(&result, result.is_success())
        }
        Tool::GetUserInfo => {
            let args: UserInfoArgs = decode(tool, arguments)?;
            let result = service.get_user_info(&args.username).await;
            ToolReply::from_serialize(&result, result.is_success())
        }
    };

    Ok(reply)
}
