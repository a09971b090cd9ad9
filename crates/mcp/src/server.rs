//! Line-delimited JSON-RPC loop.
//!
//! Responsibilities:
//! - Read one JSON-RPC message per line and answer protocol methods inline.
//! - Run every `tools/call` and `resources/read` in its own task so that
//!   slow searches do not block other requests.
//! - Cancel in-flight calls on `notifications/cancelled`.
//!
//! Does NOT handle:
//! - Splunk semantics (see `tools` and `resources`).
//!
//! Invariants:
//! - Stdout carries protocol messages only; every write goes through one
//!   writer task, one message per line.
//! - Until `notifications/initialized` arrives only `initialize` is answered;
//!   other requests get `Server not initialized`.
//! - On input EOF the loop waits for in-flight calls before returning.
//! - A cancelled call gets no reply.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use splunk_client::{CancellationToken, SplunkService, Transport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::jsonrpc::{
    INVALID_PARAMS, INVALID_REQUEST, JsonRpcRequest, METHOD_NOT_FOUND, PARSE_ERROR,
    SERVER_NOT_INITIALIZED, json_rpc_error, json_rpc_response, request_key, tool_text_content,
};
use crate::resources::{read_resource, resource_list, resource_templates};
use crate::tools::{call_tool, tool_definitions};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "splunk-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

type InFlight = Arc<Mutex<HashMap<String, CancellationToken>>>;

pub struct McpServer<T> {
    service: SplunkService<T>,
    initialized: bool,
    in_flight: InFlight,
    tasks: JoinSet<()>,
}

impl<T: Transport + 'static> McpServer<T> {
    pub fn new(service: SplunkService<T>) -> Self {
        Self {
            service,
            initialized: false,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            tasks: JoinSet::new(),
        }
    }

    /// Serve requests from `reader` until EOF, writing replies to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing a reply fails.
    pub async fn serve<R, W>(mut self, reader: R, writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<Value>();
        let writer_task = tokio::spawn(write_replies(writer, rx));

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(reply) = self.handle_line(line, &tx) {
                // A send only fails once the writer has stopped; its error surfaces below.
                let _ = tx.send(reply);
            }
            while self.tasks.try_join_next().is_some() {}
        }

        if !self.tasks.is_empty() {
            info!(pending = self.tasks.len(), "Input closed, waiting for in-flight calls");
        }
        while self.tasks.join_next().await.is_some() {}

        drop(tx);
        writer_task.await.map_err(io::Error::other)?
    }

    fn handle_line(&mut self, line: &str, tx: &mpsc::UnboundedSender<Value>) -> Option<Value> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(json_rpc_error(None, PARSE_ERROR, &format!("Parse error: {e}")));
            }
        };
        let id = value.get("id").cloned();

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request, tx),
            Err(e) => Some(json_rpc_error(
                id,
                INVALID_REQUEST,
                &format!("Invalid request: {e}"),
            )),
        }
    }

    /// Answer `request`, or hand it to a task that will.
    fn handle(
        &mut self,
        request: JsonRpcRequest,
        tx: &mpsc::UnboundedSender<Value>,
    ) -> Option<Value> {
        let method = request.method.clone();
        let method = method.as_str();
        debug!(method, "Received request");

        if method == "initialize" {
            return Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": MCP_VERSION,
                    "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                    "capabilities": { "tools": {}, "resources": {} }
                }),
            ));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            if request.is_notification() {
                return None;
            }
            return Some(json_rpc_error(
                request.id,
                SERVER_NOT_INITIALIZED,
                "Server not initialized",
            ));
        }

        match method {
            "ping" => Some(json_rpc_response(request.id, json!({}))),
            "tools/list" => Some(json_rpc_response(
                request.id,
                json!({ "tools": tool_definitions() }),
            )),
            "resources/list" => Some(json_rpc_response(request.id, resource_list())),
            "resources/templates/list" => {
                Some(json_rpc_response(request.id, resource_templates()))
            }
            "tools/call" => self.spawn_tool_call(request, tx),
            "resources/read" => self.spawn_resource_read(request, tx),
            "notifications/cancelled" => {
                self.cancel(request.params.as_ref());
                None
            }
            _ if request.is_notification() => None,
            _ => Some(json_rpc_error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {method}"),
            )),
        }
    }

    fn spawn_tool_call(
        &mut self,
        request: JsonRpcRequest,
        tx: &mpsc::UnboundedSender<Value>,
    ) -> Option<Value> {
        let Some(Value::Object(mut params)) = request.params else {
            return Some(json_rpc_error(
                request.id,
                INVALID_PARAMS,
                "params must be an object",
            ));
        };
        let Some(name) = params.get("name").and_then(Value::as_str).map(str::to_string) else {
            return Some(json_rpc_error(
                request.id,
                INVALID_PARAMS,
                "params.name must be a string",
            ));
        };
        let arguments = params.remove("arguments").unwrap_or_else(|| json!({}));

        let id = request.id;
        let cancel = self.track(id.as_ref());
        let in_flight = Arc::clone(&self.in_flight);
        let service = self.service.clone();
        let tx = tx.clone();

        self.tasks.spawn(async move {
            let reply = match call_tool(&service, &name, arguments, &cancel).await {
                Ok(reply) => json_rpc_response(
                    id.clone(),
                    json!({
                        "content": [tool_text_content(&reply.payload)],
                        "isError": !reply.success
                    }),
                ),
                Err(e) => json_rpc_error(id.clone(), INVALID_PARAMS, &e.to_string()),
            };
            finish(&in_flight, id.as_ref(), &cancel, reply, &tx);
        });
        None
    }

    fn spawn_resource_read(
        &mut self,
        request: JsonRpcRequest,
        tx: &mpsc::UnboundedSender<Value>,
    ) -> Option<Value> {
        let Some(uri) = request
            .params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return Some(json_rpc_error(
                request.id,
                INVALID_PARAMS,
                "params.uri must be a string",
            ));
        };

        let id = request.id;
        let cancel = self.track(id.as_ref());
        let in_flight = Arc::clone(&self.in_flight);
        let service = self.service.clone();
        let tx = tx.clone();

        self.tasks.spawn(async move {
            let reply = match read_resource(&service, &uri, &cancel).await {
                Ok(result) => json_rpc_response(id.clone(), result),
                Err(e) => json_rpc_error(id.clone(), INVALID_PARAMS, &e.to_string()),
            };
            finish(&in_flight, id.as_ref(), &cancel, reply, &tx);
        });
        None
    }

    /// Token for a new in-flight call, registered under its id.
    fn track(&self, id: Option<&Value>) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(id) = id
            && let Ok(mut in_flight) = self.in_flight.lock()
        {
            in_flight.insert(request_key(id), token.clone());
        }
        token
    }

    fn cancel(&self, params: Option<&Value>) {
        let Some(id) = params.and_then(|p| p.get("requestId")) else {
            warn!("notifications/cancelled without requestId");
            return;
        };
        let token = self
            .in_flight
            .lock()
            .ok()
            .and_then(|in_flight| in_flight.get(&request_key(id)).cloned());
        match token {
            Some(token) => {
                info!(request_id = %id, "Cancelling in-flight call");
                token.cancel();
            }
            None => debug!(request_id = %id, "Cancel for unknown or finished request"),
        }
    }
}

fn finish(
    in_flight: &InFlight,
    id: Option<&Value>,
    cancel: &CancellationToken,
    reply: Value,
    tx: &mpsc::UnboundedSender<Value>,
) {
    if let Some(id) = id
        && let Ok(mut in_flight) = in_flight.lock()
    {
        in_flight.remove(&request_key(id));
    }
    if cancel.is_cancelled() {
        debug!("Dropping reply of cancelled call");
        return;
    }
    if id.is_some() {
        let _ = tx.send(reply);
    }
}

async fn write_replies<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Value>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = serde_json::to_vec(&message)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use splunk_client::testing::ScriptedTransport;
    use splunk_config::PollPolicy;
    use tokio::io::{AsyncReadExt, BufReader, DuplexStream};

    const INIT: &str = r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{}}
{"jsonrpc":"2.0","method":"notifications/initialized"}
"#;

    fn server(transport: ScriptedTransport) -> McpServer<ScriptedTransport> {
        let policy = PollPolicy {
            max_attempts: 3,
            interval: Duration::from_secs(1),
            ..PollPolicy::default()
        };
        McpServer::new(SplunkService::new(Arc::new(transport), policy))
    }

    async fn read_all(mut output: DuplexStream) -> Vec<Value> {
        let mut text = String::new();
        output.read_to_string(&mut text).await.unwrap();
        text.lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// Feed `input` to the server and collect every reply.
    async fn exchange(server: McpServer<ScriptedTransport>, input: &str) -> Vec<Value> {
        let (writer, output) = tokio::io::duplex(1 << 16);
        let reader = BufReader::new(input.as_bytes());
        let (served, replies) = tokio::join!(server.serve(reader, writer), read_all(output));
        served.unwrap();
        replies
    }

    fn by_id(replies: &[Value], id: Value) -> &Value {
        replies
            .iter()
            .find(|r| r["id"] == id)
            .unwrap_or_else(|| panic!("no reply with id {id}: {replies:?}"))
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let replies = exchange(server(ScriptedTransport::new()), INIT).await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["result"]["protocolVersion"], json!(MCP_VERSION));
        assert_eq!(replies[0]["result"]["serverInfo"]["name"], json!("splunk-mcp"));
        assert!(replies[0]["result"]["capabilities"]["tools"].is_object());
        assert!(replies[0]["result"]["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_requests_before_initialized_are_rejected() {
        let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}
"#;
        let replies = exchange(server(ScriptedTransport::new()), input).await;

        assert_eq!(replies[0]["error"]["code"], json!(-32002));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let input = format!(
            "{INIT}{}\n{}\n{}\n{}\n",
            "{not json",
            r#"{"jsonrpc":"2.0","id":2,"params":{}}"#,
            r#"{"jsonrpc":"2.0","id":3,"method":"prompts/list"}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":[1]}"#,
        );
        let replies = exchange(server(ScriptedTransport::new()), &input).await;

        assert_eq!(by_id(&replies, Value::Null)["error"]["code"], json!(-32700));
        assert_eq!(by_id(&replies, json!(2))["error"]["code"], json!(-32600));
        assert_eq!(by_id(&replies, json!(3))["error"]["code"], json!(-32601));
        assert_eq!(
            by_id(&replies, json!(3))["error"]["message"],
            json!("Method not found: prompts/list")
        );
        assert_eq!(by_id(&replies, json!(4))["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn test_tools_list_and_ping() {
        let input = format!(
            "{INIT}{}\n{}\n",
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
        );
        let replies = exchange(server(ScriptedTransport::new()), &input).await;

        let tools = by_id(&replies, json!(1))["result"]["tools"]
            .as_array()
            .unwrap();
        assert_eq!(tools.len(), 7);
        assert_eq!(by_id(&replies, json!(2))["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tool_call_failure_sets_is_error() {
        let input = format!(
            "{INIT}{}\n",
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_knowledge_objects","arguments":{"type":"nope"}}}"#,
        );
        let replies = exchange(server(ScriptedTransport::new()), &input).await;

        let result = &by_id(&replies, json!(5))["result"];
        assert_eq!(result["isError"], json!(true));
        let payload: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["error"], json!("Unsupported type: nope"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let input = format!(
            "{INIT}{}\n",
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"drop_index"}}"#,
        );
        let replies = exchange(server(ScriptedTransport::new()), &input).await;

        let error = &by_id(&replies, json!(6))["error"];
        assert_eq!(error["code"], json!(-32602));
        assert_eq!(error["message"], json!("Unknown tool: drop_index"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_calls_finish_after_eof() {
        let transport = ScriptedTransport::new()
            .then_sid("1")
            .then_not_ready()
            .then_results(serde_json::json!([{"host": "a"}]));
        let input = format!(
            "{INIT}{}\n",
            r#"{"jsonrpc":"2.0","id":"s","method":"tools/call","params":{"name":"search_splunk","arguments":{"query":"index=main"}}}"#,
        );
        let replies = exchange(server(transport), &input).await;

        let result = &by_id(&replies, json!("s"))["result"];
        assert_eq!(result["isError"], json!(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_call_gets_no_reply() {
        let transport = ScriptedTransport::new()
            .then_sid("1")
            .otherwise(200, r#"{"preview": true}"#);
        let (mut input, reader) = tokio::io::duplex(1 << 16);
        let (writer, output) = tokio::io::duplex(1 << 16);
        let serving = tokio::spawn(server(transport).serve(BufReader::new(reader), writer));

        input.write_all(INIT.as_bytes()).await.unwrap();
        input
            .write_all(
                br#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"search_splunk","arguments":{"query":"index=main"}}}
"#,
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        input
            .write_all(
                br#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":7}}
{"jsonrpc":"2.0","id":8,"method":"ping"}
"#,
            )
            .await
            .unwrap();
        drop(input);

        let replies = read_all(output).await;
        serving.await.unwrap().unwrap();

        assert!(replies.iter().all(|r| r["id"] != json!(7)), "{replies:?}");
        assert_eq!(by_id(&replies, json!(8))["result"], json!({}));
    }

    #[tokio::test]
    async fn test_resources_listing() {
        let input = format!(
            "{INIT}{}\n{}\n{}\n",
            r#"{"jsonrpc":"2.0","id":1,"method":"resources/list"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"resources/templates/list"}"#,
            r#"{"jsonrpc":"2.0","id":3,"method":"resources/read","params":{"uri":"splunk://nope"}}"#,
        );
        let replies = exchange(server(ScriptedTransport::new()), &input).await;

        assert_eq!(
            by_id(&replies, json!(1))["result"]["resources"][0]["uri"],
            json!("splunk://indexes")
        );
        assert_eq!(
            by_id(&replies, json!(2))["result"]["resourceTemplates"][0]["uriTemplate"],
            json!("splunk://search/{query}")
        );
        assert_eq!(by_id(&replies, json!(3))["error"]["code"], json!(-32602));
    }
}
