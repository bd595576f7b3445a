//! MCP server implementation for Google Sheets.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Handling tool calls and other requests
//! 3. **Shutdown**: stdin EOF, SIGINT or SIGTERM
//!
//! Messages are read in arrival order. Everything except `tools/call` is
//! answered immediately; tool calls run as concurrent tasks and reply when
//! their remote request finishes, so a slow call never blocks `ping`, other
//! tool calls, or shutdown. Tool failures are reported inside a successful
//! JSON-RPC response with `isError` set; only protocol problems become
//! JSON-RPC errors.

use std::future::Future;
use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::task::JoinSet;

use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, Reply, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::transport::{StdioTransport, Transport};
use crate::sheets::ClientProvider;
use crate::tools::{handle_tool_call, tool_definitions};

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session. Always false:
    /// the tool set is fixed at compile time.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// A tool definition for tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// A validated `tools/call` request that has not run yet.
struct PendingToolCall {
    id: RequestId,
    params: ToolCallParams,
}

impl PendingToolCall {
    /// Runs the tool and builds the reply for the original request id.
    async fn run(self, provider: Arc<ClientProvider>) -> Reply {
        let result =
            handle_tool_call(&provider, &self.params.name, &self.params.arguments).await;

        match serde_json::to_value(&result) {
            Ok(value) => Reply::Result(JsonRpcResponse::success(self.id, value)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialise tool call result");
                Reply::Error(JsonRpcError::internal_error(
                    self.id,
                    "Internal error: failed to serialise result",
                ))
            }
        }
    }
}

/// What to do with one input line.
enum Routed {
    /// Reply now, or not at all for notifications and blank lines.
    Immediate(Option<Reply>),
    /// Run a tool call; its reply comes later.
    ToolCall(PendingToolCall),
}

/// The MCP server for Google Sheets.
pub struct McpServer {
    /// Current server state.
    state: ServerState,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Source of the shared Sheets client, shared with running tool calls.
    provider: Arc<ClientProvider>,
}

impl McpServer {
    /// Creates a new MCP server backed by `provider`.
    #[must_use]
    pub fn new(provider: ClientProvider) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            protocol_version: None,
            provider: Arc::new(provider),
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Runs the MCP server over stdio until stdin closes or a shutdown
    /// signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails or signal handlers cannot be
    /// installed.
    pub async fn run(&mut self) -> io::Result<()> {
        let mut transport = StdioTransport::new();
        self.serve(&mut transport, shutdown_signal()).await
    }

    /// Serves requests from `transport` until its input closes or
    /// `shutdown` completes.
    ///
    /// Tool calls still in flight at that point are abandoned without a
    /// reply.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails or `shutdown` resolves to an
    /// error.
    pub async fn serve<R, W, S>(
        &mut self,
        transport: &mut Transport<R, W>,
        shutdown: S,
    ) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = io::Result<()>>,
    {
        tokio::pin!(shutdown);
        let mut in_flight: JoinSet<Reply> = JoinSet::new();

        let outcome = loop {
            tokio::select! {
                signal = &mut shutdown => break signal,

                line = transport.read_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            tracing::info!("stdin closed");
                            break Ok(());
                        }
                        Err(e) => break Err(e),
                    };

                    match self.route_line(&line) {
                        Routed::Immediate(Some(reply)) => {
                            if let Err(e) = transport.write_reply(&reply).await {
                                break Err(e);
                            }
                        }
                        Routed::Immediate(None) => {}
                        Routed::ToolCall(call) => {
                            in_flight.spawn(call.run(Arc::clone(&self.provider)));
                        }
                    }
                }

                Some(joined) = in_flight.join_next() => match joined {
                    Ok(reply) => {
                        if let Err(e) = transport.write_reply(&reply).await {
                            break Err(e);
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Tool call task failed"),
                },
            }
        };

        self.state = ServerState::ShuttingDown;
        if !in_flight.is_empty() {
            tracing::info!(pending = in_flight.len(), "Abandoning in-flight tool calls");
        }
        in_flight.abort_all();

        outcome
    }

    /// Handles a single line of input and returns the reply to send, if any.
    ///
    /// Tool calls are awaited inline. Blank lines and notifications produce
    /// no reply.
    pub async fn handle_line(&mut self, line: &str) -> Option<Reply> {
        match self.route_line(line) {
            Routed::Immediate(reply) => reply,
            Routed::ToolCall(call) => Some(call.run(Arc::clone(&self.provider)).await),
        }
    }

    /// Parses one line and answers everything that does not need the
    /// remote service.
    fn route_line(&mut self, line: &str) -> Routed {
        if line.trim().is_empty() {
            return Routed::Immediate(None);
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => self.route_request(req),
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                Routed::Immediate(None)
            }
            Err(error) => {
                tracing::debug!(code = error.error.code, "Rejected malformed message");
                Routed::Immediate(Some(Reply::Error(error)))
            }
        }
    }

    /// Routes an incoming request.
    fn route_request(&mut self, req: JsonRpcRequest) -> Routed {
        tracing::debug!(id = %req.id, method = %req.method, "Request");

        let result = match req.method.as_str() {
            "initialize" => self.handle_initialize(&req),
            "tools/list" => self.handle_tools_list(&req),
            "tools/call" => match self.prepare_tools_call(req) {
                Ok(call) => return Routed::ToolCall(call),
                Err(error) => Err(error),
            },
            "ping" => Ok(JsonRpcResponse::success(req.id.clone(), json!({}))),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        };

        Routed::Immediate(Some(result.into()))
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            tracing::info!("Client initialised, server running");
            self.state = ServerState::Running;
        }
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::invalid_request(
                Some(req.id.clone()),
                "Server already initialised",
            ));
        }

        let params: InitializeParams = req.parse_params("initialize")?;
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                requested_version = %params.protocol_version,
                "Client connected"
            );
        }

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let result = json!({
            "tools": tool_definitions(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Checks a tools/call request; the tool itself runs later.
    fn prepare_tools_call(&self, req: JsonRpcRequest) -> Result<PendingToolCall, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = req.parse_params("tool call")?;
        Ok(PendingToolCall { id: req.id, params })
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::invalid_request(
                Some(id.clone()),
                "Server not initialised",
            ));
        }
        Ok(())
    }
}

/// Completes when the process is asked to stop.
#[cfg(unix)]
async fn shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => tracing::info!("Received SIGINT, initiating graceful shutdown"),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
    Ok(())
}

/// Completes when the process is asked to stop.
#[cfg(windows)]
async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};

    use super::*;
    use crate::config::SheetsConfig;
    use crate::sheets::testing::FakeSheets;

    type MemoryTransport = Transport<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>>;

    /// Connects an in-memory transport for `serve` to a client end.
    fn memory_pipe() -> (MemoryTransport, DuplexStream) {
        let (client, server_end) = tokio::io::duplex(4096);
        let (read, write) = tokio::io::split(server_end);
        (Transport::with_io(BufReader::new(read), write), client)
    }

    const METADATA_CALL: &str = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_sheet_metadata","arguments":{"spreadsheetId":"abc"}}}"#;

    fn reply_json(reply: Option<Reply>) -> Value {
        serde_json::to_value(reply.expect("expected a reply")).unwrap()
    }

    async fn running_server(fake: Arc<FakeSheets>) -> McpServer {
        let mut server = McpServer::new(ClientProvider::with_client(fake));
        server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":0,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1"}}}"#,
            )
            .await;
        server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        server
    }

    #[test]
    fn server_initial_state() {
        let server = McpServer::new(ClientProvider::new(SheetsConfig::default()));
        assert_eq!(server.state(), ServerState::AwaitingInit);
        assert!(server.protocol_version().is_none());
    }

    #[test]
    fn tool_call_result_text() {
        let result = ToolCallResult::text("Hello, world!");
        assert!(!result.is_error);
        assert_eq!(result.content.len(), 1);

        match &result.content[0] {
            ToolContent::Text { text } => assert_eq!(text, "Hello, world!"),
        }
    }

    #[test]
    fn tool_call_result_error() {
        let result = ToolCallResult::error("Error: Something went wrong");
        assert!(result.is_error);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isError"], true);
        assert_eq!(json["content"][0]["type"], "text");
    }

    #[test]
    fn success_result_omits_error_flag() {
        let json = serde_json::to_value(ToolCallResult::text("{}")).unwrap();
        assert!(json.get("isError").is_none());
    }

    #[tokio::test]
    async fn lifecycle_reaches_running() {
        let server = running_server(Arc::new(FakeSheets::new())).await;
        assert_eq!(server.state(), ServerState::Running);
        assert_eq!(server.protocol_version(), Some(MCP_PROTOCOL_VERSION));
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let mut server = McpServer::new(ClientProvider::with_client(Arc::new(FakeSheets::new())));

        let reply = reply_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
                )
                .await,
        );

        assert_eq!(reply["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(reply["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(reply["result"]["capabilities"]["tools"].is_object());
        assert_eq!(server.state(), ServerState::Initialising);
    }

    #[tokio::test]
    async fn initialize_without_params_is_invalid_params() {
        let mut server = McpServer::new(ClientProvider::with_client(Arc::new(FakeSheets::new())));

        let reply = reply_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
                .await,
        );

        assert_eq!(reply["error"]["code"], -32602);
        assert_eq!(server.state(), ServerState::AwaitingInit);
    }

    #[tokio::test]
    async fn tools_list_requires_initialisation() {
        let mut server = McpServer::new(ClientProvider::with_client(Arc::new(FakeSheets::new())));

        let reply = reply_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
                .await,
        );

        assert_eq!(reply["error"]["code"], -32600);
        assert_eq!(reply["error"]["message"], "Server not initialised");
    }

    #[tokio::test]
    async fn second_initialize_is_rejected() {
        let mut server = running_server(Arc::new(FakeSheets::new())).await;

        let reply = reply_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":5,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
                )
                .await,
        );

        assert_eq!(reply["error"]["message"], "Server already initialised");
    }

    #[tokio::test]
    async fn tools_list_returns_every_tool() {
        let mut server = running_server(Arc::new(FakeSheets::new())).await;

        let reply = reply_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
                .await,
        );

        let tools = reply["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), crate::tools::TOOL_NAMES.len());
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn tools_call_routes_to_tool() {
        let fake = Arc::new(FakeSheets::new());
        let mut server = running_server(Arc::clone(&fake)).await;

        let reply = reply_json(
            server
                .handle_line(
                    r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"delete_sheet","arguments":{"spreadsheetId":"abc","sheetId":12}}}"#,
                )
                .await,
        );

        assert_eq!(reply["id"], 3);
        assert!(reply["result"].get("isError").is_none());
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, json!({ "deleted": true, "sheetId": 12 }));
        assert_eq!(fake.only_call().operation, "batch_update");
    }

    #[tokio::test]
    async fn notifications_and_blank_lines_get_no_reply() {
        let mut server = running_server(Arc::new(FakeSheets::new())).await;

        assert!(server.handle_line("   ").await.is_none());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{}}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn unknown_method_and_ping() {
        let mut server = running_server(Arc::new(FakeSheets::new())).await;

        let reply = reply_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#)
                .await,
        );
        assert_eq!(reply, json!({ "jsonrpc": "2.0", "id": "p", "result": {} }));

        let reply = reply_json(
            server
                .handle_line(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#)
                .await,
        );
        assert_eq!(reply["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn pending_tool_call_does_not_block_ping_or_shutdown() {
        let fake = Arc::new(FakeSheets::hanging());
        let mut server = running_server(Arc::clone(&fake)).await;
        let (mut transport, client) = memory_pipe();
        let (client_read, mut client_write) = tokio::io::split(client);
        let mut replies = BufReader::new(client_read).lines();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

        let session = async {
            client_write
                .write_all(format!("{METADATA_CALL}\n").as_bytes())
                .await
                .unwrap();
            fake.wait_for_call().await;

            client_write
                .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}\n")
                .await
                .unwrap();
            let line = replies.next_line().await.unwrap().unwrap();
            stop.send(()).unwrap();
            serde_json::from_str::<Value>(&line).unwrap()
        };
        let shutdown = async {
            let _ = stopped.await;
            Ok(())
        };

        let (served, ping) = tokio::join!(server.serve(&mut transport, shutdown), session);

        served.unwrap();
        assert_eq!(ping, json!({ "jsonrpc": "2.0", "id": 3, "result": {} }));
        assert_eq!(server.state(), ServerState::ShuttingDown);
        assert_eq!(fake.only_call().operation, "get_spreadsheet");
    }

    #[tokio::test]
    async fn input_eof_ends_serve_with_call_in_flight() {
        let fake = Arc::new(FakeSheets::hanging());
        let mut server = running_server(Arc::clone(&fake)).await;
        let (mut transport, mut client) = memory_pipe();

        let session = async {
            client
                .write_all(format!("{METADATA_CALL}\n").as_bytes())
                .await
                .unwrap();
            fake.wait_for_call().await;
            client.shutdown().await.unwrap();
        };

        let (served, ()) = tokio::join!(
            server.serve(&mut transport, std::future::pending::<io::Result<()>>()),
            session
        );

        served.unwrap();
        assert_eq!(server.state(), ServerState::ShuttingDown);
    }

    #[tokio::test]
    async fn finished_tool_calls_are_written_back() {
        let fake = Arc::new(FakeSheets::replying(json!({ "properties": { "title": "Budget" } })));
        let mut server = running_server(fake).await;
        let (mut transport, mut client) = memory_pipe();

        let session = async {
            client
                .write_all(format!("{METADATA_CALL}\n").as_bytes())
                .await
                .unwrap();
            let mut replies = BufReader::new(&mut client).lines();
            let line = replies.next_line().await.unwrap().unwrap();
            replies.into_inner().into_inner().shutdown().await.unwrap();
            serde_json::from_str::<Value>(&line).unwrap()
        };

        let (served, reply) = tokio::join!(
            server.serve(&mut transport, std::future::pending::<io::Result<()>>()),
            session
        );

        served.unwrap();
        assert_eq!(reply["id"], 2);
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, json!({ "title": "Budget", "sheets": [] }));
    }
}
