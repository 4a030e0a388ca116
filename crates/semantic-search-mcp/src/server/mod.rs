//! MCP server implementation.
//!
//! Provides stdio (for desktop clients) and stateless streamable HTTP
//! transports over a single dispatcher, [`McpServer::handle`].

pub mod http;
pub mod protocol;
pub mod registry;
pub mod stdio;

use serde_json::{Map, Value, json};

use crate::config::Transport;
use crate::formatters;
use crate::tools::{self, ToolContext};

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use registry::Registry;

use protocol::{DEFAULT_PROTOCOL_VERSION, INVALID_PARAMS, McpToolInfo, METHOD_NOT_FOUND};

/// MCP server for Semantic Scholar.
pub struct McpServer {
    /// Tool execution context.
    ctx: ToolContext,

    /// Registered tools, resources and prompts.
    registry: Registry,
}

impl McpServer {
    /// Create a server exposing the default registry.
    #[must_use]
    pub fn new(ctx: ToolContext) -> Self {
        Self::with_registry(ctx, Registry::with_defaults())
    }

    #[must_use]
    pub fn with_registry(ctx: ToolContext, registry: Registry) -> Self {
        Self { ctx, registry }
    }

    /// Run with the transport selected in the configuration.
    ///
    /// # Errors
    ///
    /// Returns error on I/O or bind failure.
    pub async fn run(self) -> anyhow::Result<()> {
        match self.ctx.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::StreamableHttp => self.run_http().await,
        }
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!(
            server = %self.ctx.config.server_name,
            tools = self.registry.tools().count(),
            "Starting MCP server in stdio mode"
        );

        let result = stdio::run_stdio(&self).await;
        self.shutdown();
        result
    }

    /// Run the server in HTTP mode until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self) -> anyhow::Result<()> {
        let host = self.ctx.config.host.clone();
        let port = self.ctx.config.port;
        tracing::info!(
            server = %self.ctx.config.server_name,
            tools = self.registry.tools().count(),
            "Starting MCP server in HTTP mode on {host}:{port}"
        );

        let ctx = self.ctx.clone();
        let result = http::serve(self, &host, port).await;

        ctx.client.close();
        tracing::info!("HTTP server shut down");
        result
    }

    /// Close the API connection pool. Safe to call more than once.
    pub fn shutdown(&self) {
        self.ctx.client.close();
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get tool context for execution.
    #[must_use]
    pub const fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Dispatch one request. Notifications produce no response.
    pub async fn handle(&self, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %req.method, "Received request");

        if req.is_notification() {
            tracing::debug!(method = %req.method, "Notification received");
            return None;
        }

        let id = req.id.clone();
        let response = match req.method.as_str() {
            "initialize" => self.handle_initialize(id, &req.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, &req.params).await,
            "resources/list" => self.handle_resources_list(id),
            "resources/read" => self.handle_resources_read(id, &req.params),
            "prompts/list" => self.handle_prompts_list(id),
            "prompts/get" => self.handle_prompts_get(id, &req.params),
            other => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        tracing::info!(protocol_version, "MCP initialize");

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": self.ctx.config.server_name,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<McpToolInfo> = self
            .registry
            .tools()
            .map(|t| McpToolInfo {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing 'name' parameter");
        };
        let Some(tool) = self.registry.tool(name) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {name}"));
        };

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        tracing::info!(tool = %name, "Executing tool");
        let output = tools::call_tool(tool, &self.ctx, arguments).await;

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": formatters::pretty(output.value())
                }],
                "isError": output.is_error()
            }),
        )
    }

    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let resources: Vec<Value> = self.registry.resources().map(|r| r.definition()).collect();
        JsonRpcResponse::success(id, json!({ "resources": resources }))
    }

    fn handle_resources_read(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(uri) = params.get("uri").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing 'uri' parameter");
        };
        let Some(resource) = self.registry.resource(uri) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown resource: {uri}"));
        };

        JsonRpcResponse::success(id, json!({ "contents": [resource.contents(&self.ctx)] }))
    }

    fn handle_prompts_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let prompts: Vec<Value> = self.registry.prompts().map(|p| p.definition()).collect();
        JsonRpcResponse::success(id, json!({ "prompts": prompts }))
    }

    fn handle_prompts_get(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing 'name' parameter");
        };
        let Some(prompt) = self.registry.prompt(name) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown prompt: {name}"));
        };

        let empty = Map::new();
        let arguments = params.get("arguments").and_then(Value::as_object).unwrap_or(&empty);

        match prompt.render(arguments) {
            Ok(messages) => {
                let messages: Vec<Value> = messages.iter().map(|m| m.to_json()).collect();
                JsonRpcResponse::success(
                    id,
                    json!({
                        "description": prompt.description(),
                        "messages": messages
                    }),
                )
            }
            Err(e) => JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string()),
        }
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("registry", &self.registry).finish()
    }
}
