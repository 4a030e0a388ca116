//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses its arguments into an input struct and validates them into wire parameters
//! 2. Calls the Semantic Scholar API client
//! 3. Returns the sanitized JSON payload
//!
//! [`call_tool`] is the only entry point the protocol layer uses; it never
//! fails, turning any [`ToolError`] into a JSON error envelope.

mod authors;
mod papers;
mod schema;

pub use authors::*;
pub use papers::*;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::SemanticScholarClient;
use crate::config::Config;
use crate::error::{ToolError, ToolResult, ValidationError};
use crate::models::WireParams;

/// Tool execution context.
#[derive(Clone)]
pub struct ToolContext {
    /// API client.
    pub client: Arc<SemanticScholarClient>,

    /// Resolved configuration.
    pub config: Arc<Config>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(client: Arc<SemanticScholarClient>, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    /// Build the client from `config` and wrap both.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be created.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = SemanticScholarClient::new(config.clone())?;
        Ok(Self::new(Arc::new(client), Arc::new(config)))
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext").field("client", &self.client).finish()
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "search_papers").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value>;
}

/// Result of a tool call as seen by the protocol layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Sanitized API payload.
    Success(Value),
    /// `{"error": ...}` envelope.
    Failure(Value),
}

impl ToolOutput {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Success(v) | Self::Failure(v) => v,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Success(v) | Self::Failure(v) => v,
        }
    }
}

/// Run a tool, converting every failure into an error envelope.
pub async fn call_tool(tool: &dyn McpTool, ctx: &ToolContext, input: Value) -> ToolOutput {
    match tool.execute(ctx, input).await {
        Ok(value) => ToolOutput::Success(value),
        Err(err) => {
            match &err {
                ToolError::Validation(e) => {
                    tracing::info!(tool = tool.name(), parameter = e.parameter(), error = %e, "Parameter validation failed");
                }
                _ => tracing::error!(tool = tool.name(), error = %err, "Tool execution failed"),
            }
            ToolOutput::Failure(err.envelope())
        }
    }
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        // Paper tools (5)
        Box::new(papers::SearchPapersTool),
        Box::new(papers::PaperDetailsTool),
        Box::new(papers::PaperAuthorsTool),
        Box::new(papers::PaperCitationsTool),
        Box::new(papers::PaperReferencesTool),

        // Author tools (3)
        Box::new(authors::SearchAuthorsTool),
        Box::new(authors::AuthorDetailsTool),
        Box::new(authors::AuthorPapersTool),
    ]
}

/// Deserialize tool arguments; schema mismatches become validation errors.
pub(crate) fn parse_input<T: DeserializeOwned>(input: Value) -> ToolResult<T> {
    // Absent arguments behave like an empty object.
    let input = if input.is_null() { Value::Object(serde_json::Map::new()) } else { input };
    serde_json::from_value(input).map_err(|e| ValidationError::from(e).into())
}

/// GET `endpoint`, tagging failures with `action`.
pub(crate) async fn fetch(
    ctx: &ToolContext,
    action: &'static str,
    endpoint: &str,
    params: &WireParams,
) -> ToolResult<Value> {
    ctx.client.get(endpoint, params).await.map_err(|e| ToolError::api(action, e))
}

/// Number of entries in a paged `data` array, for logging.
pub(crate) fn data_len(value: &Value) -> usize {
    value.get("data").and_then(Value::as_array).map_or(0, Vec::len)
}
