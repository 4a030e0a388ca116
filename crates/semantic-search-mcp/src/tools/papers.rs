//! Paper tools: search_papers, get_paper_details, get_paper_authors,
//! get_paper_citations, get_paper_references.

use serde_json::{Value, json};

use super::schema::{fields_property, id_property, offset_property, page_limit_property, search_limit_property};
use super::{McpTool, ToolContext, data_len, fetch, parse_input};
use crate::client::endpoints;
use crate::config::fields::FieldSet;
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{PaperDetailsInput, PaperListInput, SearchPapersInput};

/// Paper search tool.
pub struct SearchPapersTool;

#[async_trait::async_trait]
impl McpTool for SearchPapersTool {
    fn name(&self) -> &'static str {
        "search_papers"
    }

    fn description(&self) -> &'static str {
        "Search academic papers by relevance. Supports filters for publication type, \
         publication date or year range, and minimum citation count. Returns the raw \
         Semantic Scholar payload plus a _metadata object describing the query that ran."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query (e.g., 'neural networks')"
                },
                "limit": search_limit_property(),
                "offset": offset_property(),
                "fields": fields_property(FieldSet::Paper),
                "publication_types": {
                    "type": "string",
                    "description": "Comma-separated publication types (e.g., 'JournalArticle,Conference')"
                },
                "publication_date_or_year": {
                    "type": "string",
                    "description": "Year or range: '2024', '2023:2024', '2023-2024', '2024-01:2024-06', '2020:', ':2020'"
                },
                "min_citation_count": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Minimum number of citations"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        let params: SearchPapersInput = parse_input(input)?;
        let wire = params.to_params()?;
        let parameters = wire.to_json();

        tracing::info!(query = %params.query, "Searching papers");

        let result = ctx.client.get(endpoints::PAPER_SEARCH, &wire).await.map_err(|e| {
            ToolError::api("API request failed", e)
                .with_context("query", params.query.clone())
                .with_context("parameters", parameters.clone())
        })?;

        let total = result.get("total").and_then(Value::as_u64).unwrap_or(0);
        let returned = data_len(&result);
        tracing::info!(total, returned, "Paper search completed");

        formatters::with_metadata(result, &params.query, parameters, endpoints::PAPER_SEARCH)
            .ok_or_else(|| {
                ToolError::unexpected("search response is not a JSON object")
                    .with_context("query", params.query.clone())
            })
    }
}

/// Single paper lookup tool.
pub struct PaperDetailsTool;

#[async_trait::async_trait]
impl McpTool for PaperDetailsTool {
    fn name(&self) -> &'static str {
        "get_paper_details"
    }

    fn description(&self) -> &'static str {
        "Get detailed information about one paper. Accepts Semantic Scholar IDs and \
         external IDs such as DOI:10.1038/nature14539, ARXIV:1706.03762 or CorpusId:215416146."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "paper_id": id_property("Paper ID (Semantic Scholar ID, DOI:, ARXIV:, PMID:, CorpusId:, ...)"),
                "fields": fields_property(FieldSet::Paper)
            },
            "required": ["paper_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        let params: PaperDetailsInput = parse_input(input)?;
        let (paper_id, wire) = params.to_params()?;

        tracing::info!(paper_id = %paper_id, "Fetching paper details");

        fetch(ctx, "Error fetching paper details", &endpoints::paper(&paper_id), &wire)
            .await
            .map_err(|e| e.with_context("paper_id", paper_id))
    }
}

/// Paper authors listing tool.
pub struct PaperAuthorsTool;

#[async_trait::async_trait]
impl McpTool for PaperAuthorsTool {
    fn name(&self) -> &'static str {
        "get_paper_authors"
    }

    fn description(&self) -> &'static str {
        "List the authors of a paper, with pagination."
    }

    fn input_schema(&self) -> Value {
        paper_list_schema(FieldSet::Author)
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        list_paper_children(
            ctx,
            input,
            FieldSet::Author,
            "Error fetching paper authors",
            endpoints::paper_authors,
        )
        .await
    }
}

/// Citing papers listing tool.
pub struct PaperCitationsTool;

#[async_trait::async_trait]
impl McpTool for PaperCitationsTool {
    fn name(&self) -> &'static str {
        "get_paper_citations"
    }

    fn description(&self) -> &'static str {
        "List papers that cite a given paper. Entries may include citation contexts, \
         intents and an influential-citation flag."
    }

    fn input_schema(&self) -> Value {
        paper_list_schema(FieldSet::Citation)
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        list_paper_children(
            ctx,
            input,
            FieldSet::Citation,
            "Error fetching paper citations",
            endpoints::paper_citations,
        )
        .await
    }
}

/// Referenced papers listing tool.
pub struct PaperReferencesTool;

#[async_trait::async_trait]
impl McpTool for PaperReferencesTool {
    fn name(&self) -> &'static str {
        "get_paper_references"
    }

    fn description(&self) -> &'static str {
        "List papers referenced by a given paper, with pagination."
    }

    fn input_schema(&self) -> Value {
        paper_list_schema(FieldSet::Citation)
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        list_paper_children(
            ctx,
            input,
            FieldSet::Citation,
            "Error fetching paper references",
            endpoints::paper_references,
        )
        .await
    }
}

fn paper_list_schema(set: FieldSet) -> Value {
    json!({
        "type": "object",
        "properties": {
            "paper_id": id_property("Paper ID"),
            "fields": fields_property(set),
            "limit": page_limit_property(),
            "offset": offset_property()
        },
        "required": ["paper_id"]
    })
}

async fn list_paper_children(
    ctx: &ToolContext,
    input: Value,
    set: FieldSet,
    action: &'static str,
    endpoint: fn(&str) -> String,
) -> ToolResult<Value> {
    let params: PaperListInput = parse_input(input)?;
    let (paper_id, wire) = params.to_params(set)?;

    tracing::info!(paper_id = %paper_id, action, "Listing paper entries");

    let result = fetch(ctx, action, &endpoint(&paper_id), &wire)
        .await
        .map_err(|e| e.with_context("paper_id", paper_id))?;

    tracing::debug!(returned = data_len(&result), "Paper entries fetched");
    Ok(result)
}
