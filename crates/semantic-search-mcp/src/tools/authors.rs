//! Author tools: search_authors, get_author_details, get_author_papers.

use serde_json::{Value, json};

use super::schema::{fields_property, id_property, offset_property, page_limit_property, search_limit_property};
use super::{McpTool, ToolContext, data_len, fetch, parse_input};
use crate::client::endpoints;
use crate::config::fields::FieldSet;
use crate::error::ToolResult;
use crate::models::{AuthorDetailsInput, AuthorPapersInput, SearchAuthorsInput};

/// Author search tool.
pub struct SearchAuthorsTool;

#[async_trait::async_trait]
impl McpTool for SearchAuthorsTool {
    fn name(&self) -> &'static str {
        "search_authors"
    }

    fn description(&self) -> &'static str {
        "Search for authors by name. Returns profiles with paper and citation counts \
         and h-index when requested."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Author name to search (e.g., 'Geoffrey Hinton')"
                },
                "limit": search_limit_property(),
                "offset": offset_property(),
                "fields": fields_property(FieldSet::Author)
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        let params: SearchAuthorsInput = parse_input(input)?;
        let wire = params.to_params()?;

        tracing::info!(query = %params.query, "Searching authors");

        let result = fetch(ctx, "Error searching authors", endpoints::AUTHOR_SEARCH, &wire)
            .await
            .map_err(|e| e.with_context("query", params.query.clone()))?;

        tracing::info!(returned = data_len(&result), "Author search completed");
        Ok(result)
    }
}

/// Single author lookup tool.
pub struct AuthorDetailsTool;

#[async_trait::async_trait]
impl McpTool for AuthorDetailsTool {
    fn name(&self) -> &'static str {
        "get_author_details"
    }

    fn description(&self) -> &'static str {
        "Get the profile of one author: name, affiliations, homepage, paper count, \
         citation count and h-index."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "author_id": id_property("Semantic Scholar author ID"),
                "fields": fields_property(FieldSet::Author)
            },
            "required": ["author_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        let params: AuthorDetailsInput = parse_input(input)?;
        let (author_id, wire) = params.to_params()?;

        tracing::info!(author_id = %author_id, "Fetching author details");

        fetch(ctx, "Error fetching author details", &endpoints::author(&author_id), &wire)
            .await
            .map_err(|e| e.with_context("author_id", author_id))
    }
}

/// Author publications listing tool.
pub struct AuthorPapersTool;

#[async_trait::async_trait]
impl McpTool for AuthorPapersTool {
    fn name(&self) -> &'static str {
        "get_author_papers"
    }

    fn description(&self) -> &'static str {
        "List papers written by an author, with pagination."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "author_id": id_property("Semantic Scholar author ID"),
                "fields": fields_property(FieldSet::Paper),
                "limit": page_limit_property(),
                "offset": offset_property()
            },
            "required": ["author_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: Value) -> ToolResult<Value> {
        let params: AuthorPapersInput = parse_input(input)?;
        let (author_id, wire) = params.to_params()?;

        tracing::info!(author_id = %author_id, "Fetching author papers");

        let result = fetch(ctx, "Error fetching author papers", &endpoints::author_papers(&author_id), &wire)
            .await
            .map_err(|e| e.with_context("author_id", author_id))?;

        tracing::debug!(returned = data_len(&result), "Author papers fetched");
        Ok(result)
    }
}
