//! MCP resources: read-only JSON documents describing the server.

use serde_json::{Value, json};

use crate::config::fields::{self, FieldSet};
use crate::formatters;
use crate::models::MAX_LIMIT;
use crate::tools::ToolContext;

/// Trait for MCP resources.
pub trait McpResource: Send + Sync {
    /// Resource URI (e.g., "semantic-scholar://api-info").
    fn uri(&self) -> &'static str;

    /// Short display name.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    /// Build the document.
    fn read(&self, ctx: &ToolContext) -> Value;

    /// Listing entry for `resources/list`.
    fn definition(&self) -> Value {
        json!({
            "uri": self.uri(),
            "name": self.name(),
            "description": self.description(),
            "mimeType": self.mime_type(),
        })
    }

    /// Content entry for `resources/read`.
    fn contents(&self, ctx: &ToolContext) -> Value {
        json!({
            "uri": self.uri(),
            "mimeType": self.mime_type(),
            "text": formatters::pretty(&self.read(ctx)),
        })
    }
}

/// Register all resources.
#[must_use]
pub fn register_all_resources() -> Vec<Box<dyn McpResource>> {
    vec![Box::new(ApiInfoResource), Box::new(AvailableFieldsResource), Box::new(GuidelinesResource)]
}

/// Effective API configuration.
pub struct ApiInfoResource;

impl McpResource for ApiInfoResource {
    fn uri(&self) -> &'static str {
        "semantic-scholar://api-info"
    }

    fn name(&self) -> &'static str {
        "api-info"
    }

    fn description(&self) -> &'static str {
        "Semantic Scholar API configuration used by this server"
    }

    fn read(&self, ctx: &ToolContext) -> Value {
        let config = &ctx.config;
        json!({
            "api_base_url": ctx.client.base_url(),
            "has_api_key": ctx.client.has_api_key(),
            "rate_limit_delay": ctx.client.gate().delay_before_request().as_secs_f64(),
            "request_timeout": config.request_timeout.as_secs_f64(),
            "max_retries": config.max_retries,
            "retry_delay": config.retry_delay.as_secs_f64(),
            "server_name": config.server_name,
        })
    }
}

/// Field allow-lists per resource kind.
pub struct AvailableFieldsResource;

impl McpResource for AvailableFieldsResource {
    fn uri(&self) -> &'static str {
        "semantic-scholar://available-fields"
    }

    fn name(&self) -> &'static str {
        "available-fields"
    }

    fn description(&self) -> &'static str {
        "Valid values for the fields parameter, per resource kind"
    }

    fn read(&self, _ctx: &ToolContext) -> Value {
        json!({
            "paper_fields": fields::PAPER,
            "author_fields": fields::AUTHOR,
            "citation_fields": fields::CITATION,
        })
    }
}

/// Usage guidance for calling agents.
pub struct GuidelinesResource;

impl McpResource for GuidelinesResource {
    fn uri(&self) -> &'static str {
        "semantic-scholar://ai-agent-guidelines"
    }

    fn name(&self) -> &'static str {
        "ai-agent-guidelines"
    }

    fn description(&self) -> &'static str {
        "Parameter formats, workflows and error handling advice for agents using this server"
    }

    fn read(&self, ctx: &ToolContext) -> Value {
        let rate_limits = if ctx.client.has_api_key() {
            "API key configured: one request per second"
        } else {
            "No API key: roughly one request every three seconds"
        };

        json!({
            "overview": {
                "description": "Academic paper and author search over the Semantic Scholar Graph API",
                "api_version": "Graph API v1",
                "base_url": ctx.client.base_url(),
                "rate_limits": rate_limits
            },
            "parameters": {
                "fields": {
                    "format": "Comma-separated names, e.g. 'paperId,title,year'",
                    "paper_fields": FieldSet::Paper.names(),
                    "author_fields": FieldSet::Author.names(),
                    "citation_fields": FieldSet::Citation.names(),
                    "note": "Unknown names are rejected before any request is sent; the error lists them all"
                },
                "publication_date_or_year": {
                    "single_year": "2024",
                    "year_range": "2023:2024",
                    "month_range": "2024-01:2024-06",
                    "date_range": "2024-01-01:2024-12-31",
                    "open_ended": ["2020:", ":2020"],
                    "note": "'2023-2024' is accepted and rewritten to '2023:2024'"
                },
                "limit": {
                    "search_papers": format!("1-{MAX_LIMIT}, default 10; out-of-range values are rejected"),
                    "search_authors": format!("1-{MAX_LIMIT}, default 10; out-of-range values are rejected"),
                    "list_operations": format!(
                        "default 100; values above {MAX_LIMIT} are capped, values below 1 are rejected"
                    )
                },
                "offset": "Non-negative integer for pagination",
                "paper_id": [
                    "649def34f8be52c8b66281af98ae884c09aef38b",
                    "DOI:10.1038/nature14539",
                    "ARXIV:1706.03762",
                    "CorpusId:215416146"
                ]
            },
            "workflows": {
                "basic_search": [
                    "search_papers with a focused query and a small limit",
                    "get_paper_details for promising results",
                    "get_paper_citations or get_paper_references for related work"
                ],
                "author_research": [
                    "search_authors by name",
                    "get_author_details for the matching profile",
                    "get_author_papers to list their publications"
                ]
            },
            "error_handling": {
                "shape": "Failures are returned as a JSON object with an 'error' key, never as a protocol error",
                "retryable": "Check the 'retryable' flag; 'retry_after' gives seconds to wait when known",
                "advice": {
                    "400": "Fix the parameters named in the error and try again",
                    "401": "Check the configured API key",
                    "403": "The API key lacks access to this endpoint",
                    "404": "Check the identifier or search terms",
                    "429": "Wait for retry_after seconds, then retry",
                    "5xx": "Temporary upstream issue; retry after a short wait"
                }
            },
            "performance_tips": [
                "Request only the fields you need",
                "Use offset to page through large result sets",
                "Check 'total' before requesting many pages"
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn ctx() -> ToolContext {
        ToolContext::from_config(Config::for_testing("http://localhost:1")).unwrap()
    }

    #[test]
    fn test_api_info_reports_config() {
        let info = ApiInfoResource.read(&ctx());
        assert_eq!(info["api_base_url"], "http://localhost:1");
        assert_eq!(info["has_api_key"], false);
        assert_eq!(info["max_retries"], 3);
        assert_eq!(info["server_name"], "SemanticSearch");
    }

    #[test]
    fn test_available_fields_lists_all_sets() {
        let fields = AvailableFieldsResource.read(&ctx());
        assert_eq!(fields["paper_fields"].as_array().unwrap().len(), fields::PAPER.len());
        assert_eq!(fields["author_fields"].as_array().unwrap().len(), fields::AUTHOR.len());
        assert_eq!(fields["citation_fields"].as_array().unwrap().len(), fields::CITATION.len());
    }

    #[test]
    fn test_contents_is_pretty_json_text() {
        let contents = GuidelinesResource.contents(&ctx());
        assert_eq!(contents["uri"], "semantic-scholar://ai-agent-guidelines");
        let text = contents["text"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert!(parsed.get("error_handling").is_some());
    }

    #[test]
    fn test_uris_are_unique() {
        let resources = register_all_resources();
        let mut uris: Vec<_> = resources.iter().map(|r| r.uri()).collect();
        uris.sort_unstable();
        uris.dedup();
        assert_eq!(uris.len(), 3);
    }
}
