//! Input models for MCP tool parameters.
//!
//! Field names are the caller-facing snake_case names. Required identifiers
//! default to empty so a missing value is reported as a validation error on
//! that parameter rather than as a malformed arguments object.

use serde::{Deserialize, Serialize};

use super::params::{LimitPolicy, ParamBuilder, WireParams, require_id};
use crate::config::fields::FieldSet;
use crate::error::ValidationError;

fn default_search_limit() -> i64 {
    10
}

fn default_page_limit() -> i64 {
    100
}

/// Input for `search_papers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPapersInput {
    /// Search query (required).
    #[serde(default)]
    pub query: String,

    /// Results per page, 1-100.
    #[serde(default = "default_search_limit")]
    pub limit: i64,

    /// Pagination offset.
    #[serde(default)]
    pub offset: i64,

    /// Comma-separated paper fields.
    #[serde(default)]
    pub fields: Option<String>,

    /// Publication type filter, e.g. "JournalArticle,Conference".
    #[serde(default)]
    pub publication_types: Option<String>,

    /// Year or date range, e.g. "2024", "2023:2024", "2024-01:2024-06".
    #[serde(default)]
    pub publication_date_or_year: Option<String>,

    /// Minimum citation count.
    #[serde(default)]
    pub min_citation_count: Option<i64>,
}

impl SearchPapersInput {
    /// Validate and build wire parameters.
    pub fn to_params(&self) -> Result<WireParams, ValidationError> {
        Ok(ParamBuilder::new()
            .query(&self.query)?
            .limit(self.limit, LimitPolicy::Reject)?
            .offset(self.offset)?
            .fields(self.fields.as_deref(), FieldSet::Paper)?
            .publication_types(self.publication_types.as_deref())
            .publication_date_or_year(self.publication_date_or_year.as_deref())?
            .min_citation_count(self.min_citation_count)?
            .build())
    }
}

/// Input for `search_authors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAuthorsInput {
    /// Author name query (required).
    #[serde(default)]
    pub query: String,

    /// Results per page, 1-100.
    #[serde(default = "default_search_limit")]
    pub limit: i64,

    /// Pagination offset.
    #[serde(default)]
    pub offset: i64,

    /// Comma-separated author fields.
    #[serde(default)]
    pub fields: Option<String>,
}

impl SearchAuthorsInput {
    /// Validate and build wire parameters.
    pub fn to_params(&self) -> Result<WireParams, ValidationError> {
        Ok(ParamBuilder::new()
            .query(&self.query)?
            .limit(self.limit, LimitPolicy::Reject)?
            .offset(self.offset)?
            .fields(self.fields.as_deref(), FieldSet::Author)?
            .build())
    }
}

/// Input for `get_paper_details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDetailsInput {
    /// Paper ID, or an external ID such as `DOI:10.1038/nature14539`.
    #[serde(default)]
    pub paper_id: String,

    /// Comma-separated paper fields.
    #[serde(default)]
    pub fields: Option<String>,
}

impl PaperDetailsInput {
    /// Validate, returning the trimmed ID and wire parameters.
    pub fn to_params(&self) -> Result<(String, WireParams), ValidationError> {
        let id = require_id("paper_id", &self.paper_id)?;
        let params = ParamBuilder::new().fields(self.fields.as_deref(), FieldSet::Paper)?.build();
        Ok((id, params))
    }
}

/// Input for `get_author_details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDetailsInput {
    /// Author ID.
    #[serde(default)]
    pub author_id: String,

    /// Comma-separated author fields.
    #[serde(default)]
    pub fields: Option<String>,
}

impl AuthorDetailsInput {
    /// Validate, returning the trimmed ID and wire parameters.
    pub fn to_params(&self) -> Result<(String, WireParams), ValidationError> {
        let id = require_id("author_id", &self.author_id)?;
        let params = ParamBuilder::new().fields(self.fields.as_deref(), FieldSet::Author)?.build();
        Ok((id, params))
    }
}

/// Input for paging over a paper's authors, citations or references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperListInput {
    /// Paper ID.
    #[serde(default)]
    pub paper_id: String,

    /// Comma-separated fields.
    #[serde(default)]
    pub fields: Option<String>,

    /// Page size; values above 100 are clamped.
    #[serde(default = "default_page_limit")]
    pub limit: i64,

    /// Pagination offset.
    #[serde(default)]
    pub offset: i64,
}

impl PaperListInput {
    /// Validate against `set`, returning the trimmed ID and wire parameters.
    pub fn to_params(&self, set: FieldSet) -> Result<(String, WireParams), ValidationError> {
        let id = require_id("paper_id", &self.paper_id)?;
        let params = paged(self.limit, self.offset, self.fields.as_deref(), set)?;
        Ok((id, params))
    }
}

/// Input for `get_author_papers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPapersInput {
    /// Author ID.
    #[serde(default)]
    pub author_id: String,

    /// Comma-separated paper fields.
    #[serde(default)]
    pub fields: Option<String>,

    /// Page size; values above 100 are clamped.
    #[serde(default = "default_page_limit")]
    pub limit: i64,

    /// Pagination offset.
    #[serde(default)]
    pub offset: i64,
}

impl AuthorPapersInput {
    /// Validate, returning the trimmed ID and wire parameters.
    pub fn to_params(&self) -> Result<(String, WireParams), ValidationError> {
        let id = require_id("author_id", &self.author_id)?;
        let params = paged(self.limit, self.offset, self.fields.as_deref(), FieldSet::Paper)?;
        Ok((id, params))
    }
}

fn paged(
    limit: i64,
    offset: i64,
    fields: Option<&str>,
    set: FieldSet,
) -> Result<WireParams, ValidationError> {
    Ok(ParamBuilder::new()
        .limit(limit, LimitPolicy::Clamp)?
        .offset(offset)?
        .fields(fields, set)?
        .build())
}
