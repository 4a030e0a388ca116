//! Validation and normalization of caller input into wire parameters.
//!
//! Every rule here runs before any network call; a violation becomes a
//! [`ValidationError`] naming the caller-facing parameter.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::fields::FieldSet;
use crate::error::ValidationError;

/// Exact parameter names expected by the API.
pub mod wire {
    pub const QUERY: &str = "query";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const FIELDS: &str = "fields";
    pub const PUBLICATION_TYPES: &str = "publicationTypes";
    pub const PUBLICATION_DATE_OR_YEAR: &str = "publicationDateOrYear";
    pub const MIN_CITATION_COUNT: &str = "minCitationCount";
}

/// Largest page the API serves.
pub const MAX_LIMIT: i64 = 100;

/// `YYYY-YYYY`, the one shape rewritten before transmission.
static HYPHEN_YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("valid year range regex"));

/// Ordered query/body parameters of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireParams(Vec<(&'static str, Value)>);

impl WireParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, replacing an earlier one with the same name.
    pub fn push(&mut self, name: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.0.iter().map(|(n, v)| (*n, v))
    }

    /// Render as query-string pairs. Strings are sent without JSON quoting.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(n, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (*n, rendered)
            })
            .collect()
    }

    /// Render as a JSON object (POST bodies, metadata echoes).
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(n, v)| ((*n).to_string(), v.clone())).collect::<Map<_, _>>())
    }
}

/// How an operation treats a `limit` above [`MAX_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPolicy {
    /// Search operations: out-of-range values are rejected.
    Reject,
    /// Paging over sub-resources: values above the maximum are clamped.
    Clamp,
}

/// Builds [`WireParams`] for one request, validating as it goes.
#[derive(Debug, Default)]
pub struct ParamBuilder {
    params: WireParams,
}

impl ParamBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Required free-text query, sent trimmed.
    pub fn query(mut self, raw: &str) -> Result<Self, ValidationError> {
        let query = require_text("query", raw)?;
        self.params.push(wire::QUERY, query);
        Ok(self)
    }

    pub fn limit(mut self, limit: i64, policy: LimitPolicy) -> Result<Self, ValidationError> {
        let limit = check_limit(limit, policy)?;
        self.params.push(wire::LIMIT, limit);
        Ok(self)
    }

    pub fn offset(mut self, offset: i64) -> Result<Self, ValidationError> {
        if offset < 0 {
            return Err(ValidationError::Negative { parameter: "offset", value: offset });
        }
        self.params.push(wire::OFFSET, offset);
        Ok(self)
    }

    /// Comma-separated field list checked against `set`. Blank means absent.
    pub fn fields(mut self, raw: Option<&str>, set: FieldSet) -> Result<Self, ValidationError> {
        if let Some(fields) = check_fields(raw, set)? {
            self.params.push(wire::FIELDS, fields);
        }
        Ok(self)
    }

    #[must_use]
    pub fn publication_types(mut self, raw: Option<&str>) -> Self {
        if let Some(types) = raw.map(str::trim).filter(|t| !t.is_empty()) {
            self.params.push(wire::PUBLICATION_TYPES, types);
        }
        self
    }

    pub fn publication_date_or_year(mut self, raw: Option<&str>) -> Result<Self, ValidationError> {
        if let Some(raw) = raw {
            let normalized = normalize_date_range(raw)?;
            self.params.push(wire::PUBLICATION_DATE_OR_YEAR, normalized);
        }
        Ok(self)
    }

    pub fn min_citation_count(mut self, raw: Option<i64>) -> Result<Self, ValidationError> {
        if let Some(count) = raw {
            if count < 0 {
                return Err(ValidationError::Negative { parameter: "min_citation_count", value: count });
            }
            self.params.push(wire::MIN_CITATION_COUNT, count);
        }
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> WireParams {
        self.params
    }
}

/// Trimmed, non-empty text or a validation error for `parameter`.
pub fn require_text(parameter: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { parameter, value: raw.to_string() });
    }
    Ok(trimmed.to_string())
}

/// Trimmed ID for `parameter`, rejecting `.` and `..` segments that URL
/// parsing would collapse into a different endpoint.
pub fn require_id(parameter: &'static str, raw: &str) -> Result<String, ValidationError> {
    let id = require_text(parameter, raw)?;
    if id.split(['/', '\\']).any(|segment| segment == "." || segment == "..") {
        return Err(ValidationError::PathSegment { parameter, value: id });
    }
    Ok(id)
}

/// Apply the limit policy.
pub fn check_limit(limit: i64, policy: LimitPolicy) -> Result<i64, ValidationError> {
    let out_of_range =
        || ValidationError::OutOfRange { parameter: "limit", value: limit, min: 1, max: MAX_LIMIT };
    match policy {
        _ if limit < 1 => Err(out_of_range()),
        LimitPolicy::Reject if limit > MAX_LIMIT => Err(out_of_range()),
        LimitPolicy::Clamp => Ok(limit.min(MAX_LIMIT)),
        LimitPolicy::Reject => Ok(limit),
    }
}

/// Validate every token of a comma-separated field list.
///
/// All invalid tokens are reported together, in request order.
pub fn check_fields(raw: Option<&str>, set: FieldSet) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };

    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    let invalid: Vec<String> =
        tokens.iter().filter(|t| !set.contains(t)).map(|t| (*t).to_string()).collect();

    if !invalid.is_empty() {
        return Err(ValidationError::UnknownFields { invalid, valid: set.sorted() });
    }
    Ok(Some(tokens.join(",")))
}

/// Trim a date filter and rewrite `YYYY-YYYY` to `YYYY:YYYY`.
///
/// Other shapes (`2024`, `2023:2024`, `2024-01:2024-06`, full dates) pass
/// through unchanged.
pub fn normalize_date_range(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty {
            parameter: "publication_date_or_year",
            value: raw.to_string(),
        });
    }

    if let Some(caps) = HYPHEN_YEAR_RANGE.captures(trimmed) {
        let normalized = format!("{}:{}", &caps[1], &caps[2]);
        tracing::debug!(input = trimmed, normalized = %normalized, "Converted date range format");
        return Ok(normalized);
    }
    Ok(trimmed.to_string())
}
