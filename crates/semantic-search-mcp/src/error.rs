//! Error types for the Semantic Search MCP server.
//!
//! Uses `thiserror` for structured error handling. Operations never let these
//! escape to the protocol layer: [`ToolError::envelope`] renders each one as
//! a `{"error": ...}` JSON object.

use serde_json::{Map, Value, json};

/// Sub-classification of transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The request exceeded the configured timeout.
    Timeout,
    /// The host could not be reached (refused, DNS, TLS handshake).
    Connection,
    /// Any other transport failure.
    Other,
}

impl NetworkErrorKind {
    /// Stable name used in error envelopes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Other => "other",
        }
    }
}

/// A classified failure of a single upstream call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400, or any 4xx without a dedicated variant.
    #[error("Bad Request ({status}): {message}")]
    BadRequest {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
        /// Raw response body
        raw_body: String,
    },

    /// 401 response
    #[error("Authentication failed (401): Invalid or missing API key")]
    Unauthorized,

    /// 403 response
    #[error("Access forbidden (403): API key lacks required permissions")]
    Forbidden,

    /// 404 response
    #[error("Resource not found (404): {endpoint}")]
    NotFound {
        /// Endpoint that was requested
        endpoint: String,
    },

    /// 429 response
    #[error(
        "Rate limit exceeded (429): Remaining: {}, Retry after: {}",
        display_or_unknown(.remaining),
        display_seconds(.retry_after)
    )]
    RateLimited {
        /// Remaining quota from `X-RateLimit-Remaining`
        remaining: Option<u64>,
        /// Seconds from `Retry-After`
        retry_after: Option<u64>,
    },

    /// 5xx response
    #[error("Server error ({status}): Semantic Scholar API is experiencing issues")]
    ServerError {
        /// HTTP status code
        status: u16,
    },

    /// Transport-level failure
    #[error("{}", network_message(.kind, .cause))]
    Network {
        /// Timeout, connection or other
        kind: NetworkErrorKind,
        /// Underlying error text
        cause: String,
    },

    /// 2xx response whose body is not valid JSON
    #[error("Invalid JSON response from API: {cause}")]
    Decode {
        /// Parser error text
        cause: String,
    },

    /// Method other than GET or POST
    #[error("Unsupported HTTP method: {method}")]
    Unsupported {
        /// Method as given by the caller
        method: String,
    },
}

fn display_or_unknown(value: &Option<u64>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

fn display_seconds(value: &Option<u64>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| format!("{v}s"))
}

fn network_message(kind: &NetworkErrorKind, cause: &str) -> String {
    match kind {
        NetworkErrorKind::Timeout => "Request timeout: API took too long to respond".to_string(),
        NetworkErrorKind::Connection => {
            "Connection error: Unable to reach Semantic Scholar API".to_string()
        }
        NetworkErrorKind::Other => format!("Network error: {cause}"),
    }
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(status: u16, message: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self::BadRequest { status, message: message.into(), raw_body: raw_body.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(endpoint: impl Into<String>) -> Self {
        Self::NotFound { endpoint: endpoint.into() }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(kind: NetworkErrorKind, cause: impl Into<String>) -> Self {
        Self::Network { kind, cause: cause.into() }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ServerError { .. } | Self::Network { .. })
    }

    /// Get the retry-after hint in seconds if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status behind this error, if it came from a response.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. } | Self::ServerError { status } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Network { .. } | Self::Decode { .. } | Self::Unsupported { .. } => None,
        }
    }

    /// Short machine-readable variant name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::Network { .. } => "network_error",
            Self::Decode { .. } => "decode_error",
            Self::Unsupported { .. } => "unsupported_method",
        }
    }

    /// Advice for the calling agent.
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            Self::BadRequest { .. } => "Check API parameters format and try again".to_string(),
            Self::Unauthorized | Self::Forbidden => {
                "Check the configured SEMANTIC_SCHOLAR_API_KEY".to_string()
            }
            Self::NotFound { .. } => "Try a different ID or search terms".to_string(),
            Self::RateLimited { retry_after: Some(secs), .. } => {
                format!("Wait {secs} seconds before retrying")
            }
            Self::RateLimited { retry_after: None, .. } => {
                "Wait and retry with exponential backoff".to_string()
            }
            Self::ServerError { .. } | Self::Network { .. } => {
                "Wait and retry, the failure may be temporary".to_string()
            }
            Self::Decode { .. } | Self::Unsupported { .. } => {
                "Please report this error to the server administrator".to_string()
            }
        }
    }

    /// Structured fields added to the error envelope.
    fn envelope_fields(&self, out: &mut Map<String, Value>) {
        out.insert("error_type".into(), json!(self.kind()));
        out.insert("retryable".into(), json!(self.is_retryable()));
        if let Some(status) = self.status_code() {
            out.insert("status_code".into(), json!(status));
        }
        match self {
            Self::NotFound { endpoint } => {
                out.insert("endpoint".into(), json!(endpoint));
            }
            Self::RateLimited { remaining, retry_after } => {
                out.insert("retry_after".into(), retry_after.map_or(json!("unknown"), |s| json!(s)));
                out.insert("remaining".into(), remaining.map_or(json!("unknown"), |r| json!(r)));
            }
            Self::Network { kind, .. } => {
                out.insert("network_error".into(), json!(kind.as_str()));
            }
            _ => {}
        }
    }
}

/// Caller input rejected before any network call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required text parameter is missing or blank.
    #[error("{parameter} is required and cannot be empty")]
    Empty {
        /// Caller-facing parameter name
        parameter: &'static str,
        /// Value as received, before trimming
        value: String,
    },

    /// An ID contains a `.` or `..` path segment.
    #[error("{parameter} must not contain '.' or '..' path segments")]
    PathSegment {
        /// Caller-facing parameter name
        parameter: &'static str,
        /// Rejected value
        value: String,
    },

    /// A numeric parameter is outside its range.
    #[error("{parameter} must be between {min} and {max}")]
    OutOfRange {
        /// Caller-facing parameter name
        parameter: &'static str,
        /// Rejected value
        value: i64,
        /// Inclusive minimum
        min: i64,
        /// Inclusive maximum
        max: i64,
    },

    /// A numeric parameter is negative.
    #[error("{parameter} must be non-negative")]
    Negative {
        /// Caller-facing parameter name
        parameter: &'static str,
        /// Rejected value
        value: i64,
    },

    /// One or more requested field names are not in the allow-list.
    #[error("Invalid field names: {invalid:?}. Valid fields: {valid:?}")]
    UnknownFields {
        /// Every rejected token, in request order
        invalid: Vec<String>,
        /// The full allow-list, sorted
        valid: Vec<&'static str>,
    },

    /// The arguments object does not match the input schema.
    #[error("Invalid arguments: {message}")]
    Malformed {
        /// Deserializer message
        message: String,
    },
}

impl ValidationError {
    /// Caller-facing name of the offending parameter.
    #[must_use]
    pub const fn parameter(&self) -> &'static str {
        match self {
            Self::Empty { parameter, .. }
            | Self::PathSegment { parameter, .. }
            | Self::OutOfRange { parameter, .. }
            | Self::Negative { parameter, .. } => parameter,
            Self::UnknownFields { .. } => "fields",
            Self::Malformed { .. } => "arguments",
        }
    }

    fn envelope_fields(&self, out: &mut Map<String, Value>) {
        out.insert("parameter".into(), json!(self.parameter()));
        match self {
            Self::OutOfRange { value, .. } | Self::Negative { value, .. } => {
                out.insert("value".into(), json!(value));
            }
            Self::UnknownFields { invalid, valid } => {
                out.insert("invalid_fields".into(), json!(invalid));
                out.insert("valid_fields".into(), json!(valid));
            }
            Self::Empty { value, .. } | Self::PathSegment { value, .. } => {
                out.insert("value".into(), json!(value));
            }
            Self::Malformed { .. } => {}
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed { message: err.to_string() }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Input validation failed
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The upstream call failed
    #[error("{action}: {source}")]
    Api {
        /// What the operation was doing, e.g. "Error fetching paper details"
        action: &'static str,
        /// Classified upstream failure
        source: ApiError,
        /// Extra envelope fields
        context: Map<String, Value>,
    },

    /// Anything not anticipated above
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Description
        message: String,
        /// Extra envelope fields
        context: Map<String, Value>,
    },
}

impl ToolError {
    /// Wrap an upstream failure.
    #[must_use]
    pub fn api(action: &'static str, source: ApiError) -> Self {
        Self::Api { action, source, context: Map::new() }
    }

    /// Create an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected { message: message.into(), context: Map::new() }
    }

    /// Attach an extra envelope field. Validation errors carry their own.
    #[must_use]
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        match &mut self {
            Self::Api { context, .. } | Self::Unexpected { context, .. } => {
                context.insert(key.to_string(), value.into());
            }
            Self::Validation(_) => {}
        }
        self
    }

    /// The upstream error, if this failure came from the API.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Render as the JSON error envelope returned to the calling agent.
    #[must_use]
    pub fn envelope(&self) -> Value {
        let mut out = Map::new();
        out.insert("error".into(), json!(self.to_string()));
        match self {
            Self::Validation(err) => err.envelope_fields(&mut out),
            Self::Api { source, context, .. } => {
                source.envelope_fields(&mut out);
                out.insert("suggestion".into(), json!(source.suggestion()));
                out.extend(context.clone());
            }
            Self::Unexpected { context, .. } => {
                out.insert(
                    "suggestion".into(),
                    json!("Please report this error to the server administrator"),
                );
                out.extend(context.clone());
            }
        }
        Value::Object(out)
    }
}

/// Result type alias for client operations.
pub type ApiResult<T = Value> = Result<T, ApiError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_retryable() {
        assert!(ApiError::RateLimited { remaining: None, retry_after: Some(60) }.is_retryable());
        assert!(ApiError::network(NetworkErrorKind::Timeout, "timed out").is_retryable());
        assert!(ApiError::ServerError { status: 500 }.is_retryable());

        assert!(!ApiError::not_found("/graph/v1/paper/x").is_retryable());
        assert!(!ApiError::bad_request(400, "invalid query", "").is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::Forbidden.is_retryable());
    }

    #[test]
    fn test_rate_limited_message_marks_unknowns() {
        let err = ApiError::RateLimited { remaining: None, retry_after: None };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded (429): Remaining: unknown, Retry after: unknown"
        );

        let err = ApiError::RateLimited { remaining: Some(0), retry_after: Some(30) };
        assert!(err.to_string().contains("Retry after: 30s"));
        assert_eq!(err.retry_after(), Some(30));
    }

    #[test]
    fn test_validation_envelope_lists_invalid_fields() {
        let err = ToolError::from(ValidationError::UnknownFields {
            invalid: vec!["bogus".to_string()],
            valid: vec!["title"],
        });
        let envelope = err.envelope();
        assert_eq!(envelope["parameter"], "fields");
        assert_eq!(envelope["invalid_fields"], json!(["bogus"]));
        assert_eq!(envelope["valid_fields"], json!(["title"]));
    }

    #[test]
    fn test_validation_envelope_reports_received_value() {
        let envelope = ToolError::from(ValidationError::Empty { parameter: "query", value: "  ".into() }).envelope();
        assert_eq!(envelope["parameter"], "query");
        assert_eq!(envelope["value"], "  ");

        let envelope =
            ToolError::from(ValidationError::PathSegment { parameter: "author_id", value: "../x".into() }).envelope();
        assert_eq!(envelope["parameter"], "author_id");
        assert_eq!(envelope["value"], "../x");
    }

    #[test]
    fn test_api_envelope_includes_context() {
        let err = ToolError::api("API request failed", ApiError::not_found("/graph/v1/paper/x"))
            .with_context("query", "x");
        let envelope = err.envelope();
        assert_eq!(envelope["error"], "API request failed: Resource not found (404): /graph/v1/paper/x");
        assert_eq!(envelope["endpoint"], "/graph/v1/paper/x");
        assert_eq!(envelope["status_code"], 404);
        assert_eq!(envelope["query"], "x");
        assert_eq!(envelope["retryable"], false);
    }

    #[test]
    fn test_malformed_arguments_from_serde() {
        let err: ValidationError =
            serde_json::from_str::<u32>("\"x\"").map_err(ValidationError::from).unwrap_err();
        assert_eq!(err.parameter(), "arguments");
    }
}
