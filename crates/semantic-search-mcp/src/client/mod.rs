//! Semantic Scholar API client.
//!
//! Provides the single access path to the Graph API:
//! - Fixed pre-request delay and a lazily built, shared connection pool ([`RequestGate`])
//! - Deterministic classification of every failure into an [`ApiError`]
//! - Disclaimer stripping on every successful response
//!
//! The client performs exactly one HTTP call per request and never retries.
//! Callers that want retries can use [`ApiError::is_retryable`].

pub mod endpoints;
mod gate;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use serde_json::Value;
use url::Url;

pub use gate::RequestGate;

use crate::config::Config;
use crate::error::{ApiError, ApiResult, NetworkErrorKind};
use crate::formatters::strip_disclaimers;
use crate::models::WireParams;

/// HTTP methods the API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(ApiError::Unsupported { method: s.to_string() }),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Semantic Scholar API client.
///
/// Cheap to clone; clones share the gate and its connection pool.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// Pacing and pool ownership.
    gate: Arc<RequestGate>,

    /// API base URL, without trailing slash.
    base_url: String,

    /// Whether an API key is configured.
    has_api_key: bool,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configured headers are invalid.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let gate = RequestGate::new(&config)?;
        Ok(Self {
            gate: Arc::new(gate),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            has_api_key: config.has_api_key(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// The base URL endpoints are appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The pacing gate.
    #[must_use]
    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Close the connection pool. Idempotent.
    pub fn close(&self) {
        self.gate.close();
    }

    /// Perform one request with a method given by name.
    ///
    /// Anything other than `GET` or `POST` fails with
    /// [`ApiError::Unsupported`] before any network activity.
    pub async fn request(&self, endpoint: &str, params: &WireParams, method: &str) -> ApiResult {
        let method: HttpMethod = method.parse()?;
        self.send(method, endpoint, params).await
    }

    /// Perform one GET request; `params` become the query string.
    pub async fn get(&self, endpoint: &str, params: &WireParams) -> ApiResult {
        self.send(HttpMethod::Get, endpoint, params).await
    }

    /// Perform one POST request; `params` become a JSON object body.
    pub async fn post(&self, endpoint: &str, params: &WireParams) -> ApiResult {
        self.send(HttpMethod::Post, endpoint, params).await
    }

    async fn send(&self, method: HttpMethod, endpoint: &str, params: &WireParams) -> ApiResult {
        let url = self.url_for(method, endpoint, params)?;

        self.gate.wait().await;
        let _slot = self.gate.acquire().await?;
        let pool = self.gate.pool()?;

        tracing::info!(method = %method, url = %url, params = %params.to_json(), "Sending API request");

        let request = match method {
            HttpMethod::Get => pool.get(url),
            HttpMethod::Post => pool.post(url).json(&params.to_json()),
        };

        let outcome = match request.send().await {
            Ok(response) => read_response(response, endpoint).await,
            Err(e) => Err(classify_transport(&e)),
        };

        match &outcome {
            Ok(_) => tracing::info!(method = %method, endpoint, "API request successful"),
            Err(err) => tracing::warn!(
                method = %method,
                endpoint,
                error_type = err.kind(),
                error = %err,
                "API request failed"
            ),
        }
        outcome
    }

    /// Full URL for `endpoint`, with GET parameters in the query string.
    fn url_for(&self, method: HttpMethod, endpoint: &str, params: &WireParams) -> ApiResult<Url> {
        if endpoint.trim().is_empty() {
            return Err(ApiError::bad_request(400, "endpoint must not be empty", ""));
        }

        let raw = format!("{}{}", self.base_url, endpoint);
        let mut url = Url::parse(&raw).map_err(|e| {
            ApiError::network(NetworkErrorKind::Other, format!("invalid request URL {raw}: {e}"))
        })?;

        if method == HttpMethod::Get && !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.to_query());
        }
        Ok(url)
    }
}

impl fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.has_api_key)
            .finish()
    }
}

/// Turn a received response into parsed JSON or a classified error.
async fn read_response(response: reqwest::Response, endpoint: &str) -> ApiResult {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "Response status");

    if status.is_success() {
        let body = response.text().await.map_err(|e| classify_transport(&e))?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode { cause: e.to_string() })?;
        return Ok(strip_disclaimers(&value));
    }

    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status.as_u16(), &headers, &body, endpoint))
}

/// Map a non-2xx status to exactly one [`ApiError`] variant.
#[must_use]
pub fn classify_status(status: u16, headers: &HeaderMap, body: &str, endpoint: &str) -> ApiError {
    match status {
        400 => ApiError::bad_request(400, bad_request_message(body), body),
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden,
        404 => ApiError::not_found(endpoint),
        429 => ApiError::RateLimited {
            remaining: header_u64(headers, "X-RateLimit-Remaining"),
            retry_after: header_u64(headers, "Retry-After"),
        },
        500..=u16::MAX => ApiError::ServerError { status },
        _ => ApiError::bad_request(status, body, body),
    }
}

/// Classify a transport failure as timeout, connection or other.
#[must_use]
pub fn classify_transport(err: &reqwest::Error) -> ApiError {
    let cause = error_chain(err);
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else if err.is_connect() {
        NetworkErrorKind::Connection
    } else {
        network_kind_from_text(&cause)
    };
    ApiError::network(kind, cause)
}

/// Fallback classification from the error text.
#[must_use]
pub fn network_kind_from_text(cause: &str) -> NetworkErrorKind {
    let lower = cause.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        NetworkErrorKind::Timeout
    } else if lower.contains("connection") || lower.contains("dns") {
        NetworkErrorKind::Connection
    } else {
        NetworkErrorKind::Other
    }
}

/// Message for a 400 body: `message`, `error` and `details` when the body is
/// a JSON object, otherwise the raw text.
fn bad_request_message(body: &str) -> String {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) else {
        return format!("Invalid API parameters. Response: {body}");
    };

    let mut parts = Vec::new();
    if let Some(message) = obj.get("message") {
        parts.push(json_text(message));
    }
    if let Some(error) = obj.get("error") {
        parts.push(json_text(error));
    }
    if let Some(details) = obj.get("details") {
        parts.push(format!("Details: {}", json_text(details)));
    }

    if parts.is_empty() { body.to_string() } else { parts.join(" - ") }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name).and_then(|v| v.to_str().ok()).and_then(|v| v.trim().parse().ok())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("POST".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!(
            "DELETE".parse::<HttpMethod>().unwrap_err(),
            ApiError::Unsupported { method: "DELETE".to_string() }
        );
    }

    #[test]
    fn test_bad_request_json_body() {
        let body = r#"{"error": "Unrecognized or unsupported fields: [bogus]"}"#;
        let err = classify_status(400, &HeaderMap::new(), body, "/graph/v1/paper/search");
        match err {
            ApiError::BadRequest { status, message, raw_body } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Unrecognized or unsupported fields: [bogus]");
                assert_eq!(raw_body, body);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_bad_request_combines_message_parts() {
        let body = r#"{"message": "bad", "error": "worse", "details": "see docs"}"#;
        let err = classify_status(400, &HeaderMap::new(), body, "/x");
        assert!(matches!(err, ApiError::BadRequest { ref message, .. } if message == "bad - worse - Details: see docs"));
    }

    #[test]
    fn test_bad_request_text_body() {
        let err = classify_status(400, &HeaderMap::new(), "nope", "/x");
        assert!(matches!(err, ApiError::BadRequest { ref message, .. } if message.contains("nope")));
    }

    #[test]
    fn test_status_table() {
        let headers = HeaderMap::new();
        assert_eq!(classify_status(401, &headers, "", "/x"), ApiError::Unauthorized);
        assert_eq!(classify_status(403, &headers, "", "/x"), ApiError::Forbidden);
        assert_eq!(
            classify_status(404, &headers, "", "/graph/v1/paper/x"),
            ApiError::not_found("/graph/v1/paper/x")
        );
        assert_eq!(classify_status(500, &headers, "", "/x"), ApiError::ServerError { status: 500 });
        assert_eq!(classify_status(503, &headers, "", "/x"), ApiError::ServerError { status: 503 });
        assert_eq!(classify_status(418, &headers, "teapot", "/x"), ApiError::bad_request(418, "teapot", "teapot"));
    }

    #[test]
    fn test_rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("30"));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
        assert_eq!(
            classify_status(429, &headers, "", "/x"),
            ApiError::RateLimited { remaining: Some(0), retry_after: Some(30) }
        );

        // HTTP-date Retry-After is reported as unknown
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(
            classify_status(429, &headers, "", "/x"),
            ApiError::RateLimited { remaining: None, retry_after: None }
        );
    }

    #[test]
    fn test_network_kind_from_text() {
        assert_eq!(network_kind_from_text("operation timed out"), NetworkErrorKind::Timeout);
        assert_eq!(network_kind_from_text("Connection refused"), NetworkErrorKind::Connection);
        assert_eq!(network_kind_from_text("body error"), NetworkErrorKind::Other);
    }

    #[test]
    fn test_empty_endpoint_rejected_locally() {
        let client = SemanticScholarClient::new(Config::for_testing("http://127.0.0.1:1")).unwrap();
        let err = client.url_for(HttpMethod::Get, "", &WireParams::new()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn test_get_url_carries_query() {
        let client = SemanticScholarClient::new(Config::for_testing("http://localhost:9")).unwrap();
        let mut params = WireParams::new();
        params.push("query", "neural networks");
        params.push("limit", 3);
        let url = client.url_for(HttpMethod::Get, "/graph/v1/paper/search", &params).unwrap();
        assert_eq!(url.path(), "/graph/v1/paper/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("query".into(), "neural networks".into()), ("limit".into(), "3".into())]
        );

        let url = client.url_for(HttpMethod::Post, "/graph/v1/paper/search", &params).unwrap();
        assert!(url.query().is_none());
    }
}
