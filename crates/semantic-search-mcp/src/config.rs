//! Configuration for the Semantic Search MCP server.
//!
//! Settings are resolved once at start-up (environment, optional `.env`
//! file, then CLI overrides) and are read-only afterwards.

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Semantic Scholar API.
    pub const BASE_URL: &str = "https://api.semanticscholar.org";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay before every request with an API key (1 req/s).
    pub const RATE_LIMIT_DELAY_WITH_KEY: Duration = Duration::from_secs(1);

    /// Delay before every request without an API key (100 req / 5 min).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(3);

    /// Maximum concurrent in-flight requests.
    pub const MAX_CONNECTIONS: usize = 10;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 5;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Declared retry budget (reported, not acted on by the client).
    pub const MAX_RETRIES: u32 = 3;

    /// Declared retry delay (reported, not acted on by the client).
    pub const RETRY_DELAY: Duration = Duration::from_secs(1);
}

/// Field allow-lists accepted by each resource kind.
pub mod fields {
    /// Fields accepted for paper resources.
    pub const PAPER: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "venue",
        "year",
        "referenceCount",
        "citationCount",
        "influentialCitationCount",
        "isOpenAccess",
        "fieldsOfStudy",
        "s2FieldsOfStudy",
        "publicationTypes",
        "publicationDate",
        "journal",
        "authors",
        "citations",
        "references",
        "url",
        "publicationVenue",
        "externalIds",
        "openAccessPdf",
    ];

    /// Fields accepted for author resources.
    pub const AUTHOR: &[&str] = &[
        "authorId",
        "name",
        "affiliations",
        "homepage",
        "paperCount",
        "citationCount",
        "hIndex",
        "papers",
    ];

    /// Fields accepted for citation and reference edges.
    pub const CITATION: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "venue",
        "year",
        "authors",
        "isInfluential",
        "contexts",
        "intents",
    ];

    /// Which allow-list applies to an operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FieldSet {
        Paper,
        Author,
        Citation,
    }

    impl FieldSet {
        /// The permitted field names.
        #[must_use]
        pub const fn names(self) -> &'static [&'static str] {
            match self {
                Self::Paper => PAPER,
                Self::Author => AUTHOR,
                Self::Citation => CITATION,
            }
        }

        /// Whether `field` is permitted.
        #[must_use]
        pub fn contains(self, field: &str) -> bool {
            self.names().contains(&field)
        }

        /// Permitted names in sorted order, for error guidance.
        #[must_use]
        pub fn sorted(self) -> Vec<&'static str> {
            let mut names = self.names().to_vec();
            names.sort_unstable();
            names
        }
    }
}

/// How the server is hosted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// Stateless streamable HTTP with JSON responses.
    #[default]
    #[value(name = "streamable-http", alias = "http")]
    StreamableHttp,
}

impl Transport {
    /// Parse a transport name. Anything other than `stdio` selects HTTP.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("stdio") {
            Self::Stdio
        } else {
            Self::StreamableHttp
        }
    }

    /// Canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::StreamableHttp => "streamable-http",
        }
    }
}

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// API base URL, without the `/graph/v1` suffix.
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay awaited before every request.
    pub rate_limit_delay: Duration,

    /// Declared retry budget.
    pub max_retries: u32,

    /// Declared delay between retries.
    pub retry_delay: Duration,

    /// Server name, also used in the User-Agent.
    pub server_name: String,

    /// HTTP bind host.
    pub host: String,

    /// HTTP bind port.
    pub port: u16,

    /// Default log level.
    pub log_level: String,

    /// Transport mode.
    pub transport: Transport,
}

impl Config {
    /// Create a new configuration with optional API key.
    ///
    /// The pre-request delay follows the API's published limits:
    /// 1s with a key, 3s without.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let rate_limit_delay = rate_limit_delay_for(api_key.is_some());
        Self {
            api_key,
            base_url: api::BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay,
            max_retries: api::MAX_RETRIES,
            retry_delay: api::RETRY_DELAY,
            server_name: "SemanticSearch".to_string(),
            host: "localhost".to_string(),
            port: 5002,
            log_level: "INFO".to_string(),
            transport: Transport::default(),
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::ZERO, // No delay in tests
            ..Self::new(None)
        }
    }

    /// Create configuration from environment variables (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        // A missing .env file is fine.
        let _ = dotenv::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup("SEMANTIC_SCHOLAR_API_KEY"));

        if let Some(url) = lookup("SEMANTIC_SCHOLAR_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(name) = lookup("MCP_SERVER_NAME") {
            config.server_name = name;
        }
        if let Some(host) = lookup("MCP_SERVER_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var::<u16>(&lookup, "MCP_SERVER_PORT")? {
            config.port = port;
        }
        if let Some(level) = lookup("MCP_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "REQUEST_TIMEOUT")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<u32>(&lookup, "MAX_RETRIES")? {
            config.max_retries = retries;
        }
        if let Some(secs) = parse_var::<f64>(&lookup, "RETRY_DELAY")? {
            config.retry_delay = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("RETRY_DELAY must be a non-negative number, got {secs}"))?;
        }
        if let Some(mode) = lookup("MCP_TRANSPORT") {
            config.transport = Transport::from_name(&mode);
        }

        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// User-Agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        format!("{}/1.0", self.server_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_api_key", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("server_name", &self.server_name)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Delay awaited before each request, by API key presence.
#[must_use]
pub const fn rate_limit_delay_for(has_api_key: bool) -> Duration {
    if has_api_key { api::RATE_LIMIT_DELAY_WITH_KEY } else { api::RATE_LIMIT_DELAY }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("invalid value for {name}: {raw:?}")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.rate_limit_delay, Duration::from_secs(3));
        assert_eq!(config.transport, Transport::StreamableHttp);
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("test-key".to_string()));
        assert!(config.has_api_key());
        assert_eq!(config.rate_limit_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_empty_api_key_is_no_key() {
        let config = Config::new(Some(String::new()));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_from_lookup_reads_all_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("SEMANTIC_SCHOLAR_BASE_URL", "http://localhost:9999/"),
            ("MCP_SERVER_NAME", "Scholar"),
            ("MCP_SERVER_PORT", "7000"),
            ("REQUEST_TIMEOUT", "12"),
            ("MAX_RETRIES", "5"),
            ("RETRY_DELAY", "2.5"),
            ("MCP_TRANSPORT", "STDIO"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.user_agent(), "Scholar/1.0");
        assert_eq!(config.port, 7000);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(2500));
        assert_eq!(config.transport, Transport::Stdio);
    }

    #[test]
    fn test_from_lookup_rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[("MCP_SERVER_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("MCP_SERVER_PORT"));
    }

    #[test]
    fn test_unknown_transport_falls_back_to_http() {
        assert_eq!(Transport::from_name("sse"), Transport::StreamableHttp);
        assert_eq!(Transport::from_name("http"), Transport::StreamableHttp);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config::new(Some("super-secret".to_string()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("has_api_key"));
    }

    #[test]
    fn test_field_sets() {
        assert_eq!(fields::PAPER.len(), 21);
        assert!(fields::FieldSet::Author.contains("hIndex"));
        assert!(!fields::FieldSet::Citation.contains("hIndex"));
        let sorted = fields::FieldSet::Citation.sorted();
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}
