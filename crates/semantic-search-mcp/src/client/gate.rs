//! Request pacing and ownership of the shared connection pool.
//!
//! The gate applies a fixed pause before every request. It is not a token
//! bucket: concurrent callers each sleep independently, so the pause bounds
//! throughput only when callers are serialized.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::{Config, api};
use crate::error::{ApiError, NetworkErrorKind};

/// Paces outbound requests and lazily owns the HTTP connection pool.
pub struct RequestGate {
    /// Pause before every request.
    delay: Duration,

    /// Headers installed on the pool.
    headers: HeaderMap,

    request_timeout: Duration,
    connect_timeout: Duration,

    /// Ceiling on in-flight requests; extra callers queue here.
    slots: Semaphore,

    /// The pool, built on first use. `None` before first use and after close.
    pool: Mutex<Option<Client>>,
}

impl RequestGate {
    /// Create a gate. No connections are opened until the first request.
    ///
    /// # Errors
    ///
    /// Returns error if the API key or server name is not a valid header value.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent())?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref key) = config.api_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        Ok(Self {
            delay: config.rate_limit_delay,
            headers,
            request_timeout: config.request_timeout,
            connect_timeout: config.connect_timeout,
            slots: Semaphore::new(api::MAX_CONNECTIONS),
            pool: Mutex::new(None),
        })
    }

    /// Delay awaited before each request.
    #[must_use]
    pub const fn delay_before_request(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Take one of the connection slots, queueing if all are busy.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, ApiError> {
        self.slots
            .acquire()
            .await
            .map_err(|e| ApiError::network(NetworkErrorKind::Other, e.to_string()))
    }

    /// The shared pool, built on first call.
    ///
    /// Concurrent first callers serialize on the guard and all receive the
    /// same instance. `Client` is reference-counted, so the returned clone
    /// shares connections with every other caller.
    pub fn pool(&self) -> Result<Client, ApiError> {
        let mut slot = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .default_headers(self.headers.clone())
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::network(NetworkErrorKind::Other, e.to_string()))?;

        tracing::debug!("HTTP connection pool created");
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Whether the pool currently exists.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Drop the pool. Safe to call repeatedly and before any request.
    ///
    /// Requests still in flight keep their own handle and finish normally;
    /// idle connections close once the last handle is gone. A later request
    /// builds a fresh pool.
    pub fn close(&self) {
        let closed = self.pool.lock().unwrap_or_else(PoisonError::into_inner).take();
        if closed.is_some() {
            tracing::debug!("HTTP connection pool closed");
        }
    }
}

impl std::fmt::Debug for RequestGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGate")
            .field("delay", &self.delay)
            .field("open", &self.is_open())
            .finish()
    }
}
