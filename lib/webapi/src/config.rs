//! Transport settings for [`HyperClient`](crate::HyperClient).
//!
//! Every [`Interface`](crate::Interface) built on one client shares these
//! settings, descendants included.

use std::time::Duration;

/// Default `User-Agent` sent when a request does not set one.
pub const DEFAULT_USER_AGENT: &str = concat!("webapi/", env!("CARGO_PKG_VERSION"));

/// Timeouts, pooling and identification for one [`HyperClient`](crate::HyperClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for a whole exchange: connecting, sending and buffering the
    /// body. Exceeding it yields [`Error::Timeout`](crate::Error::Timeout).
    pub timeout: Duration,
    /// Deadline for TCP connect alone.
    pub connect_timeout: Duration,
    /// Idle keep-alive connections kept per API host.
    pub pool_idle_per_host: usize,
    /// How long an unused pooled connection stays open.
    pub pool_idle_timeout: Duration,
    /// Sent as `User-Agent` when neither the request nor the interface's
    /// default headers carry one.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Builder starting from the defaults (30 s exchange, 10 s connect).
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]; unset fields keep their default.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Deadline for the whole exchange, body included.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Deadline for TCP connect.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Idle connections kept per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Fallback `User-Agent`.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}
