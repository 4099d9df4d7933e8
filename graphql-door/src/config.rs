//! Client configuration.

use std::env;
use std::time::Duration;

use crate::{DoorError, Result};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct DoorClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Default headers for all requests.
    pub default_headers: Vec<(String, String)>,
    /// User agent string.
    pub user_agent: String,
    /// Header that carries the resolved credential.
    pub auth_header: String,
    /// Scheme prefixed to the credential (`Bearer <token>`).
    pub auth_scheme: String,
}

impl Default for DoorClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000/graphql".to_string(),
            timeout: Duration::from_secs(30),
            default_headers: Vec::new(),
            user_agent: format!("graphql-door/{}", env!("CARGO_PKG_VERSION")),
            auth_header: "authorization".to_string(),
            auth_scheme: "Bearer".to_string(),
        }
    }
}

impl DoorClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DoorClientConfigBuilder {
        DoorClientConfigBuilder::default()
    }

    /// Create configuration for a specific endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `<PREFIX>_ENDPOINT` (required), `<PREFIX>_TIMEOUT_SECS` and
    /// `<PREFIX>_USER_AGENT`.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let key = |name: &str| format!("{}_{}", prefix, name);

        let endpoint = env::var(key("ENDPOINT"))
            .map_err(|_| DoorError::Config(format!("{} is not set", key("ENDPOINT"))))?;
        let mut config = Self::new(endpoint);

        if let Ok(raw) = env::var(key("TIMEOUT_SECS")) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                DoorError::Config(format!("{} must be a number of seconds", key("TIMEOUT_SECS")))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(user_agent) = env::var(key("USER_AGENT")) {
            config.user_agent = user_agent;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint and header names are usable.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint).map_err(|e| {
            DoorError::Config(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;

        http::HeaderName::from_bytes(self.auth_header.as_bytes()).map_err(|_| {
            DoorError::Config(format!("invalid auth header name '{}'", self.auth_header))
        })?;

        for (name, _) in &self.default_headers {
            http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| DoorError::Config(format!("invalid header name '{}'", name)))?;
        }

        Ok(())
    }

    /// Format a token as the value of the auth header.
    pub fn auth_value(&self, token: &str) -> String {
        if self.auth_scheme.is_empty() {
            token.to_string()
        } else {
            format!("{} {}", self.auth_scheme, token)
        }
    }
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct DoorClientConfigBuilder {
    config: DoorClientConfig,
}

impl DoorClientConfigBuilder {
    /// Set the GraphQL endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .push((name.into(), value.into()));
        self
    }

    /// Set user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the header used for the credential.
    pub fn auth_header(mut self, name: impl Into<String>) -> Self {
        self.config.auth_header = name.into();
        self
    }

    /// Set the credential scheme. An empty scheme sends the raw token.
    pub fn auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.config.auth_scheme = scheme.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DoorClientConfig {
        self.config
    }
}
