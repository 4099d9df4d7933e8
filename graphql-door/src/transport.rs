//! Transport boundary.
//!
//! The client hands a finished document, its variables and the headers for
//! this one call to a [`Transport`], and gets back the `data` object of the
//! response. Headers are passed per call, so concurrent requests carrying
//! different credentials never share mutable state.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{DoorClientConfig, GraphQLResponse, Result};

/// Sends GraphQL documents.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `document` with `variables` and return the response `data`.
    ///
    /// Network failures, non-success statuses and GraphQL `errors` are
    /// returned as errors.
    async fn request(
        &self,
        document: &str,
        variables: Value,
        headers: &[(String, String)],
    ) -> Result<Value>;
}

/// Request body for GraphQL over HTTP.
#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    variables: Value,
}

/// GraphQL over HTTP POST using `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    http_client: Client,
    config: Arc<DoorClientConfig>,
}

impl HttpTransport {
    /// Create a transport for the configured endpoint.
    pub fn new(config: DoorClientConfig) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self {
            http_client,
            config: Arc::new(config),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &DoorClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        document: &str,
        variables: Value,
        headers: &[(String, String)],
    ) -> Result<Value> {
        debug!(endpoint = %self.config.endpoint, "Sending GraphQL request");

        let mut http_request = self.http_client.post(&self.config.endpoint);

        // Add default headers
        for (name, value) in &self.config.default_headers {
            http_request = http_request.header(name.as_str(), value.as_str());
        }

        // Add per-call headers
        for (name, value) in headers {
            http_request = http_request.header(name.as_str(), value.as_str());
        }

        let response = http_request
            .json(&GraphQLRequest {
                query: document,
                variables,
            })
            .send()
            .await?
            .error_for_status()?;

        let graphql_response: GraphQLResponse<Value> = response.json().await?;
        graphql_response.into_result()
    }
}
