//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, DoorError>;

/// Errors surfaced by the client.
///
/// Only transport and (de)serialization failures are errors. A response
/// that lacks the expected entity or operation path is not; it compacts
/// to the operation's default value instead.
#[derive(Debug, Error)]
pub enum DoorError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GraphQL errors returned by the server.
    #[error("GraphQL errors: {0:?}")]
    GraphQL(Vec<crate::GraphQLResponseError>),

    /// The response envelope could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The token provider failed to produce a credential.
    #[error("Token error: {0}")]
    Token(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DoorError {
    /// Check if this is a network error.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Check if this is a GraphQL error (server-side).
    pub fn is_graphql_error(&self) -> bool {
        matches!(self, Self::GraphQL(_))
    }

    /// Get GraphQL errors if this is a GraphQL error.
    pub fn graphql_errors(&self) -> Option<&[crate::GraphQLResponseError]> {
        match self {
            Self::GraphQL(errors) => Some(errors),
            _ => None,
        }
    }
}
