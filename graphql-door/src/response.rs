//! GraphQL-over-HTTP response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::{DoorError, Result};

/// The `{ data, errors }` body returned by the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphQLResponse<T = Value> {
    /// Result of the executed document.
    #[serde(default)]
    pub data: Option<T>,
    /// Errors reported while executing the document.
    #[serde(default)]
    pub errors: Option<Vec<GraphQLResponseError>>,
}

impl<T> GraphQLResponse<T> {
    /// Whether the server reported at least one error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// The data, or the reported errors.
    ///
    /// Errors win over partial data. A body with neither is a parse error.
    pub fn into_result(self) -> Result<T> {
        match (self.errors, self.data) {
            (Some(errors), _) if !errors.is_empty() => Err(DoorError::GraphQL(errors)),
            (_, Some(data)) => Ok(data),
            _ => Err(DoorError::Parse("response contained no data".to_string())),
        }
    }
}

/// One entry of the `errors` list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphQLResponseError {
    pub message: String,
    #[serde(default)]
    pub locations: Option<Vec<ErrorLocation>>,
    /// Response path of the failing field, e.g. `invoice.queryMany.[0]`.
    #[serde(default)]
    pub path: Option<Vec<PathSegment>>,
}

impl fmt::Display for GraphQLResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => write!(f, " (path: {})", format_path(path)),
            _ => Ok(()),
        }
    }
}

/// 1-indexed position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// A field name or list index in an error path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Join a path as `invoice.queryMany.[0].total`.
pub fn format_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}
