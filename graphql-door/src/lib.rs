//! # GraphQL Door
//!
//! A CRUD client for GraphQL backends that expose every collection as
//! `entity { queryMany, getById, add, update, delete, ... }`. Given only an
//! entity name it generates the query or mutation, binds the caller's
//! filters and payloads as typed variables, and unwraps the response.
//!
//! ## Features
//!
//! - **Generated documents**: Queries, counts, aggregates and (batch) mutations
//! - **Consistent variables**: Declarations and bound values come from one binding
//! - **Response compaction**: `{ entity: { operation: payload } }` unwrapped, with defaults
//! - **Per-request credentials**: Static tokens or async providers, never shared state
//! - **Entity fetchers**: Typed per-entity facades with default field selection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphql_door::{DoorClient, QueryParamsInput};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Invoice {
//!     id: String,
//!     total: f64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DoorClient::new("https://api.example.com/graphql")?;
//!
//!     let params = QueryParamsInput::new().query("status:open").page(1, 20);
//!     let invoices: Vec<Invoice> = client
//!         .query_many("Invoice", &params, &["id", "total"])
//!         .await?;
//!
//!     println!("Open invoices: {}", invoices.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Entity Fetchers
//!
//! ```rust,ignore
//! use graphql_door::{DoorClient, EntityFetcher, TokenSource};
//!
//! let client = DoorClient::new("https://api.example.com/graphql")?
//!     .with_token(TokenSource::from_fn(|| async { Ok(Some(fetch_token().await)) }));
//!
//! let invoices: EntityFetcher<Invoice> =
//!     EntityFetcher::new("Invoice", || vec!["id".into(), "total".into()], client);
//!
//! let created = invoices.add(&new_invoice, None).await?;
//! let open = invoices.count("status:open").await?;
//! ```

mod client;
mod compact;
mod config;
mod document;
mod entity;
mod error;
mod fetcher;
mod operation;
mod params;
mod response;
mod selection;
mod token;
mod transport;
mod variables;

pub use client::{DeletedEntity, DoorClient, MathResult};
pub use compact::{compact_count_response, compact_response, is_empty_value};
pub use config::{DoorClientConfig, DoorClientConfigBuilder};
pub use document::{
    build_batch, build_count_query, build_custom_mutation, build_custom_query,
    build_delete_batch, build_mutation, build_query, build_sum_query, CustomOperation,
    OperationDocument,
};
pub use entity::EntityName;
pub use error::{DoorError, Result};
pub use fetcher::{DefaultFields, EntityFetcher};
pub use operation::{DefaultShape, OperationEntry, OperationKind, OperationRoot, SelectionPolicy};
pub use params::QueryParamsInput;
pub use response::{ErrorLocation, GraphQLResponse, GraphQLResponseError, PathSegment};
pub use selection::{selection_set, FALLBACK_FIELD};
pub use token::{FnTokenProvider, TokenProvider, TokenSource};
pub use transport::{HttpTransport, Transport};
pub use variables::{
    bind_batch, bind_count, bind_custom, bind_ids, bind_mutation, bind_query, bind_sum, strip_id,
    CustomVariable, VariableBinding, VariableDeclaration, ID_TYPE, QUERY_PARAMS_TYPE, STRING_TYPE,
};

// Re-export common types
pub use serde_json::Value as JsonValue;
