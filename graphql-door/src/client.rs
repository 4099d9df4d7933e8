//! Entity-oriented GraphQL client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::compact::{compact_count_response, compact_response, is_empty_value};
use crate::document::{self, CustomOperation, OperationDocument};
use crate::{
    DoorClientConfig, EntityName, HttpTransport, OperationKind, QueryParamsInput, Result,
    TokenSource, Transport,
};

/// Result of a `sum` aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MathResult {
    /// Aggregated value.
    pub value: f64,
}

/// Fields returned by `delete` and `deleteBatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedEntity {
    /// Identifier of the removed record.
    pub id: String,
    /// Business code of the removed record, when the backend has one.
    #[serde(default)]
    pub code: Option<Value>,
}

/// GraphQL CRUD client.
///
/// Each call builds its document, resolves a credential, dispatches through
/// the transport and compacts the response. The client holds no per-call
/// state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct DoorClient {
    transport: Arc<dyn Transport>,
    config: Arc<DoorClientConfig>,
    token: TokenSource,
}

impl DoorClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_config(DoorClientConfig::new(endpoint))
    }

    /// Create a client over HTTP with custom configuration.
    pub fn with_config(config: DoorClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: DoorClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            config: Arc::new(config),
            token: TokenSource::default(),
        }
    }

    /// Set where credentials come from.
    pub fn with_token(mut self, token: TokenSource) -> Self {
        self.token = token;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &DoorClientConfig {
        &self.config
    }

    async fn auth_headers(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .token
            .resolve()
            .await?
            .map(|token| vec![(self.config.auth_header.clone(), self.config.auth_value(&token))])
            .unwrap_or_default())
    }

    async fn send(&self, document: &str, variables: Value) -> Result<Value> {
        let headers = self.auth_headers().await?;
        self.transport.request(document, variables, &headers).await
    }

    async fn dispatch(&self, document: OperationDocument) -> Result<Value> {
        let entity = document.entity().clone();
        let kind = document.kind().clone();

        debug!(
            entity = %entity,
            operation = %kind,
            variables = ?document.binding().names(),
            "Dispatching GraphQL operation"
        );

        let (text, variables) = document.into_parts();
        let response = self.send(&text, variables).await?;

        Ok(compact_response(
            entity.as_str(),
            &response,
            kind.field_name(),
            kind.default_value(),
        ))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, document: OperationDocument) -> Result<Vec<T>> {
        let payload = self.dispatch(document).await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        document: OperationDocument,
    ) -> Result<Option<T>> {
        let payload = self.dispatch(document).await?;
        if is_empty_value(&payload) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(payload)?))
    }

    /// Query a page of entities. Returns `[]` when nothing matches.
    pub async fn query_many<T: DeserializeOwned>(
        &self,
        entity: impl Into<EntityName>,
        params: &QueryParamsInput,
        select_fields: &[&str],
    ) -> Result<Vec<T>> {
        let entity = entity.into();
        let document =
            document::build_query(&entity, OperationKind::QueryMany, params, select_fields, None)?;
        self.fetch_list(document).await
    }

    /// Query the first entity matching `params`.
    pub async fn query_one<T: DeserializeOwned>(
        &self,
        entity: impl Into<EntityName>,
        params: &QueryParamsInput,
        select_fields: &[&str],
    ) -> Result<Option<T>> {
        let entity = entity.into();
        let document =
            document::build_query(&entity, OperationKind::QueryOne, params, select_fields, None)?;
        self.fetch_one(document).await
    }

    /// Fetch one entity by identifier.
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        entity: impl Into<EntityName>,
        id: &str,
        select_fields: &[&str],
    ) -> Result<Option<T>> {
        let entity = entity.into();
        let document = document::build_query(
            &entity,
            OperationKind::GetById,
            &QueryParamsInput::default(),
            select_fields,
            Some(id),
        )?;
        self.fetch_one(document).await
    }

    /// Count entities matching a filter expression.
    pub async fn count(&self, entity: impl Into<EntityName>, query: &str) -> Result<u64> {
        let entity = entity.into();
        let document = document::build_count_query(&entity, Some(query));

        debug!(entity = %entity, operation = "count", "Dispatching GraphQL operation");

        let (text, variables) = document.into_parts();
        let response = self.send(&text, variables).await?;
        Ok(compact_count_response(entity.as_str(), &response))
    }

    /// Sum `field` (or `sum_formula`) over entities matching `query`.
    pub async fn sum(
        &self,
        entity: impl Into<EntityName>,
        field: &str,
        sum_formula: &str,
        query: Option<&str>,
    ) -> Result<MathResult> {
        let entity = entity.into();
        let document = document::build_sum_query(&entity, field, sum_formula, query);
        let payload = self.dispatch(document).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Create an entity. Any `id` in the model is not sent.
    pub async fn add<T: DeserializeOwned, M: Serialize>(
        &self,
        entity: impl Into<EntityName>,
        model: &M,
        select_fields: &[&str],
    ) -> Result<Option<T>> {
        let entity = entity.into();
        let payload = serde_json::to_value(model)?;
        let document =
            document::build_mutation(&entity, OperationKind::Add, &payload, select_fields, None)?;
        self.fetch_one(document).await
    }

    /// Create several entities in one round trip. Results keep input order.
    pub async fn add_batch<T: DeserializeOwned, M: Serialize>(
        &self,
        entity: impl Into<EntityName>,
        models: &[M],
        select_fields: &[&str],
    ) -> Result<Vec<T>> {
        let entity = entity.into();
        let payloads = models
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let document =
            document::build_batch(&entity, OperationKind::AddBatch, &payloads, select_fields)?;
        self.fetch_list(document).await
    }

    /// Update the entity `id`. Any `id` in the model is not sent.
    pub async fn update<T: DeserializeOwned, M: Serialize>(
        &self,
        entity: impl Into<EntityName>,
        id: &str,
        model: &M,
        select_fields: &[&str],
    ) -> Result<Option<T>> {
        let entity = entity.into();
        let payload = serde_json::to_value(model)?;
        let document = document::build_mutation(
            &entity,
            OperationKind::Update,
            &payload,
            select_fields,
            Some(id),
        )?;
        self.fetch_one(document).await
    }

    /// Update several entities in one round trip. Each model carries its own `id`.
    pub async fn update_batch<T: DeserializeOwned, M: Serialize>(
        &self,
        entity: impl Into<EntityName>,
        models: &[M],
        select_fields: &[&str],
    ) -> Result<Vec<T>> {
        let entity = entity.into();
        let payloads = models
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let document =
            document::build_batch(&entity, OperationKind::UpdateBatch, &payloads, select_fields)?;
        self.fetch_list(document).await
    }

    /// Delete the entity `id`.
    pub async fn delete(
        &self,
        entity: impl Into<EntityName>,
        id: &str,
    ) -> Result<Option<DeletedEntity>> {
        let entity = entity.into();
        let no_fields: [&str; 0] = [];
        let document = document::build_mutation(
            &entity,
            OperationKind::Delete,
            &Value::Null,
            &no_fields,
            Some(id),
        )?;
        self.fetch_one(document).await
    }

    /// Delete several entities in one round trip.
    pub async fn delete_batch(
        &self,
        entity: impl Into<EntityName>,
        ids: &[&str],
    ) -> Result<Vec<DeletedEntity>> {
        let entity = entity.into();
        let document = document::build_delete_batch(&entity, ids);
        self.fetch_list(document).await
    }

    /// Run a caller-named query field under the entity.
    pub async fn execute_custom_query<T: DeserializeOwned>(
        &self,
        entity: impl Into<EntityName>,
        operation: &CustomOperation,
    ) -> Result<Option<T>> {
        let entity = entity.into();
        let document = document::build_custom_query(&entity, operation);
        self.fetch_one(document).await
    }

    /// Run a caller-named mutation field under the entity.
    pub async fn execute_custom_mutation<T: DeserializeOwned>(
        &self,
        entity: impl Into<EntityName>,
        operation: &CustomOperation,
    ) -> Result<Option<T>> {
        let entity = entity.into();
        let document = document::build_custom_mutation(&entity, operation);
        self.fetch_one(document).await
    }

    /// Send a caller-written document and compact `response[entity][operation]`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        entity: impl Into<EntityName>,
        operation: &str,
        document: &str,
        variables: Value,
        default: Value,
    ) -> Result<T> {
        let entity = entity.into();

        debug!(entity = %entity, operation = %operation, "Dispatching caller document");

        let response = self.send(document, variables).await?;
        let payload = compact_response(entity.as_str(), &response, operation, default);
        Ok(serde_json::from_value(payload)?)
    }
}
