//! Per-entity facade over a shared [`DoorClient`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::{DeletedEntity, MathResult};
use crate::{CustomOperation, DoorClient, EntityName, QueryParamsInput, Result};

/// Supplies the fields selected when a call passes none.
pub type DefaultFields = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Typed access to one entity.
///
/// Binds a canonical entity name and a default selection to a shared client.
/// Whenever a call passes `None` for its select fields, the provider is
/// asked for the fields to use.
pub struct EntityFetcher<T> {
    client: DoorClient,
    entity: EntityName,
    default_fields: DefaultFields,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            entity: self.entity.clone(),
            default_fields: self.default_fields.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> EntityFetcher<T> {
    /// Create a fetcher for `entity` using `default_fields` as its selection.
    pub fn new<F>(entity: impl Into<EntityName>, default_fields: F, client: DoorClient) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            client,
            entity: entity.into(),
            default_fields: Arc::new(default_fields),
            _marker: PhantomData,
        }
    }

    /// Canonical entity name.
    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    /// The shared client.
    pub fn client(&self) -> &DoorClient {
        &self.client
    }

    fn fields(&self, select_fields: Option<&[&str]>) -> Vec<String> {
        match select_fields {
            Some(fields) => fields.iter().map(|f| f.to_string()).collect(),
            None => (self.default_fields)(),
        }
    }

    /// See [`DoorClient::query_many`].
    pub async fn query_many(
        &self,
        params: &QueryParamsInput,
        select_fields: Option<&[&str]>,
    ) -> Result<Vec<T>> {
        let fields = self.fields(select_fields);
        self.client
            .query_many(&self.entity, params, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::query_one`].
    pub async fn query_one(
        &self,
        params: &QueryParamsInput,
        select_fields: Option<&[&str]>,
    ) -> Result<Option<T>> {
        let fields = self.fields(select_fields);
        self.client
            .query_one(&self.entity, params, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::get_by_id`].
    pub async fn get_by_id(&self, id: &str, select_fields: Option<&[&str]>) -> Result<Option<T>> {
        let fields = self.fields(select_fields);
        self.client
            .get_by_id(&self.entity, id, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::count`].
    pub async fn count(&self, query: &str) -> Result<u64> {
        self.client.count(&self.entity, query).await
    }

    /// See [`DoorClient::sum`].
    pub async fn sum(
        &self,
        field: &str,
        sum_formula: &str,
        query: Option<&str>,
    ) -> Result<MathResult> {
        self.client.sum(&self.entity, field, sum_formula, query).await
    }

    /// See [`DoorClient::add`].
    pub async fn add<M: Serialize>(
        &self,
        model: &M,
        select_fields: Option<&[&str]>,
    ) -> Result<Option<T>> {
        let fields = self.fields(select_fields);
        self.client
            .add(&self.entity, model, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::add_batch`].
    pub async fn add_batch<M: Serialize>(
        &self,
        models: &[M],
        select_fields: Option<&[&str]>,
    ) -> Result<Vec<T>> {
        let fields = self.fields(select_fields);
        self.client
            .add_batch(&self.entity, models, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::update`].
    pub async fn update<M: Serialize>(
        &self,
        id: &str,
        model: &M,
        select_fields: Option<&[&str]>,
    ) -> Result<Option<T>> {
        let fields = self.fields(select_fields);
        self.client
            .update(&self.entity, id, model, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::update_batch`].
    pub async fn update_batch<M: Serialize>(
        &self,
        models: &[M],
        select_fields: Option<&[&str]>,
    ) -> Result<Vec<T>> {
        let fields = self.fields(select_fields);
        self.client
            .update_batch(&self.entity, models, &as_strs(&fields))
            .await
    }

    /// See [`DoorClient::delete`].
    pub async fn delete(&self, id: &str) -> Result<Option<DeletedEntity>> {
        self.client.delete(&self.entity, id).await
    }

    /// See [`DoorClient::delete_batch`].
    pub async fn delete_batch(&self, ids: &[&str]) -> Result<Vec<DeletedEntity>> {
        self.client.delete_batch(&self.entity, ids).await
    }

    /// See [`DoorClient::execute_custom_query`]. Operations without a
    /// selection get the default fields unless marked scalar.
    pub async fn execute_custom_query<R: DeserializeOwned>(
        &self,
        operation: CustomOperation,
    ) -> Result<Option<R>> {
        let operation = operation.with_default_selection((self.default_fields)());
        self.client
            .execute_custom_query(&self.entity, &operation)
            .await
    }

    /// See [`DoorClient::execute_custom_mutation`].
    pub async fn execute_custom_mutation<R: DeserializeOwned>(
        &self,
        operation: CustomOperation,
    ) -> Result<Option<R>> {
        let operation = operation.with_default_selection((self.default_fields)());
        self.client
            .execute_custom_mutation(&self.entity, &operation)
            .await
    }

    /// See [`DoorClient::execute`].
    pub async fn execute<R: DeserializeOwned>(
        &self,
        operation: &str,
        document: &str,
        variables: Value,
        default: Value,
    ) -> Result<R> {
        self.client
            .execute(&self.entity, operation, document, variables, default)
            .await
    }
}

fn as_strs(fields: &[String]) -> Vec<&str> {
    fields.iter().map(String::as_str).collect()
}
