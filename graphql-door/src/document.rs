//! Document building.
//!
//! Every builder is a free function of its arguments. The header
//! declarations and the field arguments are rendered from the same
//! [`VariableBinding`] that supplies the variables, so a document always
//! declares exactly the variables it is sent with.
//!
//! Documents share one layout:
//!
//! ```text
//! query($queryParams: QueryParamsInput) { invoice { queryMany(queryParams: $queryParams) { id total } } }
//! ```

use serde_json::{Map, Value};

use crate::selection::selection_set;
use crate::variables::{self, CustomVariable, VariableBinding};
use crate::{EntityName, OperationKind, QueryParamsInput, Result};

/// A generated operation and the variables it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDocument {
    text: String,
    entity: EntityName,
    kind: OperationKind,
    binding: VariableBinding,
}

impl OperationDocument {
    /// The GraphQL text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Entity the operation is wrapped under.
    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    /// Operation kind.
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Key the compactor reads the payload from.
    pub fn response_field(&self) -> &str {
        self.kind.field_name()
    }

    /// Declarations and values.
    pub fn binding(&self) -> &VariableBinding {
        &self.binding
    }

    /// The variables object.
    pub fn variables(&self) -> Map<String, Value> {
        self.binding.variables()
    }

    /// Split into text and variables object.
    pub fn into_parts(self) -> (String, Value) {
        (self.text, self.binding.into_variables())
    }
}

/// A caller-named backend operation.
///
/// The client supplies only the scaffolding: declarations, arguments and
/// the wrapping under the entity. The name and selection are not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomOperation {
    name: String,
    variables: Vec<CustomVariable>,
    select_fields: Vec<String>,
    scalar: bool,
}

impl CustomOperation {
    /// Invoke the backend field `name` under the entity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            select_fields: Vec::new(),
            scalar: false,
        }
    }

    /// Declare and bind a variable passed as an argument of the same name.
    pub fn variable(
        mut self,
        name: impl Into<String>,
        graphql_type: impl Into<String>,
        value: Value,
    ) -> Self {
        self.variables
            .push(CustomVariable::new(name, graphql_type, value));
        self
    }

    /// Bind a payload as the `input` argument.
    pub fn input(self, graphql_type: impl Into<String>, payload: Value) -> Self {
        self.variable("input", graphql_type, payload)
    }

    /// Request these fields on the result.
    pub fn select<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.select_fields = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    /// The field returns a scalar, so no selection set is rendered.
    pub fn scalar(mut self) -> Self {
        self.scalar = true;
        self
    }

    /// Backend field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields requested on the result.
    pub fn select_fields(&self) -> &[String] {
        &self.select_fields
    }

    /// Whether a selection set will be rendered.
    pub fn has_selection(&self) -> bool {
        !self.scalar && !self.select_fields.is_empty()
    }

    pub(crate) fn with_default_selection(mut self, fields: Vec<String>) -> Self {
        if !self.scalar && !self.has_selection() {
            self.select_fields = fields;
        }
        self
    }
}

fn assemble<S: AsRef<str>>(
    entity: &EntityName,
    kind: OperationKind,
    binding: VariableBinding,
    select_fields: &[S],
    scalar: bool,
) -> OperationDocument {
    let entry = kind.entry();

    let mut header = entry.root.keyword().to_string();
    let mut field = kind.field_name().to_string();
    if !binding.is_empty() {
        header.push_str(&format!("({})", binding.declaration_fragment()));
        field.push_str(&format!("({})", binding.argument_fragment()));
    }

    if !scalar {
        let selection = match entry.selection.fixed_fields() {
            Some(fixed) => selection_set(fixed),
            None => selection_set(select_fields),
        };
        field.push(' ');
        field.push_str(&selection);
    }

    let text = format!("{} {{ {} {{ {} }} }}", header, entity, field);

    OperationDocument {
        text,
        entity: entity.clone(),
        kind,
        binding,
    }
}

/// Build `queryMany`, `queryOne` or `getById`.
///
/// Fails with [`DoorError::Config`](crate::DoorError::Config) for any other
/// kind, or when `getById` is given no identifier.
pub fn build_query<S: AsRef<str>>(
    entity: &EntityName,
    kind: OperationKind,
    params: &QueryParamsInput,
    select_fields: &[S],
    id: Option<&str>,
) -> Result<OperationDocument> {
    let binding = variables::bind_query(&kind, params, id)?;
    Ok(assemble(entity, kind, binding, select_fields, false))
}

/// Build `count(query: $query) { value }`.
pub fn build_count_query(entity: &EntityName, query: Option<&str>) -> OperationDocument {
    let binding = variables::bind_count(query);
    assemble::<&str>(entity, OperationKind::Count, binding, &[], false)
}

/// Build `sum(query: $query, field: $field, sumFormula: $sumFormula) { value }`.
pub fn build_sum_query(
    entity: &EntityName,
    field: &str,
    sum_formula: &str,
    query: Option<&str>,
) -> OperationDocument {
    let binding = variables::bind_sum(query, field, sum_formula);
    assemble::<&str>(entity, OperationKind::Sum, binding, &[], false)
}

/// Build a caller-named query.
pub fn build_custom_query(entity: &EntityName, operation: &CustomOperation) -> OperationDocument {
    let binding = variables::bind_custom(&operation.variables);
    assemble(
        entity,
        OperationKind::CustomQuery(operation.name.clone()),
        binding,
        &operation.select_fields,
        operation.scalar,
    )
}

/// Build `add`, `update` or `delete`.
///
/// `delete` always selects `{ id code }`, whatever `select_fields` holds.
/// `update` and `delete` fail without an identifier.
pub fn build_mutation<S: AsRef<str>>(
    entity: &EntityName,
    kind: OperationKind,
    payload: &Value,
    select_fields: &[S],
    id: Option<&str>,
) -> Result<OperationDocument> {
    let binding = variables::bind_mutation(&kind, entity, payload, id)?;
    Ok(assemble(entity, kind, binding, select_fields, false))
}

/// Build `addBatch`, `updateBatch` or `deleteBatch`. The selection applies
/// to every returned element.
pub fn build_batch<S: AsRef<str>>(
    entity: &EntityName,
    kind: OperationKind,
    payloads: &[Value],
    select_fields: &[S],
) -> Result<OperationDocument> {
    let binding = variables::bind_batch(&kind, entity, payloads)?;
    Ok(assemble(entity, kind, binding, select_fields, false))
}

/// Build `deleteBatch(ids: $ids) { id code }`.
pub fn build_delete_batch<S: AsRef<str>>(entity: &EntityName, ids: &[S]) -> OperationDocument {
    let binding = variables::bind_ids(ids);
    assemble::<&str>(entity, OperationKind::DeleteBatch, binding, &[], false)
}

/// Build a caller-named mutation.
pub fn build_custom_mutation(
    entity: &EntityName,
    operation: &CustomOperation,
) -> OperationDocument {
    let binding = variables::bind_custom(&operation.variables);
    assemble(
        entity,
        OperationKind::CustomMutation(operation.name.clone()),
        binding,
        &operation.select_fields,
        operation.scalar,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn invoice() -> EntityName {
        EntityName::new("Invoice")
    }

    /// Variable names declared in the operation header.
    fn declared(text: &str) -> BTreeSet<String> {
        let header = text.split_once('{').map(|(head, _)| head).unwrap_or(text);
        header
            .split('$')
            .skip(1)
            .filter_map(|part| part.split(':').next())
            .map(|name| name.trim().to_string())
            .collect()
    }

    fn bound(document: &OperationDocument) -> BTreeSet<String> {
        document.variables().keys().cloned().collect()
    }

    fn every_document() -> Vec<OperationDocument> {
        let entity = invoice();
        let params = QueryParamsInput::new().query("status:open");
        let fields = ["id", "total"];
        let payload = json!({ "id": "1", "total": 5 });

        vec![
            build_query(&entity, OperationKind::QueryMany, &params, &fields, None).unwrap(),
            build_query(&entity, OperationKind::QueryOne, &params, &fields, None).unwrap(),
            build_query(&entity, OperationKind::GetById, &params, &fields, Some("1")).unwrap(),
            build_count_query(&entity, Some("status:open")),
            build_sum_query(&entity, "total", "total", None),
            build_custom_query(
                &entity,
                &CustomOperation::new("overdue").variable("days", "Int!", json!(30)),
            ),
            build_custom_query(&entity, &CustomOperation::new("statistics").scalar()),
            build_mutation(&entity, OperationKind::Add, &payload, &fields, None).unwrap(),
            build_mutation(&entity, OperationKind::Update, &payload, &fields, Some("1")).unwrap(),
            build_mutation(&entity, OperationKind::Delete, &Value::Null, &fields, Some("1"))
                .unwrap(),
            build_batch(&entity, OperationKind::AddBatch, &[payload.clone()], &fields).unwrap(),
            build_batch(&entity, OperationKind::UpdateBatch, &[payload.clone()], &fields)
                .unwrap(),
            build_batch(&entity, OperationKind::DeleteBatch, &[json!("1")], &fields).unwrap(),
            build_delete_batch(&entity, &["1", "2"]),
            build_custom_mutation(
                &entity,
                &CustomOperation::new("approve").input("InvoiceApproveInput!", payload),
            ),
        ]
    }

    #[test]
    fn test_declared_variables_match_bound_variables() {
        for document in every_document() {
            assert_eq!(
                declared(document.text()),
                bound(&document),
                "mismatch in {}",
                document.text()
            );
        }
    }

    #[test]
    fn test_no_empty_selection() {
        for document in every_document() {
            assert!(!document.text().contains("{ }"), "{}", document.text());
            assert!(!document.text().contains("{}"), "{}", document.text());
        }
    }

    #[test]
    fn test_query_many_text() {
        let params = QueryParamsInput::new().query("status:open").page(1, 20);
        let document =
            build_query(&invoice(), OperationKind::QueryMany, &params, &["id", "total"], None)
                .unwrap();

        assert_eq!(
            document.text(),
            "query($queryParams: QueryParamsInput) { invoice { queryMany(queryParams: $queryParams) { id total } } }"
        );
        assert_eq!(document.response_field(), "queryMany");
    }

    #[test]
    fn test_get_by_id_takes_id_instead_of_params() {
        let document = build_query(
            &invoice(),
            OperationKind::GetById,
            &QueryParamsInput::new(),
            &["id"],
            Some("5"),
        )
        .unwrap();

        assert_eq!(
            document.text(),
            "query($id: GUID!) { invoice { getById(id: $id) { id } } }"
        );
    }

    #[test]
    fn test_count_query_text() {
        let document = build_count_query(&invoice(), Some("status:open"));
        assert_eq!(
            document.text(),
            "query($query: String) { invoice { count(query: $query) { value } } }"
        );
    }

    #[test]
    fn test_delete_ignores_select_fields() {
        let document = build_mutation(
            &invoice(),
            OperationKind::Delete,
            &Value::Null,
            &["total", "customer.name"],
            Some("9"),
        )
        .unwrap();

        assert_eq!(
            document.text(),
            "mutation($id: GUID!) { invoice { delete(id: $id) { id code } } }"
        );

        let batch = build_delete_batch(&invoice(), &["1"]);
        assert!(batch.text().ends_with("deleteBatch(ids: $ids) { id code } } }"));
    }

    #[test]
    fn test_add_mutation_text() {
        let payload = json!({ "id": "ignored", "total": 50 });
        let document =
            build_mutation(&invoice(), OperationKind::Add, &payload, &["id", "total"], None)
                .unwrap();

        assert_eq!(
            document.text(),
            "mutation($input: InvoiceInput!) { invoice { add(input: $input) { id total } } }"
        );
        assert_eq!(document.variables()["input"], json!({ "total": 50 }));
    }

    #[test]
    fn test_empty_select_fields_fall_back_to_id() {
        let empty: [&str; 0] = [];
        let document =
            build_batch(&invoice(), OperationKind::AddBatch, &[json!({})], &empty).unwrap();
        assert!(document.text().ends_with("addBatch(inputs: $inputs) { id } } }"));
    }

    #[test]
    fn test_builders_reject_mismatched_kinds() {
        let entity = invoice();
        let params = QueryParamsInput::new();
        let fields = ["id"];

        assert!(build_query(&entity, OperationKind::GetById, &params, &fields, None).is_err());
        assert!(build_query(&entity, OperationKind::Add, &params, &fields, None).is_err());
        assert!(
            build_mutation(&entity, OperationKind::Update, &json!({}), &fields, None).is_err()
        );
        assert!(build_batch(&entity, OperationKind::Delete, &[json!({})], &fields).is_err());
    }

    #[test]
    fn test_default_selection_skips_scalars_and_explicit_fields() {
        let defaults = || vec!["id".to_string(), "total".to_string()];

        let bare = CustomOperation::new("latest").with_default_selection(defaults());
        assert_eq!(bare.select_fields(), ["id", "total"]);

        let chosen = CustomOperation::new("latest")
            .select(&["code"])
            .with_default_selection(defaults());
        assert_eq!(chosen.select_fields(), ["code"]);

        let scalar = CustomOperation::new("total").scalar().with_default_selection(defaults());
        assert!(!scalar.has_selection());
        assert!(scalar.select_fields().is_empty());
    }

    #[test]
    fn test_custom_without_variables() {
        let document = build_custom_query(
            &invoice(),
            &CustomOperation::new("latest").select(&["id", "customer.name"]),
        );
        assert_eq!(
            document.text(),
            "query { invoice { latest { id customer { name } } } }"
        );
        assert_eq!(document.response_field(), "latest");
    }

    #[test]
    fn test_into_parts() {
        let (text, variables) = build_count_query(&invoice(), None).into_parts();
        assert!(text.starts_with("query($query: String)"));
        assert_eq!(variables, json!({ "query": null }));
    }
}
