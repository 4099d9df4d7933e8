//! Variable binding.
//!
//! A [`VariableBinding`] is the single source for three things the document
//! needs: the `$name: Type` declarations in the operation header, the
//! `name: $name` arguments passed to the backend field, and the variables
//! object sent next to the document. Deriving all three from one list is
//! what keeps declared and bound variables from drifting apart.

use serde_json::{Map, Value};

use crate::{DoorError, EntityName, OperationKind, QueryParamsInput, Result};

/// GraphQL type of entity identifiers.
pub const ID_TYPE: &str = "GUID";

/// GraphQL type of the query parameter input.
pub const QUERY_PARAMS_TYPE: &str = "QueryParamsInput";

/// GraphQL type of filter strings.
pub const STRING_TYPE: &str = "String";

/// A `$name: Type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    /// Variable name without the `$`.
    pub name: String,
    /// GraphQL type, including list and non-null markers.
    pub graphql_type: String,
}

/// A caller-declared variable for custom operations.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomVariable {
    /// Variable and argument name.
    pub name: String,
    /// GraphQL type.
    pub graphql_type: String,
    /// Bound value.
    pub value: Value,
}

impl CustomVariable {
    /// Create a custom variable.
    pub fn new(name: impl Into<String>, graphql_type: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            graphql_type: graphql_type.into(),
            value,
        }
    }
}

/// Ordered declarations paired with their bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBinding {
    entries: Vec<(VariableDeclaration, Value)>,
}

impl VariableBinding {
    /// Create an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare and bind a variable. Rebinding a name replaces the earlier entry.
    pub fn bind(
        &mut self,
        name: impl Into<String>,
        graphql_type: impl Into<String>,
        value: Value,
    ) -> &mut Self {
        let declaration = VariableDeclaration {
            name: name.into(),
            graphql_type: graphql_type.into(),
        };

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.name == declaration.name)
        {
            Some(entry) => *entry = (declaration, value),
            None => self.entries.push((declaration, value)),
        }
        self
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations in binding order.
    pub fn declarations(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.entries.iter().map(|(declaration, _)| declaration)
    }

    /// Variable names in binding order.
    pub fn names(&self) -> Vec<&str> {
        self.declarations().map(|d| d.name.as_str()).collect()
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(declaration, _)| declaration.name == name)
            .map(|(_, value)| value)
    }

    /// `$queryParams: QueryParamsInput, $id: GUID!`
    pub fn declaration_fragment(&self) -> String {
        self.declarations()
            .map(|d| format!("${}: {}", d.name, d.graphql_type))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `queryParams: $queryParams, id: $id`
    pub fn argument_fragment(&self) -> String {
        self.declarations()
            .map(|d| format!("{}: ${}", d.name, d.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The variables object sent with the document.
    pub fn variables(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(declaration, value)| (declaration.name.clone(), value.clone()))
            .collect()
    }

    /// Consume the binding into the variables object.
    pub fn into_variables(self) -> Value {
        Value::Object(
            self.entries
                .into_iter()
                .map(|(declaration, value)| (declaration.name, value))
                .collect(),
        )
    }
}

/// Copy of `payload` without its `id` key.
///
/// Identifiers travel as their own variable, never inside a mutation body.
/// Non-object payloads are returned unchanged.
pub fn strip_id(payload: &Value) -> Value {
    match payload {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "id")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn non_null(graphql_type: &str) -> String {
    format!("{}!", graphql_type)
}

fn required_id<'a>(kind: &OperationKind, id: Option<&'a str>) -> Result<&'a str> {
    id.ok_or_else(|| DoorError::Config(format!("`{}` requires an identifier", kind)))
}

fn unsupported(kind: &OperationKind, binder: &str) -> DoorError {
    DoorError::Config(format!("`{}` cannot be bound as a {}", kind, binder))
}

/// Bind a read operation.
///
/// `queryMany`/`queryOne` always carry the full `queryParams` object;
/// `getById` carries only the identifier, which must be supplied.
pub fn bind_query(
    kind: &OperationKind,
    params: &QueryParamsInput,
    id: Option<&str>,
) -> Result<VariableBinding> {
    let mut binding = VariableBinding::new();

    match kind {
        OperationKind::QueryMany | OperationKind::QueryOne => {
            binding.bind("queryParams", QUERY_PARAMS_TYPE, serde_json::to_value(params)?);
        }
        OperationKind::GetById => {}
        other => return Err(unsupported(other, "query")),
    }

    if kind.entry().takes_id {
        binding.bind("id", non_null(ID_TYPE), Value::from(required_id(kind, id)?));
    }

    Ok(binding)
}

/// Bind a single-entity mutation.
///
/// `add`/`update` bind the id-stripped payload as `input`; `update` and
/// `delete` bind the identifier as `id`, which must be supplied.
pub fn bind_mutation(
    kind: &OperationKind,
    entity: &EntityName,
    payload: &Value,
    id: Option<&str>,
) -> Result<VariableBinding> {
    let mut binding = VariableBinding::new();

    match kind {
        OperationKind::Add | OperationKind::Update => {
            binding.bind("input", non_null(&entity.input_type()), strip_id(payload));
        }
        OperationKind::Delete => {}
        other => return Err(unsupported(other, "mutation")),
    }

    if kind.entry().takes_id {
        binding.bind("id", non_null(ID_TYPE), Value::from(required_id(kind, id)?));
    }

    Ok(binding)
}

fn bind_id_list(binding: &mut VariableBinding, ids: Vec<Value>) {
    binding.bind("ids", format!("[{}]", non_null(ID_TYPE)), Value::Array(ids));
}

/// Bind a batch mutation.
///
/// `addBatch` strips `id` from each element. `updateBatch` keeps it, as
/// each element has to name the record it updates. `deleteBatch` treats
/// the values as identifiers and binds them as `ids`.
pub fn bind_batch(
    kind: &OperationKind,
    entity: &EntityName,
    payloads: &[Value],
) -> Result<VariableBinding> {
    if !kind.entry().batch {
        return Err(unsupported(kind, "batch"));
    }

    let mut binding = VariableBinding::new();
    let list_type = format!("[{}]!", non_null(&entity.input_type()));

    match kind {
        OperationKind::AddBatch => {
            let inputs = payloads.iter().map(strip_id).collect();
            binding.bind("inputs", list_type, Value::Array(inputs));
        }
        OperationKind::UpdateBatch => {
            binding.bind("inputs", list_type, Value::Array(payloads.to_vec()));
        }
        OperationKind::DeleteBatch => bind_id_list(&mut binding, payloads.to_vec()),
        other => return Err(unsupported(other, "batch")),
    }

    Ok(binding)
}

/// Bind a list of identifiers for `deleteBatch`.
pub fn bind_ids<S: AsRef<str>>(ids: &[S]) -> VariableBinding {
    let mut binding = VariableBinding::new();
    bind_id_list(
        &mut binding,
        ids.iter().map(|id| Value::from(id.as_ref())).collect(),
    );
    binding
}

/// Bind the filter of a `count` query.
pub fn bind_count(query: Option<&str>) -> VariableBinding {
    let mut binding = VariableBinding::new();
    binding.bind("query", STRING_TYPE, query.map(Value::from).unwrap_or(Value::Null));
    binding
}

/// Bind the arguments of a `sum` aggregate.
pub fn bind_sum(query: Option<&str>, field: &str, sum_formula: &str) -> VariableBinding {
    let mut binding = bind_count(query);
    binding
        .bind("field", non_null(STRING_TYPE), Value::from(field))
        .bind("sumFormula", non_null(STRING_TYPE), Value::from(sum_formula));
    binding
}

/// Bind caller-declared variables of a custom operation.
pub fn bind_custom(variables: &[CustomVariable]) -> VariableBinding {
    let mut binding = VariableBinding::new();
    for variable in variables {
        binding.bind(
            variable.name.clone(),
            variable.graphql_type.clone(),
            variable.value.clone(),
        );
    }
    binding
}
