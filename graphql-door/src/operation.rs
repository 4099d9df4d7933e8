//! Operation kinds and the table that drives document shape.
//!
//! Every generated document is described by one row of [`OperationKind::entry`]:
//! the root keyword, the backend field invoked under the entity, the value
//! returned when the response carries no data, the selection policy and
//! whether an identifier travels as a separate variable.

use serde_json::{json, Value};
use std::fmt;

/// Root keyword of a GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationRoot {
    /// `query`
    Query,
    /// `mutation`
    Mutation,
}

impl OperationRoot {
    /// The keyword that opens the document.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// Value substituted when the response path is absent or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultShape {
    /// `[]`
    List,
    /// `{}`
    Object,
    /// `null`
    Null,
    /// `0`
    Zero,
    /// `{ "value": 0 }`
    MathResult,
}

impl DefaultShape {
    /// Materialize the default.
    pub fn value(self) -> Value {
        match self {
            Self::List => json!([]),
            Self::Object => json!({}),
            Self::Null => Value::Null,
            Self::Zero => json!(0),
            Self::MathResult => json!({ "value": 0 }),
        }
    }
}

/// Which fields the document requests on the returned object(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// The caller's select fields, falling back to `id`.
    Caller,
    /// Always `{ id code }`.
    IdAndCode,
    /// Always `{ value }`.
    Value,
}

impl SelectionPolicy {
    /// Fixed field list for non-caller policies.
    pub fn fixed_fields(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Caller => None,
            Self::IdAndCode => Some(&["id", "code"]),
            Self::Value => Some(&["value"]),
        }
    }
}

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationEntry {
    /// Root keyword.
    pub root: OperationRoot,
    /// Default when no data is returned.
    pub default: DefaultShape,
    /// Selection policy.
    pub selection: SelectionPolicy,
    /// Whether an `id` variable is bound alongside the arguments.
    pub takes_id: bool,
    /// Whether the operation works on a list of payloads or ids.
    pub batch: bool,
}

/// The closed set of operations the client generates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    QueryMany,
    QueryOne,
    GetById,
    Count,
    Sum,
    Add,
    Update,
    Delete,
    AddBatch,
    UpdateBatch,
    DeleteBatch,
    /// A caller-named query field.
    CustomQuery(String),
    /// A caller-named mutation field.
    CustomMutation(String),
}

impl OperationKind {
    /// Look up the table row for this kind.
    pub fn entry(&self) -> OperationEntry {
        use DefaultShape as D;
        use OperationRoot::{Mutation, Query};
        use SelectionPolicy as S;

        let (root, default, selection, takes_id, batch) = match self {
            Self::QueryMany => (Query, D::List, S::Caller, false, false),
            Self::QueryOne => (Query, D::Object, S::Caller, false, false),
            Self::GetById => (Query, D::Object, S::Caller, true, false),
            Self::Count => (Query, D::Zero, S::Value, false, false),
            Self::Sum => (Query, D::MathResult, S::Value, false, false),
            Self::CustomQuery(_) => (Query, D::Object, S::Caller, false, false),
            Self::Add => (Mutation, D::Object, S::Caller, false, false),
            Self::Update => (Mutation, D::Object, S::Caller, true, false),
            Self::Delete => (Mutation, D::Null, S::IdAndCode, true, false),
            Self::AddBatch => (Mutation, D::List, S::Caller, false, true),
            Self::UpdateBatch => (Mutation, D::List, S::Caller, false, true),
            Self::DeleteBatch => (Mutation, D::List, S::IdAndCode, false, true),
            Self::CustomMutation(_) => (Mutation, D::Object, S::Caller, false, false),
        };

        OperationEntry {
            root,
            default,
            selection,
            takes_id,
            batch,
        }
    }

    /// The backend field invoked under the entity, and the key the
    /// compactor reads from the response.
    pub fn field_name(&self) -> &str {
        match self {
            Self::QueryMany => "queryMany",
            Self::QueryOne => "queryOne",
            Self::GetById => "getById",
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::AddBatch => "addBatch",
            Self::UpdateBatch => "updateBatch",
            Self::DeleteBatch => "deleteBatch",
            Self::CustomQuery(name) | Self::CustomMutation(name) => name,
        }
    }

    /// Root keyword.
    pub fn root(&self) -> OperationRoot {
        self.entry().root
    }

    /// Default value for an empty response.
    pub fn default_value(&self) -> Value {
        self.entry().default.value()
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roots() {
        assert_eq!(OperationKind::QueryMany.root(), OperationRoot::Query);
        assert_eq!(OperationKind::Count.root(), OperationRoot::Query);
        assert_eq!(OperationKind::DeleteBatch.root(), OperationRoot::Mutation);
        assert_eq!(
            OperationKind::CustomMutation("approve".into()).root(),
            OperationRoot::Mutation
        );
        assert_eq!(OperationRoot::Mutation.keyword(), "mutation");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OperationKind::QueryMany.default_value(), json!([]));
        assert_eq!(OperationKind::QueryOne.default_value(), json!({}));
        assert_eq!(OperationKind::Count.default_value(), json!(0));
        assert_eq!(OperationKind::Sum.default_value(), json!({ "value": 0 }));
        assert_eq!(OperationKind::AddBatch.default_value(), json!([]));
    }

    #[test]
    fn test_delete_selection_is_fixed() {
        for kind in [OperationKind::Delete, OperationKind::DeleteBatch] {
            assert_eq!(
                kind.entry().selection.fixed_fields(),
                Some(&["id", "code"][..])
            );
        }
        assert_eq!(OperationKind::Add.entry().selection.fixed_fields(), None);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(OperationKind::GetById.to_string(), "getById");
        assert_eq!(OperationKind::UpdateBatch.field_name(), "updateBatch");
        assert_eq!(
            OperationKind::CustomQuery("overdue".into()).field_name(),
            "overdue"
        );
    }

    #[test]
    fn test_takes_id() {
        assert!(OperationKind::GetById.entry().takes_id);
        assert!(OperationKind::Update.entry().takes_id);
        assert!(OperationKind::Delete.entry().takes_id);
        assert!(!OperationKind::QueryMany.entry().takes_id);
        assert!(OperationKind::DeleteBatch.entry().batch);
        assert!(!OperationKind::Delete.entry().batch);
    }
}
