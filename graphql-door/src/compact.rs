//! Response compaction.
//!
//! Responses arrive as `{ entity: { operation: payload } }`. Compaction
//! returns the payload, or the caller's default when the payload is
//! missing, `null`, `[]` or `{}`. A missing key is not an error; it is
//! logged so a misspelled entity or operation name can be told apart from
//! an empty result.

use serde_json::Value;
use tracing::{debug, warn};

/// Whether a payload counts as "no data".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Extract `response[entity][operation]`, falling back to `default`.
pub fn compact_response(entity: &str, response: &Value, operation: &str, default: Value) -> Value {
    let Some(entity_value) = response.get(entity) else {
        warn!(
            entity = %entity,
            operation = %operation,
            "Entity key missing from response, using default"
        );
        return default;
    };

    if entity_value.is_null() {
        debug!(entity = %entity, operation = %operation, "Entity is null, using default");
        return default;
    }

    let Some(payload) = entity_value.get(operation) else {
        warn!(
            entity = %entity,
            operation = %operation,
            "Operation key missing from response, using default"
        );
        return default;
    };

    if is_empty_value(payload) {
        debug!(entity = %entity, operation = %operation, "Empty payload, using default");
        return default;
    }

    payload.clone()
}

/// Extract the number under `response[entity].count`.
///
/// Accepts a bare number or a `{ value }` wrapper; anything else is `0`.
pub fn compact_count_response(entity: &str, response: &Value) -> u64 {
    let payload = compact_response(entity, response, "count", Value::Null);

    let number = match &payload {
        Value::Object(map) => map.get("value"),
        other => Some(other),
    };

    match number {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_returns_payload() {
        let response = json!({ "invoice": { "queryMany": [{ "id": "1", "total": 100 }] } });
        assert_eq!(
            compact_response("invoice", &response, "queryMany", json!([])),
            json!([{ "id": "1", "total": 100 }])
        );
    }

    #[test]
    fn test_scalars_are_not_empty() {
        let response = json!({ "invoice": { "approve": false, "rank": 0 } });
        assert_eq!(compact_response("invoice", &response, "approve", json!({})), json!(false));
        assert_eq!(compact_response("invoice", &response, "rank", json!({})), json!(0));
    }

    #[test]
    fn test_defaults() {
        let default = json!([]);
        for response in [
            json!({}),
            json!({ "invoice": null }),
            json!({ "invoice": {} }),
            json!({ "invoice": { "queryMany": null } }),
            json!({ "invoice": { "queryMany": [] } }),
            json!({ "invoice": { "queryMany": {} } }),
            json!({ "customer": { "queryMany": [1] } }),
            Value::Null,
        ] {
            assert_eq!(
                compact_response("invoice", &response, "queryMany", default.clone()),
                default
            );
        }
    }

    #[test]
    fn test_operation_name_must_match() {
        let response = json!({ "invoice": { "overdueInvoices": [{ "id": "1" }] } });
        assert_eq!(
            compact_response("invoice", &response, "overdue", json!({})),
            json!({})
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(
            compact_count_response("invoice", &json!({ "invoice": { "count": { "value": 5 } } })),
            5
        );
        assert_eq!(
            compact_count_response("invoice", &json!({ "invoice": { "count": 7 } })),
            7
        );
        assert_eq!(
            compact_count_response("invoice", &json!({ "invoice": { "count": 3.0 } })),
            3
        );
        assert_eq!(
            compact_count_response("invoice", &json!({ "invoice": { "count": null } })),
            0
        );
        assert_eq!(compact_count_response("invoice", &json!({})), 0);
    }
}
