//! Canonical entity names.

use heck::ToLowerCamelCase;
use std::fmt;

/// A backend collection name in canonical lowerCamelCase form.
///
/// The canonical form is the outer key of every generated selection and of
/// every response envelope, so it is computed once and reused.
///
/// Names with separators (`sales_order`, `sales-order`) are camel-cased.
/// Names without them only have their first character lowercased, so a
/// canonical name always canonicalizes to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Canonicalize a caller-supplied entity name.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        if name.chars().all(char::is_alphanumeric) {
            Self(with_first(name, char::to_lowercase))
        } else {
            Self(name.to_lower_camel_case())
        }
    }

    /// The canonical name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// UpperCamelCase form, used to derive input type names.
    pub fn type_name(&self) -> String {
        with_first(&self.0, char::to_uppercase)
    }

    /// Name of the payload input type (`InvoiceInput`).
    pub fn input_type(&self) -> String {
        format!("{}Input", self.type_name())
    }
}

fn with_first<I>(name: &str, map: impl FnOnce(char) -> I) -> String
where
    I: Iterator<Item = char>,
{
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => map(first).chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EntityName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&EntityName> for EntityName {
    fn from(name: &EntityName) -> Self {
        name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms() {
        assert_eq!(EntityName::new("Invoice").as_str(), "invoice");
        assert_eq!(EntityName::new("SalesOrder").as_str(), "salesOrder");
        assert_eq!(EntityName::new("sales_order").as_str(), "salesOrder");
        assert_eq!(EntityName::new("sales-order").as_str(), "salesOrder");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in [
            "Invoice",
            "SalesOrder",
            "sales_order",
            "purchaseOrderLine",
            "a_b_c",
            "aBC",
            "HTTPLog",
            "sales order",
        ] {
            let once = EntityName::new(raw);
            let twice = EntityName::new(once.as_str());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_single_letter_segments() {
        assert_eq!(EntityName::new("a_b_c").as_str(), "aBC");
        assert_eq!(EntityName::new("aBC").as_str(), "aBC");
        assert_eq!(EntityName::new("aBC").type_name(), "ABC");
    }

    #[test]
    fn test_input_type() {
        let name = EntityName::new("sales_order");
        assert_eq!(name.type_name(), "SalesOrder");
        assert_eq!(name.input_type(), "SalesOrderInput");
    }
}
