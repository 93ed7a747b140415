//! Storage abstractions for the service layer.
//!
//! One `EntityStore` per record kind. Backends keep collections in insertion
//! order and answer the small filter language the services need; there are
//! no cross-collection queries.

use async_trait::async_trait;
use models::Record;
use regex::Regex;
use serde_json::Value;

use crate::errors::ServiceError;

pub mod json_collection_store;
pub mod seaorm_store;

pub use json_collection_store::JsonCollectionStore;
pub use seaorm_store::SeaOrmDocumentStore;

/// Query over top-level fields of a record's JSON form.
#[derive(Debug, Clone)]
pub enum Filter {
    All,
    /// Field's string form equals `value`.
    Eq { field: &'static str, value: String },
    /// `pattern` matches the string form of at least one field.
    AnyMatch { fields: &'static [&'static str], pattern: Regex },
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::Eq { field, value: value.into() }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => field_text(doc, field).as_deref() == Some(value.as_str()),
            Filter::AnyMatch { fields, pattern } => fields
                .iter()
                .filter_map(|f| field_text(doc, f))
                .any(|text| pattern.is_match(&text)),
        }
    }
}

fn field_text(doc: &Value, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Persistence for a single record kind.
///
/// `find` returns records in insertion order. `replace` and `delete` report
/// whether the id existed instead of failing.
#[async_trait]
pub trait EntityStore<E: Record>: Send + Sync {
    async fn insert(&self, record: E) -> Result<E, ServiceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, ServiceError>;
    async fn find(&self, filter: &Filter) -> Result<Vec<E>, ServiceError>;
    async fn replace(&self, record: E) -> Result<Option<E>, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

/// Evaluate `filter` against a record through its serialized form.
pub(crate) fn record_matches<E: Record>(filter: &Filter, record: &E) -> Result<bool, ServiceError> {
    if matches!(filter, Filter::All) {
        return Ok(true);
    }
    let doc = serde_json::to_value(record).map_err(ServiceError::db)?;
    Ok(filter.matches(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_compares_string_form() {
        let doc = json!({"provider": "p1", "rate": 4});
        assert!(Filter::eq("provider", "p1").matches(&doc));
        assert!(Filter::eq("rate", "4").matches(&doc));
        assert!(!Filter::eq("provider", "p2").matches(&doc));
        assert!(!Filter::eq("missing", "p1").matches(&doc));
    }

    #[test]
    fn any_match_checks_each_field() {
        let pattern = Regex::new("(?i)9").unwrap();
        let filter = Filter::AnyMatch { fields: &["name", "price"], pattern };
        assert!(filter.matches(&json!({"name": "x", "price": "299"})));
        assert!(!filter.matches(&json!({"name": "x", "price": "50"})));
    }
}
