//! Common contract for everything kept in an entity store.
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A persisted record of one entity kind.
///
/// Ids are opaque strings assigned by the store at creation; `created_at`
/// and `updated_at` are maintained by the store on every write.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name used by document backends.
    const COLLECTION: &'static str;
    type Create: Send + 'static;
    type Update: Send + 'static;

    fn from_create(id: String, now: DateTime<Utc>, input: Self::Create) -> Self;
    /// Apply a partial update; only supplied fields change.
    fn apply_update(&mut self, update: Self::Update);
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Question/answer pair shown on provider and service pages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub title: String,
    pub description: String,
}

/// `Some(v)` in the patch replaces the field.
macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $( if let Some(v) = $patch.$field { $target.$field = v; } )+
    };
}

/// Same as `merge_fields!` for fields that are themselves optional.
macro_rules! merge_optional_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $( if let Some(v) = $patch.$field { $target.$field = Some(v); } )+
    };
}

macro_rules! record_meta {
    () => {
        fn id(&self) -> &str { &self.id }
        fn created_at(&self) -> chrono::DateTime<chrono::Utc> { self.created_at }
        fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) { self.updated_at = now; }
    };
}

/// Input shapes that can reject themselves before reaching a store.
pub trait Validate {
    fn validate(&self) -> Result<(), crate::errors::ModelError>;
}

/// Expose each shape's inherent `validate` through [`Validate`].
macro_rules! impl_validate {
    ($($ty:ty),+ $(,)?) => {
        $( impl $crate::record::Validate for $ty {
            fn validate(&self) -> Result<(), $crate::errors::ModelError> { <$ty>::validate(self) }
        } )+
    };
}

pub(crate) use {impl_validate, merge_fields, merge_optional_fields, record_meta};

/// Reject blank required text.
pub fn validate_required(field: &str, value: &str) -> Result<(), crate::errors::ModelError> {
    if value.trim().is_empty() {
        return Err(crate::errors::ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), crate::errors::ModelError> {
    if !email.contains('@') {
        return Err(crate::errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}
