use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;
use crate::record::{merge_fields, merge_optional_fields, record_meta, validate_email, validate_required, Record};

/// A patient's request to book one service from one provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    #[serde(default)]
    pub description: Option<String>,
    pub provider: String,
    pub service: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequestCreate {
    #[serde(deserialize_with = "coerce::text")]
    pub name: String,
    #[serde(deserialize_with = "coerce::text")]
    pub phone_number: String,
    #[serde(deserialize_with = "coerce::text")]
    pub email: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "coerce::text")]
    pub provider: String,
    #[serde(deserialize_with = "coerce::text")]
    pub service: String,
}

impl BookRequestCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_required("name", &self.name)?;
        validate_required("phoneNumber", &self.phone_number)?;
        validate_email(&self.email)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequestUpdate {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
}

impl Record for BookRequest {
    const COLLECTION: &'static str = "book_requests";
    type Create = BookRequestCreate;
    type Update = BookRequestUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: BookRequestCreate) -> Self {
        Self {
            id,
            name: input.name,
            phone_number: input.phone_number,
            email: input.email,
            description: input.description,
            provider: input.provider,
            service: input.service,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: BookRequestUpdate) {
        merge_fields!(self, patch; name, phone_number, email);
        merge_optional_fields!(self, patch; description);
    }

    record_meta!();
}
