use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;
use crate::record::{merge_fields, record_meta, validate_required, Record};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceCategoryCreate {
    #[serde(deserialize_with = "coerce::text")]
    pub name: String,
}

impl ServiceCategoryCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_required("name", &self.name)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServiceCategoryUpdate {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub name: Option<String>,
}

impl ServiceCategoryUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        match &self.name {
            Some(name) => validate_required("name", name),
            None => Ok(()),
        }
    }
}

impl Record for ServiceCategory {
    const COLLECTION: &'static str = "service_categories";
    type Create = ServiceCategoryCreate;
    type Update = ServiceCategoryUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: ServiceCategoryCreate) -> Self {
        Self { id, name: input.name, created_at: now, updated_at: now }
    }

    fn apply_update(&mut self, patch: ServiceCategoryUpdate) {
        merge_fields!(self, patch; name);
    }

    record_meta!();
}
