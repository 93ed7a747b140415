use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;
use crate::record::{merge_fields, merge_optional_fields, record_meta, validate_required, Record};

/// Standalone job listing; not linked to providers or services.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub website: String,
    pub link: String,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct JobCreate {
    #[serde(deserialize_with = "coerce::text")]
    pub title: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "coerce::text")]
    pub website: String,
    #[serde(deserialize_with = "coerce::text")]
    pub link: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub category: Option<String>,
}

impl JobCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_required("title", &self.title)?;
        validate_required("website", &self.website)?;
        validate_required("link", &self.link)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobUpdate {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub category: Option<String>,
}

impl JobUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(title) = &self.title {
            validate_required("title", title)?;
        }
        Ok(())
    }
}

impl Record for Job {
    const COLLECTION: &'static str = "jobs";
    type Create = JobCreate;
    type Update = JobUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: JobCreate) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            website: input.website,
            link: input.link,
            category: input.category,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: JobUpdate) {
        merge_fields!(self, patch; title, description, website, link);
        merge_optional_fields!(self, patch; category);
    }

    record_meta!();
}
