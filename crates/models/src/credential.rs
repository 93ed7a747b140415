use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{record_meta, Record};

/// Password hash for a provider login, keyed by the provider id.
/// Kept out of the provider record so it never reaches clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredential {
    pub id: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct CredentialCreate {
    pub password_hash: String,
    pub password_algorithm: String,
}

#[derive(Clone, Debug, Default)]
pub struct CredentialUpdate {
    pub password_hash: Option<String>,
}

impl Record for ProviderCredential {
    const COLLECTION: &'static str = "provider_credentials";
    type Create = CredentialCreate;
    type Update = CredentialUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: CredentialCreate) -> Self {
        Self {
            id,
            password_hash: input.password_hash,
            password_algorithm: input.password_algorithm,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: CredentialUpdate) {
        if let Some(hash) = patch.password_hash {
            self.password_hash = hash;
        }
    }

    record_meta!();
}
