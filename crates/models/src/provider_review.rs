use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;
use crate::record::{merge_fields, record_meta, validate_required, Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReview {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_in_website: bool,
    pub gender: Gender,
    pub description: String,
    pub provider: String,
    pub rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReviewCreate {
    #[serde(deserialize_with = "coerce::text")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub display_in_website: bool,
    pub gender: Gender,
    #[serde(deserialize_with = "coerce::text")]
    pub description: String,
    #[serde(deserialize_with = "coerce::text")]
    pub provider: String,
    #[serde(deserialize_with = "coerce::number")]
    pub rate: f64,
}

impl ProviderReviewCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_required("name", &self.name)?;
        validate_required("provider", &self.provider)?;
        if !(0.0..=5.0).contains(&self.rate) {
            return Err(ModelError::Validation("rate must be between 0 and 5".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReviewUpdate {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_flag")]
    pub display_in_website: Option<bool>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub rate: Option<f64>,
}

impl ProviderReviewUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(rate) = self.rate {
            if !(0.0..=5.0).contains(&rate) {
                return Err(ModelError::Validation("rate must be between 0 and 5".into()));
            }
        }
        Ok(())
    }
}

impl Record for ProviderReview {
    const COLLECTION: &'static str = "provider_reviews";
    type Create = ProviderReviewCreate;
    type Update = ProviderReviewUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: ProviderReviewCreate) -> Self {
        Self {
            id,
            name: input.name,
            display_in_website: input.display_in_website,
            gender: input.gender,
            description: input.description,
            provider: input.provider,
            rate: input.rate,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: ProviderReviewUpdate) {
        merge_fields!(self, patch; name, display_in_website, gender, description, provider, rate);
    }

    record_meta!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rate_accepts_text_and_is_bounded() {
        let ok: ProviderReviewCreate = serde_json::from_value(json!({
            "name": "Rana", "gender": "female", "description": "Great", "provider": "p1", "rate": "4.5"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.rate, 4.5);

        let bad: ProviderReviewCreate = serde_json::from_value(json!({
            "name": "Rana", "gender": "male", "description": "x", "provider": "p1", "rate": 9
        }))
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let r = serde_json::from_value::<ProviderReviewCreate>(json!({
            "name": "A", "gender": "other", "description": "x", "provider": "p1", "rate": 3
        }));
        assert!(r.is_err());
    }
}
