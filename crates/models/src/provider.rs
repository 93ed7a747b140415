use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;
use crate::record::{merge_fields, merge_optional_fields, record_meta, validate_email, validate_required, Faq, Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderType {
    Hospital,
    Clinic,
    Pharmacy,
    MedicalCenter,
    Other,
}

/// Clinic, hospital, pharmacy or similar business offering services.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub overall_rate: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub is_coming_soon: bool,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub total_services_view: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    /// First gallery image, used wherever no dedicated thumbnail applies.
    pub fn primary_image(&self) -> Option<&str> {
        self.gallery.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCreate {
    #[serde(deserialize_with = "coerce::text")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderType,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_count")]
    pub reviews_count: Option<u32>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub overall_rate: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub gallery: Vec<String>,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_coming_soon: bool,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub faqs: Vec<Faq>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub username: Option<String>,
    /// Consumed by the credential store; never persisted on the provider.
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub password: Option<String>,
}

impl ProviderCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_required("name", &self.name)?;
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            validate_email(email)?;
        }
        validate_password(self.password.as_deref())?;
        if self.password.is_some() && self.username.as_deref().map_or(true, |u| u.trim().is_empty()) {
            return Err(ModelError::Validation("username required when a password is set".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUpdate {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ProviderType>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_count")]
    pub reviews_count: Option<u32>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub overall_rate: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub gallery: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_flag")]
    pub is_coming_soon: Option<bool>,
    #[serde(default, deserialize_with = "coerce::opt_object_list")]
    pub faqs: Option<Vec<Faq>>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub password: Option<String>,
    /// Internal counter; never read from client input.
    #[serde(skip)]
    pub total_services_view: Option<u64>,
}

impl ProviderUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_required("name", name)?;
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            validate_email(email)?;
        }
        validate_password(self.password.as_deref())
    }
}

/// A supplied password must carry at least one non-whitespace character.
fn validate_password(password: Option<&str>) -> Result<(), ModelError> {
    match password {
        Some(p) if p.trim().is_empty() => Err(ModelError::Validation("password must not be empty".into())),
        _ => Ok(()),
    }
}

impl Record for Provider {
    const COLLECTION: &'static str = "providers";
    type Create = ProviderCreate;
    type Update = ProviderUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: ProviderCreate) -> Self {
        Self {
            id,
            name: input.name,
            kind: input.kind,
            description: input.description.unwrap_or_default(),
            address: input.address.unwrap_or_default(),
            phone: input.phone.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            city: input.city.unwrap_or_default(),
            country: input.country.unwrap_or_default(),
            latitude: input.latitude,
            longitude: input.longitude,
            reviews_count: input.reviews_count.unwrap_or_default(),
            overall_rate: input.overall_rate.unwrap_or_default(),
            thumbnail: input.thumbnail,
            gallery: input.gallery,
            is_coming_soon: input.is_coming_soon,
            faqs: input.faqs,
            username: input.username,
            total_services_view: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: ProviderUpdate) {
        merge_fields!(self, patch;
            name, kind, description, address, phone, email, city, country,
            reviews_count, overall_rate, gallery, is_coming_soon, faqs, total_services_view,
        );
        merge_optional_fields!(self, patch; latitude, longitude, thumbnail, username);
    }

    record_meta!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Provider {
        let input: ProviderCreate = serde_json::from_value(json!({
            "name": "Cedar Clinic", "type": "medical-center", "city": "Beirut",
            "gallery": ["a.png", "b.png"], "isComingSoon": "true"
        }))
        .unwrap();
        Provider::from_create("p1".into(), Utc::now(), input)
    }

    #[test]
    fn create_applies_defaults() {
        let p = sample();
        assert_eq!(p.kind, ProviderType::MedicalCenter);
        assert!(p.is_coming_soon);
        assert_eq!(p.primary_image(), Some("a.png"));
        assert_eq!(p.total_services_view, 0);
        assert!(p.faqs.is_empty());
    }

    #[test]
    fn update_touches_only_supplied_fields() {
        let mut p = sample();
        p.apply_update(ProviderUpdate { city: Some("Tyre".into()), latitude: Some(33.2), ..Default::default() });
        assert_eq!(p.city, "Tyre");
        assert_eq!(p.latitude, Some(33.2));
        assert_eq!(p.name, "Cedar Clinic");
        assert_eq!(p.gallery.len(), 2);
    }

    #[test]
    fn serializes_wire_names() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["type"], "medical-center");
        assert_eq!(v["isComingSoon"], true);
        assert!(v.get("totalServicesView").is_some());
        assert!(v.get("password").is_none());
    }

    #[test]
    fn password_requires_username() {
        let input: ProviderCreate =
            serde_json::from_value(json!({"name": "X", "type": "clinic", "password": "pw"})).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn blank_password_is_rejected() {
        let input: ProviderCreate = serde_json::from_value(
            json!({"name": "X", "type": "clinic", "username": "x", "password": ""}),
        )
        .unwrap();
        assert!(matches!(input.validate(), Err(ModelError::Validation(m)) if m == "password must not be empty"));

        let patch: ProviderUpdate = serde_json::from_value(json!({"password": "  "})).unwrap();
        assert!(patch.validate().is_err());
        assert!(ProviderUpdate::default().validate().is_ok());
    }
}
