use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::errors::ModelError;
use crate::record::{merge_fields, merge_optional_fields, record_meta, validate_required, Faq, Record};

/// A bookable offering. `price` and `discount` stay textual; numeric
/// handling happens where they are compared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    #[serde(default)]
    pub discount: Option<String>,
    #[serde(default)]
    pub valid_discount_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub cancellation: bool,
    #[serde(default)]
    pub consultation: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub package_highlights: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
    #[serde(default)]
    pub expected_outcome: Vec<String>,
    #[serde(default)]
    pub clinic_information: String,
    #[serde(default)]
    pub how_it_works: String,
    #[serde(default)]
    pub faq_package: Vec<Faq>,
    #[serde(default)]
    pub faq_provider: Vec<Faq>,
    #[serde(default)]
    pub faq_procedures: Vec<Faq>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub provider: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn primary_image(&self) -> Option<&str> {
        self.gallery.first().map(String::as_str)
    }

    pub fn has_discount(&self) -> bool {
        self.discount.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    pub fn is_package(&self) -> bool {
        !self.package_highlights.is_empty()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCreate {
    #[serde(deserialize_with = "coerce::text")]
    pub name: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "coerce::text")]
    pub price: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub discount: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_date")]
    pub valid_discount_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_count")]
    pub reviews_count: Option<u32>,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub recommended: bool,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub cancellation: bool,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub consultation: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub package_highlights: Vec<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub highlights: Vec<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub included: Vec<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub excluded: Vec<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub expected_outcome: Vec<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub clinic_information: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub how_it_works: Option<String>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub faq_package: Vec<Faq>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub faq_provider: Vec<Faq>,
    #[serde(default, deserialize_with = "coerce::object_list")]
    pub faq_procedures: Vec<Faq>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "coerce::text")]
    pub provider: String,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "coerce::text_list")]
    pub gallery: Vec<String>,
}

impl ServiceCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_required("name", &self.name)?;
        validate_required("price", &self.price)?;
        validate_required("provider", &self.provider)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub discount: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_date")]
    pub valid_discount_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "coerce::opt_number")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_count")]
    pub reviews_count: Option<u32>,
    #[serde(default, deserialize_with = "coerce::opt_flag")]
    pub recommended: Option<bool>,
    #[serde(default, deserialize_with = "coerce::opt_flag")]
    pub cancellation: Option<bool>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub consultation: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub package_highlights: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub highlights: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub included: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub excluded: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub expected_outcome: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub clinic_information: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub how_it_works: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_object_list")]
    pub faq_package: Option<Vec<Faq>>,
    #[serde(default, deserialize_with = "coerce::opt_object_list")]
    pub faq_provider: Option<Vec<Faq>>,
    #[serde(default, deserialize_with = "coerce::opt_object_list")]
    pub faq_procedures: Option<Vec<Faq>>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub categories: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_text_list")]
    pub gallery: Option<Vec<String>>,
}

impl ServiceUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_required("name", name)?;
        }
        if let Some(provider) = &self.provider {
            validate_required("provider", provider)?;
        }
        Ok(())
    }
}

impl Record for Service {
    const COLLECTION: &'static str = "services";
    type Create = ServiceCreate;
    type Update = ServiceUpdate;

    fn from_create(id: String, now: DateTime<Utc>, input: ServiceCreate) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description.unwrap_or_default(),
            price: input.price,
            discount: input.discount.filter(|d| !d.trim().is_empty()),
            valid_discount_date: input.valid_discount_date,
            rate: input.rate.unwrap_or_default(),
            reviews_count: input.reviews_count.unwrap_or_default(),
            recommended: input.recommended,
            cancellation: input.cancellation,
            consultation: input.consultation.unwrap_or_default(),
            duration: input.duration.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
            package_highlights: input.package_highlights,
            highlights: input.highlights,
            included: input.included,
            excluded: input.excluded,
            expected_outcome: input.expected_outcome,
            clinic_information: input.clinic_information.unwrap_or_default(),
            how_it_works: input.how_it_works.unwrap_or_default(),
            faq_package: input.faq_package,
            faq_provider: input.faq_provider,
            faq_procedures: input.faq_procedures,
            categories: input.categories,
            provider: input.provider,
            thumbnail: input.thumbnail,
            gallery: input.gallery,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, patch: ServiceUpdate) {
        merge_fields!(self, patch;
            name, description, price, rate, reviews_count, recommended, cancellation,
            consultation, duration, location, package_highlights, highlights, included,
            excluded, expected_outcome, clinic_information, how_it_works, faq_package,
            faq_provider, faq_procedures, categories, provider, gallery,
        );
        merge_optional_fields!(self, patch; discount, valid_discount_date, thumbnail);
    }

    record_meta!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Service {
        let input: ServiceCreate = serde_json::from_value(json!({
            "name": "Dental cleaning", "price": 120, "provider": "p1",
            "recommended": "true", "packageHighlights": "[\"x-ray\"]",
            "faqProcedures": [{"title": "Pain?", "description": "No"}]
        }))
        .unwrap();
        Service::from_create("s1".into(), Utc::now(), input)
    }

    #[test]
    fn create_coerces_form_values() {
        let s = sample();
        assert_eq!(s.price, "120");
        assert!(s.recommended);
        assert!(s.is_package());
        assert!(!s.has_discount());
        assert_eq!(s.faq_procedures.len(), 1);
    }

    #[test]
    fn blank_discount_is_no_discount() {
        let mut s = sample();
        s.apply_update(ServiceUpdate { discount: Some("  ".into()), ..Default::default() });
        assert!(!s.has_discount());
        s.apply_update(ServiceUpdate { discount: Some("15".into()), ..Default::default() });
        assert!(s.has_discount());
    }

    #[test]
    fn update_keeps_unsupplied_fields() {
        let mut s = sample();
        s.apply_update(ServiceUpdate { price: Some("99".into()), ..Default::default() });
        assert_eq!(s.price, "99");
        assert_eq!(s.provider, "p1");
        assert_eq!(s.package_highlights, vec!["x-ray"]);
    }

    #[test]
    fn missing_provider_is_rejected_by_serde() {
        let r = serde_json::from_value::<ServiceCreate>(json!({"name": "n", "price": "1"}));
        assert!(r.is_err());
    }
}
