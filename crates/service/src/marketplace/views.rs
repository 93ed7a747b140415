//! Read-side shapes returned by the aggregation layer.

use chrono::{DateTime, Utc};
use models::book_request::BookRequest;
use models::provider::{Provider, ProviderType};
use models::provider_review::ProviderReview;
use models::service::Service;
use models::Faq;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderType,
    pub city: String,
    pub country: String,
    pub image: Option<String>,
    pub is_coming_soon: bool,
}

impl From<&Provider> for ProviderSummary {
    fn from(p: &Provider) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            kind: p.kind,
            city: p.city.clone(),
            country: p.country.clone(),
            image: p.primary_image().map(str::to_string),
            is_coming_soon: p.is_coming_soon,
        }
    }
}

/// Service card on the home page; `image` is the thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    pub id: String,
    pub name: String,
    pub price: String,
    pub provider: String,
    pub provider_name: String,
    pub image: Option<String>,
    pub rate: f64,
    pub reviews_count: u32,
    pub discount: Option<String>,
    pub valid_discount_date: Option<DateTime<Utc>>,
    pub location: String,
}

impl ServiceListing {
    pub fn new(s: &Service, provider_name: &str) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            price: s.price.clone(),
            provider: s.provider.clone(),
            provider_name: provider_name.to_string(),
            image: s.thumbnail.clone(),
            rate: s.rate,
            reviews_count: s.reviews_count,
            discount: s.discount.clone(),
            valid_discount_date: s.valid_discount_date,
            location: s.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub providers: Vec<ProviderSummary>,
    pub recommended_services: Vec<ServiceListing>,
    pub services: Vec<ServiceListing>,
}

/// Full service record with its provider's name attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWithProvider {
    #[serde(flatten)]
    pub service: Service,
    pub provider_name: String,
}

/// Compact card for other services of the same provider; `image` is gallery[0].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedService {
    pub id: String,
    pub name: String,
    pub price: String,
    pub discount: Option<String>,
    pub recommended: bool,
    pub provider_name: String,
    pub image: Option<String>,
    pub rate: f64,
    pub provider: String,
    pub reviews_count: u32,
    pub valid_discount_date: Option<DateTime<Utc>>,
}

impl RelatedService {
    pub fn new(s: &Service, provider_name: &str) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            price: s.price.clone(),
            discount: s.discount.clone(),
            recommended: s.recommended,
            provider_name: provider_name.to_string(),
            image: s.primary_image().map(str::to_string),
            rate: s.rate,
            provider: s.provider.clone(),
            reviews_count: s.reviews_count,
            valid_discount_date: s.valid_discount_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,
    pub provider_name: String,
    pub provider_about: String,
    pub faqs_provider: Vec<Faq>,
    pub related_services: Vec<RelatedService>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderServiceView {
    #[serde(flatten)]
    pub service: Service,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequestView {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub description: Option<String>,
    pub provider: String,
    pub service: String,
    /// Absent when the booked service no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
}

impl BookRequestView {
    pub fn new(b: BookRequest, service_name: Option<String>) -> Self {
        Self {
            name: b.name,
            phone_number: b.phone_number,
            email: b.email,
            description: b.description,
            provider: b.provider,
            service: b.service,
            service_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetail {
    #[serde(flatten)]
    pub provider: Provider,
    pub services: Vec<ProviderServiceView>,
    pub reviews: Vec<ProviderReview>,
    pub book_requests: Vec<BookRequestView>,
}

/// Public booking form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub provider_id: String,
    pub service_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Placeholder payload of booking and failed-login envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}
