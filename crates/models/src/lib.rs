//! Canonical records of the marketplace and their input shapes.

pub mod errors;
pub mod db;
pub mod coerce;
pub mod record;
pub mod document;
pub mod provider;
pub mod service;
pub mod service_category;
pub mod book_request;
pub mod provider_review;
pub mod job;
pub mod credential;

pub use record::{Faq, Record, Validate};

record::impl_validate!(
    provider::ProviderCreate,
    provider::ProviderUpdate,
    service::ServiceCreate,
    service::ServiceUpdate,
    service_category::ServiceCategoryCreate,
    service_category::ServiceCategoryUpdate,
    book_request::BookRequestCreate,
    provider_review::ProviderReviewCreate,
    provider_review::ProviderReviewUpdate,
    job::JobCreate,
    job::JobUpdate,
);

#[cfg(test)]
mod tests;
