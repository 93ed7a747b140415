//! Aggregation layer: client-shaped views joining providers, services,
//! reviews and book requests.
//!
//! Expected outcomes (unknown ids, empty catalog, bad credentials) come back
//! as `MarketError` values the delivery layer turns into failure envelopes;
//! only `MarketError::Store` represents an actual fault.

use std::collections::HashMap;
use std::sync::Arc;

use models::provider::Provider;
use thiserror::Error;

use crate::auth::AuthService;
use crate::crud::{BookRequestService, ProviderReviewService, ProviderService, ServiceService};
use crate::errors::ServiceError;

mod booking;
mod detail;
mod home;
mod login;
mod search;
pub mod views;
mod writes;

pub use search::{ServiceFilter, ServiceQuery, SortOrder};

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Service not found")]
    ServiceNotFound,
    #[error("Provider not found")]
    ProviderNotFound,
    #[error("No services or providers found")]
    EmptyCollection,
    #[error("Invalid provider or service id")]
    InvalidReference,
    #[error("Provider not found or invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] ServiceError),
}

impl MarketError {
    /// Ordinary outcome rather than a fault.
    pub fn is_expected(&self) -> bool {
        !matches!(self, MarketError::Store(_))
    }
}

/// Entity services the aggregation reads from and writes through.
#[derive(Clone)]
pub struct Marketplace {
    pub providers: ProviderService,
    pub services: ServiceService,
    pub book_requests: BookRequestService,
    pub reviews: ProviderReviewService,
    auth: Arc<AuthService>,
}

impl Marketplace {
    pub fn new(
        providers: ProviderService,
        services: ServiceService,
        book_requests: BookRequestService,
        reviews: ProviderReviewService,
        auth: AuthService,
    ) -> Self {
        Self { providers, services, book_requests, reviews, auth: Arc::new(auth) }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    async fn provider_index(&self) -> Result<HashMap<String, Provider>, ServiceError> {
        Ok(self.providers.get_all().await?.into_iter().map(|p| (p.id.clone(), p)).collect())
    }
}
