//! Provider and service writes that touch more than one collection or need
//! a referential check.

use models::provider::{Provider, ProviderCreate, ProviderUpdate};
use models::service::{Service, ServiceCreate, ServiceUpdate};
use tracing::{instrument, warn};

use super::{MarketError, Marketplace};
use crate::auth::errors::AuthError;
use crate::auth::AuthService;
use crate::errors::ServiceError;

fn auth_fault(e: AuthError) -> MarketError {
    match e {
        AuthError::Validation(msg) => MarketError::Store(ServiceError::Validation(msg)),
        other => MarketError::Store(ServiceError::Db(other.to_string())),
    }
}

/// Hash a supplied password before anything is written.
fn prepare_password(password: Option<String>) -> Result<Option<String>, MarketError> {
    password.as_deref().map(AuthService::hash_password).transpose().map_err(auth_fault)
}

impl Marketplace {
    /// Create a provider; a supplied password is stored only as a hash.
    /// If the credential cannot be stored the provider is removed again.
    #[instrument(skip_all)]
    pub async fn create_provider(&self, mut input: ProviderCreate) -> Result<Provider, MarketError> {
        let hash = prepare_password(input.password.take())?;
        let provider = self.providers.create(input).await?;
        if let Some(hash) = hash {
            if let Err(e) = self.auth.store_hash(&provider.id, hash).await {
                if let Err(undo) = self.providers.delete(&provider.id).await {
                    warn!(provider_id = %provider.id, error = %undo, "provider rollback failed");
                }
                return Err(auth_fault(e));
            }
        }
        Ok(provider)
    }

    /// Partial update. The credential is rotated before the record changes,
    /// so a rejected password leaves the provider untouched.
    #[instrument(skip(self, patch))]
    pub async fn update_provider(&self, id: &str, mut patch: ProviderUpdate) -> Result<Option<Provider>, MarketError> {
        let hash = prepare_password(patch.password.take())?;
        if self.providers.get_by_id(id).await?.is_none() {
            return Ok(None);
        }
        if let Some(hash) = hash {
            self.auth.store_hash(id, hash).await.map_err(auth_fault)?;
        }
        Ok(self.providers.update(id, patch).await?)
    }

    /// Remove a provider and its credential. Services, bookings and reviews
    /// referencing it are left in place.
    #[instrument(skip(self))]
    pub async fn delete_provider(&self, id: &str) -> Result<bool, MarketError> {
        let existed = self.providers.delete(id).await?;
        if let Err(e) = self.auth.remove(id).await {
            warn!(provider_id = %id, error = %e, "credential cleanup failed");
        }
        Ok(existed)
    }

    /// Create a service owned by an existing provider.
    #[instrument(skip_all)]
    pub async fn create_service(&self, input: ServiceCreate) -> Result<Service, MarketError> {
        self.ensure_provider(&input.provider).await?;
        Ok(self.services.create(input).await?)
    }

    /// Partial update; a new `provider` must exist.
    #[instrument(skip(self, patch))]
    pub async fn update_service(&self, id: &str, patch: ServiceUpdate) -> Result<Option<Service>, MarketError> {
        if let Some(provider_id) = &patch.provider {
            self.ensure_provider(provider_id).await?;
        }
        Ok(self.services.update(id, patch).await?)
    }

    async fn ensure_provider(&self, provider_id: &str) -> Result<(), MarketError> {
        match self.providers.get_by_id(provider_id).await? {
            Some(_) => Ok(()),
            None => Err(MarketError::ProviderNotFound),
        }
    }
}
