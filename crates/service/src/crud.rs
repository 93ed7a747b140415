//! Entity services: thin pass-through over one store per record kind.

use std::sync::Arc;

use chrono::Utc;
use models::book_request::BookRequest;
use models::credential::ProviderCredential;
use models::job::Job;
use models::provider::{Provider, ProviderUpdate};
use models::provider_review::ProviderReview;
use models::service::Service;
use models::service_category::ServiceCategory;
use models::Record;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::{EntityStore, Filter};

/// CRUD over a single record kind.
///
/// Ids and timestamps are assigned here; input validation belongs to the
/// caller. Missing ids are reported as `None`/`false`, never as errors.
pub struct CrudService<E: Record> {
    store: Arc<dyn EntityStore<E>>,
}

impl<E: Record> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

pub type ProviderService = CrudService<Provider>;
pub type ServiceService = CrudService<Service>;
pub type ServiceCategoryService = CrudService<ServiceCategory>;
pub type BookRequestService = CrudService<BookRequest>;
pub type ProviderReviewService = CrudService<ProviderReview>;
pub type JobService = CrudService<Job>;
pub type CredentialService = CrudService<ProviderCredential>;

impl<E: Record> CrudService<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(collection = E::COLLECTION))]
    pub async fn create(&self, input: E::Create) -> Result<E, ServiceError> {
        self.create_with_id(Uuid::new_v4().to_string(), input).await
    }

    /// Create under a caller-chosen id, e.g. a credential keyed by its provider.
    pub async fn create_with_id(&self, id: String, input: E::Create) -> Result<E, ServiceError> {
        let record = E::from_create(id, Utc::now(), input);
        let saved = self.store.insert(record).await?;
        info!(collection = E::COLLECTION, id = %saved.id(), "entity_created");
        Ok(saved)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<E>, ServiceError> {
        self.store.find_by_id(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<E>, ServiceError> {
        self.store.find(&Filter::All).await
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<E>, ServiceError> {
        self.store.find(filter).await
    }

    /// Apply a partial update. `Ok(None)` when the id does not exist.
    #[instrument(skip_all, fields(collection = E::COLLECTION, id = %id))]
    pub async fn update(&self, id: &str, patch: E::Update) -> Result<Option<E>, ServiceError> {
        let Some(mut record) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        record.apply_update(patch);
        record.touch(Utc::now());
        let updated = self.store.replace(record).await?;
        if updated.is_some() {
            info!(collection = E::COLLECTION, id = %id, "entity_updated");
        }
        Ok(updated)
    }

    /// Idempotent; the flag reports whether the record existed.
    #[instrument(skip_all, fields(collection = E::COLLECTION, id = %id))]
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let existed = self.store.delete(id).await?;
        if existed {
            info!(collection = E::COLLECTION, id = %id, "entity_deleted");
        }
        Ok(existed)
    }
}

impl ProviderService {
    /// Bump `totalServicesView`. Concurrent bumps may be lost; failures are
    /// logged and swallowed.
    pub async fn increment_views(&self, id: &str) {
        let current = match self.get_by_id(id).await {
            Ok(Some(p)) => p.total_services_view,
            Ok(None) => return,
            Err(e) => {
                warn!(provider_id = %id, error = %e, "view counter read failed");
                return;
            }
        };
        let patch = ProviderUpdate { total_services_view: Some(current.saturating_add(1)), ..Default::default() };
        if let Err(e) = self.update(id, patch).await {
            warn!(provider_id = %id, error = %e, "view counter update failed");
        }
    }
}

impl BookRequestService {
    pub async fn get_by_provider(&self, provider_id: &str) -> Result<Vec<BookRequest>, ServiceError> {
        self.find(&Filter::eq("provider", provider_id)).await
    }
}

impl ProviderReviewService {
    pub async fn get_by_provider(&self, provider_id: &str) -> Result<Vec<ProviderReview>, ServiceError> {
        self.find(&Filter::eq("provider", provider_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonCollectionStore;
    use models::job::{JobCreate, JobUpdate};
    use models::provider::ProviderCreate;
    use serde_json::json;

    fn jobs() -> JobService {
        CrudService::<Job>::new(JsonCollectionStore::<Job>::in_memory())
    }

    fn job_input(title: &str) -> JobCreate {
        serde_json::from_value(json!({"title": title, "website": "w", "link": "l"})).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() -> Result<(), anyhow::Error> {
        let svc = jobs();
        let job = svc.create(job_input("Nurse")).await?;
        assert!(!job.id.is_empty());
        assert_eq!(job.created_at, job.updated_at);
        assert_eq!(svc.get_by_id(&job.id).await?, Some(job));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_id_is_none() -> Result<(), anyhow::Error> {
        let svc = jobs();
        let res = svc.update("nope", JobUpdate { title: Some("x".into()), ..Default::default() }).await?;
        assert!(res.is_none());
        assert!(svc.get_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields_and_bumps_updated_at() -> Result<(), anyhow::Error> {
        let svc = jobs();
        let job = svc.create(job_input("Nurse")).await?;
        let updated = svc
            .update(&job.id, JobUpdate { category: Some("care".into()), ..Default::default() })
            .await?
            .expect("exists");
        assert_eq!(updated.title, "Nurse");
        assert_eq!(updated.category.as_deref(), Some("care"));
        assert!(updated.updated_at >= job.updated_at);
        assert_eq!(updated.created_at, job.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), anyhow::Error> {
        let svc = jobs();
        let job = svc.create(job_input("Nurse")).await?;
        assert!(svc.delete(&job.id).await?);
        assert!(!svc.delete(&job.id).await?);
        assert!(!svc.delete("never-existed").await?);
        Ok(())
    }

    #[tokio::test]
    async fn increment_views_counts_up_and_ignores_missing() -> Result<(), anyhow::Error> {
        let svc: ProviderService = CrudService::<Provider>::new(JsonCollectionStore::<Provider>::in_memory());
        let input: ProviderCreate = serde_json::from_value(json!({"name": "Clinic", "type": "clinic"}))?;
        let p = svc.create(input).await?;
        svc.increment_views(&p.id).await;
        svc.increment_views(&p.id).await;
        svc.increment_views("missing").await;
        assert_eq!(svc.get_by_id(&p.id).await?.map(|p| p.total_services_view), Some(2));
        Ok(())
    }
}
