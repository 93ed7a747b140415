//! Runtime environment helpers
//!
//! Directory checks and wiring of every entity service onto the configured
//! storage backend, so binaries and the HTTP layer never touch stores directly.

use std::path::Path;
use std::sync::Arc;

use configs::{AppConfig, StorageBackend};
use migration::{Migrator, MigratorTrait};
use models::Record;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::auth::{token::TokenCodec, AuthService};
use crate::crud::{
    BookRequestService, CrudService, JobService, ProviderReviewService, ProviderService, ServiceCategoryService,
    ServiceService,
};
use crate::marketplace::Marketplace;
use crate::storage::{EntityStore, JsonCollectionStore, SeaOrmDocumentStore};

/// Ensure expected directories exist; warn on missing optional ones.
pub async fn ensure_env(upload_root: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(upload_root, data_dir).await
}

/// Every entity service plus the aggregation layer built on them.
#[derive(Clone)]
pub struct Services {
    pub providers: ProviderService,
    pub services: ServiceService,
    pub categories: ServiceCategoryService,
    pub book_requests: BookRequestService,
    pub reviews: ProviderReviewService,
    pub jobs: JobService,
    pub market: Marketplace,
}

enum Backend<'a> {
    Memory,
    File(&'a Path),
    Db(DatabaseConnection),
}

impl Backend<'_> {
    async fn store<E: Record>(&self) -> anyhow::Result<Arc<dyn EntityStore<E>>> {
        let store: Arc<dyn EntityStore<E>> = match self {
            Backend::Memory => JsonCollectionStore::<E>::in_memory(),
            Backend::File(dir) => JsonCollectionStore::<E>::open_in(*dir).await?,
            Backend::Db(db) => Arc::new(SeaOrmDocumentStore::<E>::new(db.clone())),
        };
        Ok(store)
    }

    async fn service<E: Record>(&self) -> anyhow::Result<CrudService<E>> {
        Ok(CrudService::new(self.store::<E>().await?))
    }
}

impl Services {
    /// In-memory wiring for tests and the `memory` backend.
    pub async fn in_memory(auth: &configs::AuthConfig) -> anyhow::Result<Self> {
        Self::assemble(&Backend::Memory, auth).await
    }

    /// Wire services for the configured backend; `postgres` connects and
    /// brings the `document` schema up to date first.
    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let backend = match cfg.storage.backend {
            StorageBackend::Memory => Backend::Memory,
            StorageBackend::File => Backend::File(Path::new(&cfg.storage.data_dir)),
            StorageBackend::Postgres => {
                let db = models::db::connect_with_config(&cfg.database).await?;
                Migrator::up(&db, None).await?;
                info!("document schema migrated");
                Backend::Db(db)
            }
        };
        info!(backend = ?cfg.storage.backend, "storage backend selected");
        Self::assemble(&backend, &cfg.auth).await
    }

    async fn assemble(backend: &Backend<'_>, auth: &configs::AuthConfig) -> anyhow::Result<Self> {
        let providers: ProviderService = backend.service().await?;
        let services: ServiceService = backend.service().await?;
        let book_requests: BookRequestService = backend.service().await?;
        let reviews: ProviderReviewService = backend.service().await?;
        let auth = AuthService::new(backend.service().await?, TokenCodec::from_config(auth));
        let market = Marketplace::new(providers.clone(), services.clone(), book_requests.clone(), reviews.clone(), auth);
        Ok(Self {
            providers,
            services,
            categories: backend.service().await?,
            book_requests,
            reviews,
            jobs: backend.service().await?,
            market,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_backend_creates_collection_files() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("runtime_{}", uuid::Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::File;
        cfg.storage.data_dir = dir.to_string_lossy().into_owned();
        let svc = Services::from_config(&cfg).await?;
        assert!(svc.providers.get_all().await?.is_empty());
        assert!(dir.join("providers.json").exists());
        assert!(dir.join("provider_credentials.json").exists());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
