use std::{marker::PhantomData, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use models::Record;
use tokio::{fs, sync::RwLock};

use super::{record_matches, EntityStore, Filter};
use crate::errors::ServiceError;

/// Ordered collection of records kept in memory.
///
/// With a file path the whole collection is written back as a JSON array
/// after every mutation and reloaded on open. A mutation whose write fails
/// is undone in memory as well. Without one it lives only as
/// long as the process.
pub struct JsonCollectionStore<E> {
    inner: RwLock<IndexMap<String, E>>,
    file_path: Option<PathBuf>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Record> JsonCollectionStore<E> {
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(IndexMap::new()), file_path: None, _kind: PhantomData })
    }

    /// Open `<dir>/<collection>.json`, creating an empty collection if missing.
    pub async fn open_in<P: Into<PathBuf>>(dir: P) -> Result<Arc<Self>, ServiceError> {
        Self::open(dir.into().join(format!("{}.json", E::COLLECTION))).await
    }

    /// Initialize the store from a path. Creates the file with an empty list if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(ServiceError::db)?;
        }

        let map = match fs::read(&file_path).await {
            Ok(bytes) => {
                let records: Vec<E> = serde_json::from_slice(&bytes).map_err(|e| {
                    ServiceError::Db(format!("corrupt collection file {}: {e}", file_path.display()))
                })?;
                records.into_iter().map(|r| (r.id().to_string(), r)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&file_path, b"[]").await.map_err(ServiceError::db)?;
                IndexMap::new()
            }
            Err(e) => return Err(ServiceError::db(e)),
        };

        tracing::debug!(collection = E::COLLECTION, path = %file_path.display(), count = map.len(), "collection loaded");
        Ok(Arc::new(Self { inner: RwLock::new(map), file_path: Some(file_path), _kind: PhantomData }))
    }

    async fn save(&self, map: &IndexMap<String, E>) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else { return Ok(()) };
        let records: Vec<&E> = map.values().collect();
        let data = serde_json::to_vec(&records).map_err(ServiceError::db)?;
        fs::write(path, data).await.map_err(ServiceError::db)
    }
}

#[async_trait]
impl<E: Record> EntityStore<E> for JsonCollectionStore<E> {
    async fn insert(&self, record: E) -> Result<E, ServiceError> {
        let mut map = self.inner.write().await;
        if map.contains_key(record.id()) {
            return Err(ServiceError::Db(format!("duplicate id {} in {}", record.id(), E::COLLECTION)));
        }
        map.insert(record.id().to_string(), record.clone());
        if let Err(e) = self.save(&map).await {
            map.shift_remove(record.id());
            return Err(e);
        }
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, ServiceError> {
        Ok(self.inner.read().await.get(id).cloned())
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<E>, ServiceError> {
        let map = self.inner.read().await;
        let mut out = Vec::new();
        for record in map.values() {
            if record_matches(filter, record)? {
                out.push(record.clone());
            }
        }
        Ok(out)
    }

    async fn replace(&self, record: E) -> Result<Option<E>, ServiceError> {
        let mut map = self.inner.write().await;
        let Some(slot) = map.get_mut(record.id()) else {
            return Ok(None);
        };
        let previous = std::mem::replace(slot, record.clone());
        if let Err(e) = self.save(&map).await {
            if let Some(slot) = map.get_mut(record.id()) {
                *slot = previous;
            }
            return Err(e);
        }
        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        // shift_remove keeps the remaining records in insertion order
        let Some((index, key, removed)) = map.shift_remove_full(id) else {
            return Ok(false);
        };
        if let Err(e) = self.save(&map).await {
            map.shift_insert(index, key, removed);
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::job::{Job, JobCreate};

    fn job(id: &str, title: &str) -> Job {
        let input = JobCreate {
            title: title.into(),
            description: None,
            website: "https://example.com".into(),
            link: "https://example.com/apply".into(),
            category: None,
        };
        Job::from_create(id.into(), Utc::now(), input)
    }

    #[tokio::test]
    async fn keeps_insertion_order_after_delete() -> Result<(), anyhow::Error> {
        let store = JsonCollectionStore::<Job>::in_memory();
        for (id, title) in [("a", "one"), ("b", "two"), ("c", "three")] {
            store.insert(job(id, title)).await?;
        }
        assert!(store.delete("b").await?);
        assert!(!store.delete("b").await?);
        let ids: Vec<_> = store.find(&Filter::All).await?.into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        Ok(())
    }

    #[tokio::test]
    async fn replace_unknown_id_is_none() -> Result<(), anyhow::Error> {
        let store = JsonCollectionStore::<Job>::in_memory();
        assert!(store.replace(job("x", "ghost")).await?.is_none());
        assert!(store.find_by_id("x").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn file_store_persists_and_reloads() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("collection_store_{}", uuid::Uuid::new_v4()));
        let store = JsonCollectionStore::<Job>::open_in(&tmp).await?;
        assert_eq!(store.find(&Filter::All).await?.len(), 0);

        store.insert(job("a", "nurse")).await?;
        store.insert(job("b", "pharmacist")).await?;
        let mut updated = job("a", "head nurse");
        updated.touch(Utc::now());
        store.replace(updated).await?;
        store.delete("b").await?;

        let reloaded = JsonCollectionStore::<Job>::open_in(&tmp).await?;
        let jobs = reloaded.find(&Filter::All).await?;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "head nurse");

        let _ = tokio::fs::remove_dir_all(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn eq_filter_selects_matching_records() -> Result<(), anyhow::Error> {
        let store = JsonCollectionStore::<Job>::in_memory();
        store.insert(job("a", "nurse")).await?;
        store.insert(job("b", "doctor")).await?;
        let found = store.find(&Filter::eq("title", "doctor")).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b");
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_unchanged() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("collection_store_{}", uuid::Uuid::new_v4()));
        let store = JsonCollectionStore::<Job>::open_in(&tmp).await?;
        store.insert(job("a", "nurse")).await?;
        store.insert(job("b", "doctor")).await?;

        // a directory where the file was makes every later write fail
        let file = tmp.join(format!("{}.json", Job::COLLECTION));
        tokio::fs::remove_file(&file).await?;
        tokio::fs::create_dir(&file).await?;

        assert!(store.insert(job("c", "pharmacist")).await.is_err());
        assert!(store.find_by_id("c").await?.is_none());

        assert!(store.replace(job("a", "head nurse")).await.is_err());
        assert_eq!(store.find_by_id("a").await?.map(|j| j.title), Some("nurse".into()));

        assert!(store.delete("a").await.is_err());
        let ids: Vec<_> = store.find(&Filter::All).await?.into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let _ = tokio::fs::remove_dir_all(&tmp).await;
        Ok(())
    }
}
