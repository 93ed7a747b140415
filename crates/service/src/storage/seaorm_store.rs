use std::marker::PhantomData;

use async_trait::async_trait;
use models::{document, Record};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use super::{record_matches, EntityStore, Filter};
use crate::errors::ServiceError;

/// Records of one kind stored as JSON rows of the `document` table.
///
/// Listing reads the collection ordered by `seq` and applies the filter in
/// memory, which is enough for the marketplace's collection sizes.
pub struct SeaOrmDocumentStore<E> {
    db: DatabaseConnection,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Record> SeaOrmDocumentStore<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, _kind: PhantomData }
    }

    async fn row(&self, id: &str) -> Result<Option<document::Model>, ServiceError> {
        document::Entity::find()
            .filter(document::Column::Collection.eq(E::COLLECTION))
            .filter(document::Column::DocId.eq(id))
            .one(&self.db)
            .await
            .map_err(ServiceError::db)
    }
}

fn decode<E: Record>(row: document::Model) -> Result<E, ServiceError> {
    serde_json::from_value(row.body)
        .map_err(|e| ServiceError::Db(format!("undecodable {} document {}: {e}", E::COLLECTION, row.doc_id)))
}

#[async_trait]
impl<E: Record> EntityStore<E> for SeaOrmDocumentStore<E> {
    async fn insert(&self, record: E) -> Result<E, ServiceError> {
        let body = serde_json::to_value(&record).map_err(ServiceError::db)?;
        let now = chrono::Utc::now();
        document::ActiveModel {
            collection: Set(E::COLLECTION.to_string()),
            doc_id: Set(record.id().to_string()),
            body: Set(body),
            created_at: Set(record.created_at().into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(ServiceError::db)?;
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, ServiceError> {
        self.row(id).await?.map(decode::<E>).transpose()
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<E>, ServiceError> {
        let rows = document::Entity::find()
            .filter(document::Column::Collection.eq(E::COLLECTION))
            .order_by_asc(document::Column::Seq)
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let record = decode::<E>(row)?;
            if record_matches(filter, &record)? {
                out.push(record);
            }
        }
        Ok(out)
    }

    async fn replace(&self, record: E) -> Result<Option<E>, ServiceError> {
        let Some(row) = self.row(record.id()).await? else { return Ok(None) };
        let body = serde_json::to_value(&record).map_err(ServiceError::db)?;
        let mut am = row.into_active_model();
        am.body = Set(body);
        am.updated_at = Set(chrono::Utc::now().into());
        am.update(&self.db).await.map_err(ServiceError::db)?;
        Ok(Some(record))
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let res = document::Entity::delete_many()
            .filter(document::Column::Collection.eq(E::COLLECTION))
            .filter(document::Column::DocId.eq(id))
            .exec(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use migration::MigratorTrait;
    use models::service_category::{ServiceCategory, ServiceCategoryCreate};

    #[tokio::test]
    async fn document_store_round_trip() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = models::db::connect().await?;
        migration::Migrator::up(&db, None).await?;
        let store = SeaOrmDocumentStore::<ServiceCategory>::new(db);

        let id = uuid::Uuid::new_v4().to_string();
        let cat = ServiceCategory::from_create(id.clone(), Utc::now(), ServiceCategoryCreate { name: "Dental".into() });
        store.insert(cat).await?;

        let found = store.find_by_id(&id).await?.expect("inserted");
        assert_eq!(found.name, "Dental");

        let mut renamed = found.clone();
        renamed.name = "Dentistry".into();
        assert!(store.replace(renamed).await?.is_some());
        let listed = store.find(&Filter::eq("id", id.clone())).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Dentistry");

        assert!(store.delete(&id).await?);
        assert!(!store.delete(&id).await?);
        Ok(())
    }
}
