use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_document::Document;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One record per id within a collection
        manager
            .create_index(
                Index::create()
                    .name("uniq_document_collection_doc_id")
                    .table(Document::Table)
                    .col(Document::Collection)
                    .col(Document::DocId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Ordered scans of one collection
        manager
            .create_index(
                Index::create()
                    .name("idx_document_collection_seq")
                    .table(Document::Table)
                    .col(Document::Collection)
                    .col(Document::Seq)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_document_collection_seq").table(Document::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_document_collection_doc_id").table(Document::Table).to_owned())
            .await
    }
}
