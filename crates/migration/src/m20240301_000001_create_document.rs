//! Create `document` table holding every marketplace record as JSON.
//! `seq` is the insertion order used when listing a collection.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(big_integer(Document::Seq).auto_increment().primary_key())
                    .col(string_len(Document::Collection, 64).not_null())
                    .col(string_len(Document::DocId, 64).not_null())
                    .col(json_binary(Document::Body).not_null())
                    .col(timestamp_with_time_zone(Document::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Document::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Document {
    Table,
    Seq,
    Collection,
    DocId,
    Body,
    CreatedAt,
    UpdatedAt,
}
