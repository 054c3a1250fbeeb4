//! Create `services` table: the catalog of offerings with a list price.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(pk_auto(Services::ServiceId))
                    .col(string_len(Services::Name, 100))
                    .col(
                        ColumnDef::new(Services::Description)
                            .text()
                            .null(),
                    )
                    .col(decimal_len(Services::Price, 12, 2))
                    .col(timestamp_with_time_zone(Services::CreatedAt))
                    .col(timestamp_with_time_zone(Services::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services { Table, ServiceId, Name, Description, Price, CreatedAt, UpdatedAt }
