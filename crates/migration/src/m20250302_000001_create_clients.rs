//! Create `clients` table.
//!
//! Holds the customer registry: identification, contact data and the
//! active flag used for soft deactivation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(pk_auto(Clients::ClientId))
                    .col(string_len(Clients::Type, 20))
                    .col(string_len(Clients::Name, 100))
                    .col(
                        ColumnDef::new(Clients::Phone)
                            .string_len(20)
                            .null(),
                    )
                    .col(string_len(Clients::Email, 100))
                    .col(string_len(Clients::IdentificationNumber, 50))
                    .col(string_len(Clients::IdentificationType, 20))
                    .col(
                        ColumnDef::new(Clients::Address)
                            .string_len(200)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Clients::City)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Clients::Country)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Clients::PostalCode)
                            .string_len(20)
                            .null(),
                    )
                    .col(boolean(Clients::IsActive).default(true))
                    .col(timestamp_with_time_zone(Clients::CreatedAt))
                    .col(timestamp_with_time_zone(Clients::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Clients::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    ClientId,
    Type,
    Name,
    Phone,
    Email,
    IdentificationNumber,
    IdentificationType,
    Address,
    City,
    Country,
    PostalCode,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
