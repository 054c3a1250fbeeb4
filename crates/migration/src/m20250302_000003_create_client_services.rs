//! Create `client_services` table with FKs to `clients` and `services`.
//!
//! A row is one contracted service carrying the outstanding balance
//! (`amount_due`) and the derived `status` / `payment_status` pair.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClientServices::Table)
                    .if_not_exists()
                    .col(pk_auto(ClientServices::ClientServiceId))
                    .col(integer(ClientServices::ClientId))
                    .col(integer(ClientServices::ServiceId))
                    .col(string_len(ClientServices::Status, 20))
                    .col(decimal_len(ClientServices::AmountDue, 12, 2))
                    .col(
                        ColumnDef::new(ClientServices::DueDate)
                            .date()
                            .null(),
                    )
                    .col(string_len(ClientServices::PaymentStatus, 20))
                    .col(timestamp_with_time_zone(ClientServices::CreatedAt))
                    .col(timestamp_with_time_zone(ClientServices::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clientservices_client")
                            .from(ClientServices::Table, ClientServices::ClientId)
                            .to(Clients::Table, Clients::ClientId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clientservices_service")
                            .from(ClientServices::Table, ClientServices::ServiceId)
                            .to(Services::Table, Services::ServiceId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ClientServices::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ClientServices {
    Table,
    ClientServiceId,
    ClientId,
    ServiceId,
    Status,
    AmountDue,
    DueDate,
    PaymentStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Clients { Table, ClientId }

#[derive(DeriveIden)]
enum Services { Table, ServiceId }
