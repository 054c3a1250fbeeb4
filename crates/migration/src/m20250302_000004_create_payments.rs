//! Create `payments` table with FK to `client_services`.
//!
//! Append-mostly ledger of funds applied to a contracted service.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::PaymentId))
                    .col(decimal_len(Payments::Amount, 12, 2))
                    .col(timestamp_with_time_zone(Payments::PaymentDate))
                    .col(string_len(Payments::PaymentMethod, 50))
                    .col(
                        ColumnDef::new(Payments::ReferenceNumber)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Payments::Notes)
                            .string_len(500)
                            .null(),
                    )
                    .col(string_len(Payments::Status, 20))
                    .col(string_len(Payments::PaymentType, 50))
                    .col(integer(Payments::ClientServiceId))
                    .col(timestamp_with_time_zone(Payments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_clientservice")
                            .from(Payments::Table, Payments::ClientServiceId)
                            .to(ClientServices::Table, ClientServices::ClientServiceId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    PaymentId,
    Amount,
    PaymentDate,
    PaymentMethod,
    ReferenceNumber,
    Notes,
    Status,
    PaymentType,
    ClientServiceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClientServices { Table, ClientServiceId }
