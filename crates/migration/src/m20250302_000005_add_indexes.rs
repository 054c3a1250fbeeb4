use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Clients: unique email and identification number
        manager
            .create_index(
                Index::create()
                    .name("uniq_clients_email")
                    .table(Clients::Table)
                    .col(Clients::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_clients_identification")
                    .table(Clients::Table)
                    .col(Clients::IdentificationNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ClientServices: lookup by client and by service
        manager
            .create_index(
                Index::create()
                    .name("idx_clientservices_client")
                    .table(ClientServices::Table)
                    .col(ClientServices::ClientId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_clientservices_service")
                    .table(ClientServices::Table)
                    .col(ClientServices::ServiceId)
                    .to_owned(),
            )
            .await?;

        // Payments: lookup by owning service, by date and by status
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_clientservice")
                    .table(Payments::Table)
                    .col(Payments::ClientServiceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_date")
                    .table(Payments::Table)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_status")
                    .table(Payments::Table)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_clients_email").table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_clients_identification").table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_clientservices_client").table(ClientServices::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_clientservices_service").table(ClientServices::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payments_clientservice").table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payments_date").table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payments_status").table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Clients { Table, Email, IdentificationNumber }

#[derive(DeriveIden)]
enum ClientServices { Table, ClientId, ServiceId }

#[derive(DeriveIden)]
enum Payments { Table, ClientServiceId, PaymentDate, Status }
