use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;

use common::pagination::Pagination;
use models::{client, client_service, payment, service};

use crate::errors::ServiceError;

/// A payment joined with its client and service context.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetails {
    #[serde(flatten)]
    pub payment: payment::Model,
    pub client_id: Option<i32>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub service_name: Option<String>,
}

/// List payments, newest first, with pagination.
pub async fn list_payments(
    db: &DatabaseConnection,
    opts: Pagination,
) -> Result<Vec<payment::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    payment::Entity::find()
        .order_by_desc(payment::Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_payment(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<payment::Model>, ServiceError> {
    payment::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// All payments applied to one contracted service.
pub async fn list_by_client_service(
    db: &DatabaseConnection,
    client_service_id: i32,
) -> Result<Vec<payment::Model>, ServiceError> {
    payment::Entity::find()
        .filter(payment::Column::ClientServiceId.eq(client_service_id))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

async fn client_service_ids_of(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Vec<i32>, ServiceError> {
    Ok(client_service::Entity::find()
        .filter(client_service::Column::ClientId.eq(client_id))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|cs| cs.client_service_id)
        .collect())
}

/// All payments of one client across their contracted services.
pub async fn list_by_client(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Vec<payment::Model>, ServiceError> {
    let ids = client_service_ids_of(db, client_id).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    payment::Entity::find()
        .filter(payment::Column::ClientServiceId.is_in(ids))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Sum of everything one client has paid.
pub async fn total_by_client(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Decimal, ServiceError> {
    let rows = list_by_client(db, client_id).await?;
    Ok(rows.iter().map(|p| p.amount).sum())
}

/// Payments filtered by workflow status.
pub async fn list_by_status(
    db: &DatabaseConnection,
    status: &str,
) -> Result<Vec<payment::Model>, ServiceError> {
    payment::validate_status(status)?;
    payment::Entity::find()
        .filter(payment::Column::Status.eq(status))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Payments whose payment_date falls inside the half-open range `[from, to)`.
pub async fn list_by_date_range(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<payment::Model>, ServiceError> {
    if from > to {
        return Err(ServiceError::Validation("start date is after end date".into()));
    }
    payment::Entity::find()
        .filter(payment::Column::PaymentDate.gte(from))
        .filter(payment::Column::PaymentDate.lt(to))
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Advance the workflow status of one payment.
pub async fn update_payment_status(
    db: &DatabaseConnection,
    id: i32,
    status: &str,
) -> Result<payment::Model, ServiceError> {
    payment::validate_status(status)?;
    let found = get_payment(db, id).await?.ok_or_else(|| ServiceError::not_found("payment"))?;
    let mut am: payment::ActiveModel = found.into();
    am.status = Set(status.to_string());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Payments joined with client and service names, newest first.
pub async fn list_detailed(db: &DatabaseConnection) -> Result<Vec<PaymentDetails>, ServiceError> {
    let rows: Vec<(payment::Model, Option<client_service::Model>)> = payment::Entity::find()
        .find_also_related(client_service::Entity)
        .order_by_desc(payment::Column::PaymentDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let client_ids: Vec<i32> =
        rows.iter().filter_map(|(_, cs)| cs.as_ref().map(|cs| cs.client_id)).collect();
    let service_ids: Vec<i32> =
        rows.iter().filter_map(|(_, cs)| cs.as_ref().map(|cs| cs.service_id)).collect();

    let clients: HashMap<i32, client::Model> = client::Entity::find()
        .filter(client::Column::ClientId.is_in(client_ids))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|c| (c.client_id, c))
        .collect();
    let services: HashMap<i32, service::Model> = service::Entity::find()
        .filter(service::Column::ServiceId.is_in(service_ids))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|s| (s.service_id, s))
        .collect();

    Ok(rows
        .into_iter()
        .map(|(p, cs)| {
            let client = cs.as_ref().and_then(|cs| clients.get(&cs.client_id));
            let catalog = cs.as_ref().and_then(|cs| services.get(&cs.service_id));
            PaymentDetails {
                client_id: cs.as_ref().map(|cs| cs.client_id),
                client_name: client.map(|c| c.name.clone()),
                client_email: client.map(|c| c.email.clone()),
                service_name: catalog.map(|s| s.name.clone()),
                payment: p,
            }
        })
        .collect())
}
