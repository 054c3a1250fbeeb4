use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use models::{client, client_service, service};

use crate::errors::ServiceError;

/// A contracted service joined with the client and catalog names.
#[derive(Debug, Clone, Serialize)]
pub struct ClientServiceDetails {
    #[serde(flatten)]
    pub client_service: client_service::Model,
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    pub service_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewClientService {
    pub client_id: i32,
    pub service_id: i32,
    pub amount_due: Decimal,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

async fn attach_names(
    db: &DatabaseConnection,
    rows: Vec<client_service::Model>,
) -> Result<Vec<ClientServiceDetails>, ServiceError> {
    let client_ids: Vec<i32> = rows.iter().map(|cs| cs.client_id).collect();
    let service_ids: Vec<i32> = rows.iter().map(|cs| cs.service_id).collect();

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
        .map(|cs| {
            let client_name = clients.get(&cs.client_id).map(|c| c.name.clone());
            let catalog = services.get(&cs.service_id);
            ClientServiceDetails {
                client_name,
                service_name: catalog.map(|s| s.name.clone()),
                service_price: catalog.map(|s| s.price),
                client_service: cs,
            }
        })
        .collect())
}

/// List all contracted services with names, newest first.
pub async fn list_client_services(
    db: &DatabaseConnection,
) -> Result<Vec<ClientServiceDetails>, ServiceError> {
    let rows = client_service::Entity::find()
        .order_by_desc(client_service::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    attach_names(db, rows).await
}

pub async fn get_client_service(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<ClientServiceDetails>, ServiceError> {
    let row = client_service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    match row {
        Some(cs) => Ok(attach_names(db, vec![cs]).await?.into_iter().next()),
        None => Ok(None),
    }
}

/// All services contracted by one client, newest first.
pub async fn list_by_client(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Vec<ClientServiceDetails>, ServiceError> {
    let rows = client_service::Entity::find()
        .filter(client_service::Column::ClientId.eq(client_id))
        .order_by_desc(client_service::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    attach_names(db, rows).await
}

/// Assign a service to a client, opening its balance.
pub async fn create_client_service(
    db: &DatabaseConnection,
    input: NewClientService,
) -> Result<client_service::Model, ServiceError> {
    client_service::validate_amount_due(input.amount_due)?;
    let status = input.status.unwrap_or_else(|| "activo".to_string());
    let payment_status = input.payment_status.unwrap_or_else(|| "pendiente".to_string());
    client_service::validate_status(&status)?;
    client_service::validate_payment_status(&payment_status)?;

    // Friendly errors instead of raw FK violations
    client::Entity::find_by_id(input.client_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("client"))?;
    service::Entity::find_by_id(input.service_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("service"))?;

    let now = Utc::now();
    let am = client_service::ActiveModel {
        client_id: Set(input.client_id),
        service_id: Set(input.service_id),
        status: Set(status),
        amount_due: Set(input.amount_due),
        due_date: Set(input.due_date),
        payment_status: Set(payment_status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Metadata-only edit; balance fields are owned by the payment ledger.
pub async fn update_due_date(
    db: &DatabaseConnection,
    id: i32,
    due_date: Option<NaiveDate>,
) -> Result<client_service::Model, ServiceError> {
    let found = client_service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("client service"))?;
    let mut am: client_service::ActiveModel = found.into();
    am.due_date = Set(due_date);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Administrative status change. Terminal states are reached only through
/// payment settlement, never through this endpoint.
pub async fn update_status(
    db: &DatabaseConnection,
    id: i32,
    status: &str,
) -> Result<client_service::Model, ServiceError> {
    client_service::validate_status(status)?;
    if client_service::TERMINAL_STATUSES.contains(&status) {
        return Err(ServiceError::Validation(
            "terminal statuses are set by payment settlement".into(),
        ));
    }
    let found = client_service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("client service"))?;
    if found.is_settled() {
        return Err(ServiceError::Conflict("client service is already settled".into()));
    }
    let mut am: client_service::ActiveModel = found.into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn delete_client_service(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = client_service::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

/// Case-insensitive search by service or client name.
pub async fn search_by_name(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<ClientServiceDetails>, ServiceError> {
    let cleaned = term.trim();
    if cleaned.is_empty() {
        return Err(ServiceError::Validation("search term required".into()));
    }
    let pattern = format!("%{}%", cleaned.to_lowercase());

    let service_ids: Vec<i32> = service::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(service::Column::Name))).like(pattern.clone()))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|s| s.service_id)
        .collect();
    let client_ids: Vec<i32> = client::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(client::Column::Name))).like(pattern))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .into_iter()
        .map(|c| c.client_id)
        .collect();

    let rows = client_service::Entity::find()
        .filter(
            Condition::any()
                .add(client_service::Column::ServiceId.is_in(service_ids))
                .add(client_service::Column::ClientId.is_in(client_ids)),
        )
        .order_by_desc(client_service::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    attach_names(db, rows).await
}
