use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use serde::Deserialize;

use models::client;

use crate::errors::ServiceError;

/// Caller-supplied client fields, shared by create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    #[serde(rename = "type")]
    pub client_type: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub identification_number: String,
    pub identification_type: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

fn validate(input: &ClientInput) -> Result<(), ServiceError> {
    client::validate_client_type(&input.client_type)?;
    client::validate_name(&input.name)?;
    client::validate_email(&input.email)?;
    client::validate_identification(&input.identification_number)?;
    Ok(())
}

fn map_insert_err(e: sea_orm::DbErr) -> ServiceError {
    match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("email or identification number already registered".into())
        }
        _ => ServiceError::Db(e.to_string()),
    }
}

/// List all clients, newest first.
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>, ServiceError> {
    client::Entity::find()
        .order_by_desc(client::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get client by id.
pub async fn get_client(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<client::Model>, ServiceError> {
    client::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Create a client.
pub async fn create_client(
    db: &DatabaseConnection,
    input: ClientInput,
) -> Result<client::Model, ServiceError> {
    validate(&input)?;
    let now = Utc::now();
    let am = client::ActiveModel {
        client_type: Set(input.client_type),
        name: Set(input.name),
        phone: Set(input.phone),
        email: Set(input.email.trim().to_string()),
        identification_number: Set(input.identification_number),
        identification_type: Set(input.identification_type),
        address: Set(input.address),
        city: Set(input.city),
        country: Set(input.country),
        postal_code: Set(input.postal_code),
        is_active: Set(input.is_active.unwrap_or(true)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(map_insert_err)
}

/// Overwrite a client's fields.
pub async fn update_client(
    db: &DatabaseConnection,
    id: i32,
    input: ClientInput,
) -> Result<client::Model, ServiceError> {
    validate(&input)?;
    let found = get_client(db, id).await?.ok_or_else(|| ServiceError::not_found("client"))?;
    let mut am: client::ActiveModel = found.into();
    am.client_type = Set(input.client_type);
    am.name = Set(input.name);
    am.phone = Set(input.phone);
    am.email = Set(input.email.trim().to_string());
    am.identification_number = Set(input.identification_number);
    am.identification_type = Set(input.identification_type);
    am.address = Set(input.address);
    am.city = Set(input.city);
    am.country = Set(input.country);
    am.postal_code = Set(input.postal_code);
    if let Some(active) = input.is_active {
        am.is_active = Set(active);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(map_insert_err)
}

/// Flip the soft-deactivation flag.
pub async fn set_client_active(
    db: &DatabaseConnection,
    id: i32,
    active: bool,
) -> Result<client::Model, ServiceError> {
    let found = get_client(db, id).await?.ok_or_else(|| ServiceError::not_found("client"))?;
    let mut am: client::ActiveModel = found.into();
    am.is_active = Set(active);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a client. Returns false when no row matched.
pub async fn delete_client(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = client::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn input(tag: &str) -> ClientInput {
        ClientInput {
            client_type: "persona".into(),
            name: format!("Cliente {}", tag),
            phone: Some("5555-0000".into()),
            email: format!("{}@example.com", tag),
            identification_number: tag.to_string(),
            identification_type: "dpi".into(),
            address: None,
            city: Some("Guatemala".into()),
            country: Some("GT".into()),
            postal_code: None,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn client_crud_roundtrip() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };

        let tag = uuid::Uuid::new_v4().to_string();
        let created = create_client(&db, input(&tag)).await?;
        assert!(created.is_active);

        let fetched = get_client(&db, created.client_id).await?.expect("created client");
        assert_eq!(fetched.name, created.name);

        let deactivated = set_client_active(&db, created.client_id, false).await?;
        assert!(!deactivated.is_active);

        assert!(delete_client(&db, created.client_id).await?);
        assert!(get_client(&db, created.client_id).await?.is_none());
        Ok(())
    }

    #[test]
    fn invalid_client_type_is_rejected() {
        // Validation runs before any database access
        let mut bad = input("no-db");
        bad.client_type = "gobierno".into();
        assert!(validate(&bad).is_err());
    }
}
