use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use models::service;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

fn validate(input: &ServiceInput) -> Result<(), ServiceError> {
    service::validate_name(&input.name)?;
    service::validate_price(input.price)?;
    Ok(())
}

/// List the catalog ordered by name.
pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<service::Model>, ServiceError> {
    service::Entity::find()
        .order_by_asc(service::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_service(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<service::Model>, ServiceError> {
    service::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_service(
    db: &DatabaseConnection,
    input: ServiceInput,
) -> Result<service::Model, ServiceError> {
    validate(&input)?;
    let now = Utc::now();
    let am = service::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn update_service(
    db: &DatabaseConnection,
    id: i32,
    input: ServiceInput,
) -> Result<service::Model, ServiceError> {
    validate(&input)?;
    let found = get_service(db, id).await?.ok_or_else(|| ServiceError::not_found("service"))?;
    let mut am: service::ActiveModel = found.into();
    am.name = Set(input.name);
    am.description = Set(input.description);
    am.price = Set(input.price);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Delete a catalog entry. Contracted rows keep it referenced, in which
/// case the FK restriction surfaces as a conflict.
pub async fn delete_service(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = service::Entity::delete_by_id(id).exec(db).await.map_err(|e| match e.sql_err() {
        Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
            ServiceError::Conflict("service is contracted by clients".into())
        }
        _ => ServiceError::Db(e.to_string()),
    })?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn service_crud_roundtrip() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };

        let name = format!("servicio {}", uuid::Uuid::new_v4());
        let created = create_service(
            &db,
            ServiceInput { name: name.clone(), description: None, price: "150.00".parse()? },
        )
        .await?;

        let updated = update_service(
            &db,
            created.service_id,
            ServiceInput {
                name: name.clone(),
                description: Some("mensual".into()),
                price: "175.00".parse()?,
            },
        )
        .await?;
        assert_eq!(updated.description.as_deref(), Some("mensual"));

        assert!(delete_service(&db, created.service_id).await?);
        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() {
        let input = ServiceInput {
            name: "hosting".into(),
            description: None,
            price: "-1.00".parse().unwrap(),
        };
        assert!(validate(&input).is_err());
    }
}
