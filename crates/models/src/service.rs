use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::client_service;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub service_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ClientServices,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ClientServices => Entity::has_many(client_service::Entity).into(),
        }
    }
}

impl Related<client_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::ClientServices.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("service name required".into()));
    }
    if name.len() > 100 {
        return Err(ModelError::Validation("service name must not exceed 100 characters".into()));
    }
    Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), ModelError> {
    if price < Decimal::ZERO {
        return Err(ModelError::Validation("price must not be negative".into()));
    }
    Ok(())
}
