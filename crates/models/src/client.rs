use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::client_service;
use crate::errors::ModelError;

/// Allowed values for the `type` column.
pub const CLIENT_TYPES: [&str; 2] = ["persona", "empresa"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub client_id: i32,
    #[sea_orm(column_name = "type")]
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
    pub is_active: bool,
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
        return Err(ModelError::Validation("name required".into()));
    }
    if name.len() > 100 {
        return Err(ModelError::Validation("name must not exceed 100 characters".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') || trimmed.len() > 100 {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_client_type(client_type: &str) -> Result<(), ModelError> {
    if !CLIENT_TYPES.contains(&client_type) {
        return Err(ModelError::Validation(format!(
            "invalid client type, must be one of: {}",
            CLIENT_TYPES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_identification(number: &str) -> Result<(), ModelError> {
    if number.trim().is_empty() || number.len() > 50 {
        return Err(ModelError::Validation("identification number required (max 50 chars)".into()));
    }
    Ok(())
}
