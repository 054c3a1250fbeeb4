use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::client_service;
use crate::errors::ModelError;

/// Accepted payment methods, stored lowercase.
pub const METHODS: [&str; 5] = ["efectivo", "transferencia", "tarjeta", "cheque", "otro"];

/// Workflow states of a payment record.
pub const STATUSES: [&str; 3] = ["borrador", "en proceso", "pagado"];

/// Status assigned to newly registered payments.
pub const DEFAULT_STATUS: &str = "en proceso";

/// Payment type used when the caller does not provide one.
pub const DEFAULT_PAYMENT_TYPE: &str = "efectivo";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub payment_id: i32,
    pub amount: Decimal,
    pub payment_date: DateTimeWithTimeZone,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub payment_type: String,
    pub client_service_id: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ClientService,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ClientService => Entity::belongs_to(client_service::Entity)
                .from(Column::ClientServiceId)
                .to(client_service::Column::ClientServiceId)
                .into(),
        }
    }
}

impl Related<client_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::ClientService.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim, lowercase and check the method against the accepted set.
pub fn normalize_method(method: &str) -> Result<String, ModelError> {
    let normalized = method.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ModelError::Validation("payment method required".into()));
    }
    if !METHODS.contains(&normalized.as_str()) {
        return Err(ModelError::Validation(format!(
            "invalid payment method, must be one of: {}",
            METHODS.join(", ")
        )));
    }
    Ok(normalized)
}

pub fn validate_status(status: &str) -> Result<(), ModelError> {
    if !STATUSES.contains(&status) {
        return Err(ModelError::Validation(format!(
            "invalid payment status, must be one of: {}",
            STATUSES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_reference_number(reference: &str) -> Result<(), ModelError> {
    if reference.len() > 100 {
        return Err(ModelError::Validation("reference number must not exceed 100 characters".into()));
    }
    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<(), ModelError> {
    if notes.len() > 500 {
        return Err(ModelError::Validation("notes must not exceed 500 characters".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_is_case_normalized() {
        assert_eq!(normalize_method(" Transferencia ").unwrap(), "transferencia");
        assert_eq!(normalize_method("EFECTIVO").unwrap(), "efectivo");
    }

    #[test]
    fn unknown_method_is_rejected() {
        assert!(normalize_method("bitcoin").is_err());
        assert!(normalize_method("").is_err());
        assert!(normalize_method("   ").is_err());
    }

    #[test]
    fn status_workflow_values() {
        assert!(validate_status("borrador").is_ok());
        assert!(validate_status("en proceso").is_ok());
        assert!(validate_status("pagado").is_ok());
        assert!(validate_status("anulado").is_err());
    }
}
