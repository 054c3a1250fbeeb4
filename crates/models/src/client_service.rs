use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{client, payment, service};

/// Lifecycle states of a contracted service.
pub const STATUSES: [&str; 5] = ["activo", "inactivo", "cancelado", "suspendido", "completado"];

/// Terminal states: the balance is settled and the row is no longer payable.
pub const TERMINAL_STATUSES: [&str; 2] = ["cancelado", "completado"];

/// Payment progress of a contracted service.
pub const PAYMENT_STATUSES: [&str; 4] = ["pendiente", "parcial", "pagado", "vencido"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub client_service_id: i32,
    pub client_id: i32,
    pub service_id: i32,
    pub status: String,
    pub amount_due: Decimal,
    pub due_date: Option<Date>,
    pub payment_status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    Service,
    Payments,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(client::Entity)
                .from(Column::ClientId)
                .to(client::Column::ClientId)
                .into(),
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::ServiceId)
                .into(),
            Relation::Payments => Entity::has_many(payment::Entity).into(),
        }
    }
}

impl Related<client::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payments.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A settled row carries no outstanding balance and accepts no payments.
    pub fn is_settled(&self) -> bool {
        TERMINAL_STATUSES.contains(&self.status.as_str())
            || self.payment_status == "pagado"
            || self.amount_due <= Decimal::ZERO
    }
}

pub fn validate_status(status: &str) -> Result<(), ModelError> {
    if !STATUSES.contains(&status) {
        return Err(ModelError::Validation(format!(
            "invalid status, must be one of: {}",
            STATUSES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_payment_status(payment_status: &str) -> Result<(), ModelError> {
    if !PAYMENT_STATUSES.contains(&payment_status) {
        return Err(ModelError::Validation(format!(
            "invalid payment status, must be one of: {}",
            PAYMENT_STATUSES.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_amount_due(amount_due: Decimal) -> Result<(), ModelError> {
    if amount_due < Decimal::ZERO {
        return Err(ModelError::Validation("amount_due must not be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(status: &str, payment_status: &str, amount_due: Decimal) -> Model {
        let now = Utc::now().into();
        Model {
            client_service_id: 1,
            client_id: 1,
            service_id: 1,
            status: status.into(),
            amount_due,
            due_date: None,
            payment_status: payment_status.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn active_row_with_balance_is_payable() {
        let cs = row("activo", "pendiente", Decimal::new(10000, 2));
        assert!(!cs.is_settled());
    }

    #[test]
    fn terminal_status_is_settled() {
        assert!(row("cancelado", "pagado", Decimal::ZERO).is_settled());
        assert!(row("completado", "pagado", Decimal::ZERO).is_settled());
    }

    #[test]
    fn zero_balance_is_settled_even_if_active() {
        assert!(row("activo", "pendiente", Decimal::ZERO).is_settled());
    }

    #[test]
    fn status_sets_are_enforced() {
        assert!(validate_status("suspendido").is_ok());
        assert!(validate_status("archivado").is_err());
        assert!(validate_payment_status("parcial").is_ok());
        assert!(validate_payment_status("impago").is_err());
    }
}
