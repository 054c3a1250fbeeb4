//! Status derivation rule: pure mapping from (balance, payment) to the
//! post-payment state of a contracted service.

use rust_decimal::Decimal;

pub const PAYMENT_PAID: &str = "pagado";
pub const PAYMENT_PENDING: &str = "pendiente";
pub const SERVICE_CANCELLED: &str = "cancelado";
pub const SERVICE_ACTIVE: &str = "activo";

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub remaining_balance: Decimal,
    pub payment_status: &'static str,
    pub service_status: &'static str,
}

/// Derive the remaining balance and both statuses after applying a payment.
/// Callers must have rejected amounts outside `0 < amount <= previous_balance`.
pub fn settle(previous_balance: Decimal, payment_amount: Decimal) -> Settlement {
    let remaining = (previous_balance - payment_amount).max(Decimal::ZERO);
    if remaining.is_zero() {
        Settlement {
            remaining_balance: Decimal::ZERO,
            payment_status: PAYMENT_PAID,
            service_status: SERVICE_CANCELLED,
        }
    } else {
        Settlement {
            remaining_balance: remaining,
            payment_status: PAYMENT_PENDING,
            service_status: SERVICE_ACTIVE,
        }
    }
}
