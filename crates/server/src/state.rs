use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::ledger::PaymentLedger;

/// Shared handles, constructed once at startup and injected everywhere.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub ledger: Arc<PaymentLedger>,
}
