//! Transactional persistence boundary for the balance ledger.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use models::{client_service, payment};

use crate::errors::ServiceError;

/// Caller-supplied fields of a payment row; system fields (ids, dates)
/// are filled by the store.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub payment_type: String,
    pub client_service_id: i32,
}

/// One transactional session over the ledger tables. Dropping the handle
/// without committing must leave no writes behind.
#[async_trait]
pub trait LedgerTx: Send {
    /// Current balance row, locked for the duration of the transaction.
    /// Settled rows (terminal status, paid, or zero balance) are excluded.
    async fn client_service_for_update(
        &mut self,
        id: i32,
    ) -> Result<Option<client_service::Model>, ServiceError>;

    /// Write the new balance and derived statuses. Zero affected rows means
    /// the row changed under us and the operation must not proceed.
    async fn update_balance(
        &mut self,
        id: i32,
        new_balance: Decimal,
        service_status: &str,
        payment_status: &str,
    ) -> Result<(), ServiceError>;

    async fn insert_payment(&mut self, fields: NewPayment) -> Result<payment::Model, ServiceError>;

    async fn commit(self: Box<Self>) -> Result<(), ServiceError>;

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError>;
}

/// Hands out transactional sessions. Injected into the ledger so tests can
/// substitute an in-memory double.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, ServiceError>;
}

/// SeaORM-backed store. The row read uses `SELECT ... FOR UPDATE` so two
/// concurrent payments against the same service serialize instead of both
/// subtracting from a stale balance. An uncommitted transaction rolls back
/// when dropped.
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(Box::new(SeaOrmLedgerTx { txn }))
    }
}

struct SeaOrmLedgerTx {
    txn: DatabaseTransaction,
}

#[async_trait]
impl LedgerTx for SeaOrmLedgerTx {
    async fn client_service_for_update(
        &mut self,
        id: i32,
    ) -> Result<Option<client_service::Model>, ServiceError> {
        let row = client_service::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(row.filter(|cs| !cs.is_settled()))
    }

    async fn update_balance(
        &mut self,
        id: i32,
        new_balance: Decimal,
        service_status: &str,
        payment_status: &str,
    ) -> Result<(), ServiceError> {
        let res = client_service::Entity::update_many()
            .col_expr(client_service::Column::AmountDue, Expr::value(new_balance))
            .col_expr(client_service::Column::Status, Expr::value(service_status))
            .col_expr(client_service::Column::PaymentStatus, Expr::value(payment_status))
            .col_expr(client_service::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(client_service::Column::ClientServiceId.eq(id))
            .exec(&self.txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::Conflict("client service modified concurrently".into()));
        }
        Ok(())
    }

    async fn insert_payment(&mut self, fields: NewPayment) -> Result<payment::Model, ServiceError> {
        let now = Utc::now();
        let am = payment::ActiveModel {
            amount: Set(fields.amount),
            payment_date: Set(now.into()),
            payment_method: Set(fields.payment_method),
            reference_number: Set(fields.reference_number),
            notes: Set(fields.notes),
            status: Set(fields.status),
            payment_type: Set(fields.payment_type),
            client_service_id: Set(fields.client_service_id),
            created_at: Set(now.into()),
            ..Default::default()
        };
        am.insert(&self.txn).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        self.txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
        self.txn.rollback().await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}
