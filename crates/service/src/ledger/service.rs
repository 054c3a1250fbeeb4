use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use models::payment;

use crate::errors::ServiceError;
use crate::ledger::rule;
use crate::ledger::store::{LedgerStore, LedgerTx, NewPayment};

/// Input for applying one payment against a contracted service.
#[derive(Debug, Clone)]
pub struct ApplyPayment {
    pub client_service_id: i32,
    /// Omitted amount settles the full outstanding balance.
    pub amount: Option<Decimal>,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub payment_type: Option<String>,
}

/// Result of a successful application.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment: payment::Model,
    pub remaining_service_amount: Decimal,
}

/// Balance ledger operation: inserts the payment row and updates the
/// service balance as one atomic unit. The store handle is injected so
/// tests can run against an in-memory double.
pub struct PaymentLedger {
    store: Arc<dyn LedgerStore>,
    default_payment_type: String,
}

impl PaymentLedger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store, default_payment_type: payment::DEFAULT_PAYMENT_TYPE.to_string() }
    }

    pub fn with_default_payment_type(store: Arc<dyn LedgerStore>, payment_type: impl Into<String>) -> Self {
        Self { store, default_payment_type: payment_type.into() }
    }

    #[instrument(skip(self, input), fields(client_service_id = input.client_service_id))]
    pub async fn apply_payment(&self, input: ApplyPayment) -> Result<PaymentReceipt, ServiceError> {
        let method = payment::normalize_method(&input.payment_method)?;
        if let Some(reference) = input.reference_number.as_deref() {
            payment::validate_reference_number(reference)?;
        }
        if let Some(notes) = input.notes.as_deref() {
            payment::validate_notes(notes)?;
        }

        let mut tx = self.store.begin().await?;
        match self.apply_within(tx.as_mut(), &input, method).await {
            Ok(receipt) => {
                tx.commit().await?;
                info!(
                    client_service_id = input.client_service_id,
                    payment_id = receipt.payment.payment_id,
                    remaining = %receipt.remaining_service_amount,
                    "payment applied"
                );
                Ok(receipt)
            }
            Err(e) => {
                let _ = tx.rollback().await;
                Err(e)
            }
        }
    }

    async fn apply_within(
        &self,
        tx: &mut dyn LedgerTx,
        input: &ApplyPayment,
        method: String,
    ) -> Result<PaymentReceipt, ServiceError> {
        let current = tx
            .client_service_for_update(input.client_service_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("client service not found or not payable".into()))?;

        let amount = input.amount.unwrap_or(current.amount_due);
        if amount <= Decimal::ZERO {
            return Err(ServiceError::Validation("payment amount must be positive".into()));
        }
        if amount > current.amount_due {
            return Err(ServiceError::Validation(format!(
                "payment amount {} exceeds outstanding balance {}",
                amount, current.amount_due
            )));
        }

        let settlement = rule::settle(current.amount_due, amount);
        tx.update_balance(
            current.client_service_id,
            settlement.remaining_balance,
            settlement.service_status,
            settlement.payment_status,
        )
        .await?;
        let created = tx
            .insert_payment(NewPayment {
                amount,
                payment_method: method,
                reference_number: input.reference_number.clone(),
                notes: input.notes.clone(),
                status: payment::DEFAULT_STATUS.to_string(),
                payment_type: input
                    .payment_type
                    .clone()
                    .unwrap_or_else(|| self.default_payment_type.clone()),
                client_service_id: current.client_service_id,
            })
            .await?;

        Ok(PaymentReceipt {
            payment: created,
            remaining_service_amount: settlement.remaining_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use models::client_service;

    use super::*;

    #[derive(Clone, Default)]
    struct LedgerState {
        services: Vec<client_service::Model>,
        payments: Vec<payment::Model>,
        next_payment_id: i32,
    }

    /// In-memory double: `begin` snapshots the shared state, `commit`
    /// publishes the snapshot back. Nothing leaks on rollback or drop.
    struct MemoryLedgerStore {
        state: Arc<Mutex<LedgerState>>,
        fail_on_insert: bool,
    }

    impl MemoryLedgerStore {
        fn with_service(cs: client_service::Model) -> Self {
            let state = LedgerState {
                services: vec![cs],
                payments: Vec::new(),
                next_payment_id: 1,
            };
            Self { state: Arc::new(Mutex::new(state)), fail_on_insert: false }
        }

        fn failing_on_insert(cs: client_service::Model) -> Self {
            let mut store = Self::with_service(cs);
            store.fail_on_insert = true;
            store
        }

        fn snapshot(&self) -> LedgerState {
            self.state.lock().unwrap().clone()
        }
    }

    struct MemoryLedgerTx {
        shared: Arc<Mutex<LedgerState>>,
        working: LedgerState,
        fail_on_insert: bool,
    }

    #[async_trait]
    impl LedgerStore for MemoryLedgerStore {
        async fn begin(&self) -> Result<Box<dyn LedgerTx>, ServiceError> {
            Ok(Box::new(MemoryLedgerTx {
                shared: Arc::clone(&self.state),
                working: self.snapshot(),
                fail_on_insert: self.fail_on_insert,
            }))
        }
    }

    #[async_trait]
    impl LedgerTx for MemoryLedgerTx {
        async fn client_service_for_update(
            &mut self,
            id: i32,
        ) -> Result<Option<client_service::Model>, ServiceError> {
            Ok(self
                .working
                .services
                .iter()
                .find(|cs| cs.client_service_id == id)
                .filter(|cs| !cs.is_settled())
                .cloned())
        }

        async fn update_balance(
            &mut self,
            id: i32,
            new_balance: Decimal,
            service_status: &str,
            payment_status: &str,
        ) -> Result<(), ServiceError> {
            let Some(cs) = self.working.services.iter_mut().find(|cs| cs.client_service_id == id)
            else {
                return Err(ServiceError::Conflict("client service modified concurrently".into()));
            };
            cs.amount_due = new_balance;
            cs.status = service_status.to_string();
            cs.payment_status = payment_status.to_string();
            cs.updated_at = Utc::now().into();
            Ok(())
        }

        async fn insert_payment(
            &mut self,
            fields: NewPayment,
        ) -> Result<payment::Model, ServiceError> {
            if self.fail_on_insert {
                return Err(ServiceError::Db("simulated storage failure".into()));
            }
            let now = Utc::now();
            let id = self.working.next_payment_id;
            self.working.next_payment_id += 1;
            let row = payment::Model {
                payment_id: id,
                amount: fields.amount,
                payment_date: now.into(),
                payment_method: fields.payment_method,
                reference_number: fields.reference_number,
                notes: fields.notes,
                status: fields.status,
                payment_type: fields.payment_type,
                client_service_id: fields.client_service_id,
                created_at: now.into(),
            };
            self.working.payments.push(row.clone());
            Ok(row)
        }

        async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
            let MemoryLedgerTx { shared, working, .. } = *self;
            *shared.lock().unwrap() = working;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn active_service(id: i32, amount_due: &str) -> client_service::Model {
        let now = Utc::now().into();
        client_service::Model {
            client_service_id: id,
            client_id: 1,
            service_id: 1,
            status: "activo".into(),
            amount_due: dec(amount_due),
            due_date: None,
            payment_status: "pendiente".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(id: i32, amount: Option<&str>, method: &str) -> ApplyPayment {
        ApplyPayment {
            client_service_id: id,
            amount: amount.map(dec),
            payment_method: method.into(),
            reference_number: Some("TRX-1".into()),
            notes: None,
            payment_type: None,
        }
    }

    #[tokio::test]
    async fn partial_payment_keeps_service_active() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let receipt = ledger
            .apply_payment(apply(7, Some("40.00"), "transferencia"))
            .await
            .expect("partial payment applies");

        assert_eq!(receipt.remaining_service_amount, dec("60.00"));
        assert_eq!(receipt.payment.amount, dec("40.00"));
        assert_eq!(receipt.payment.payment_method, "transferencia");
        assert_eq!(receipt.payment.reference_number.as_deref(), Some("TRX-1"));

        let state = store.snapshot();
        assert_eq!(state.services[0].amount_due, dec("60.00"));
        assert_eq!(state.services[0].status, "activo");
        assert_eq!(state.services[0].payment_status, "pendiente");
        assert_eq!(state.payments.len(), 1);
    }

    #[tokio::test]
    async fn second_payment_settles_and_cancels() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        ledger
            .apply_payment(apply(7, Some("40.00"), "transferencia"))
            .await
            .expect("first payment");
        let receipt = ledger
            .apply_payment(apply(7, Some("60.00"), "transferencia"))
            .await
            .expect("second payment");

        assert_eq!(receipt.remaining_service_amount, Decimal::ZERO);
        let state = store.snapshot();
        assert_eq!(state.services[0].amount_due, Decimal::ZERO);
        assert_eq!(state.services[0].status, "cancelado");
        assert_eq!(state.services[0].payment_status, "pagado");
        assert_eq!(state.payments.len(), 2);
    }

    #[tokio::test]
    async fn omitted_amount_settles_in_full() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(3, "250.50")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let receipt = ledger
            .apply_payment(apply(3, None, "efectivo"))
            .await
            .expect("full settlement");

        assert_eq!(receipt.payment.amount, dec("250.50"));
        assert_eq!(receipt.remaining_service_amount, Decimal::ZERO);
        let state = store.snapshot();
        assert_eq!(state.services[0].status, "cancelado");
        assert_eq!(state.services[0].payment_status, "pagado");
    }

    #[tokio::test]
    async fn overpayment_is_rejected_without_side_effects() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let res = ledger.apply_payment(apply(7, Some("150.00"), "efectivo")).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));

        let state = store.snapshot();
        assert_eq!(state.services[0].amount_due, dec("100.00"));
        assert_eq!(state.services[0].status, "activo");
        assert!(state.payments.is_empty());
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let res = ledger.apply_payment(apply(7, Some("0.00"), "efectivo")).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert!(store.snapshot().payments.is_empty());
    }

    #[tokio::test]
    async fn unknown_method_is_rejected_before_any_write() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let res = ledger.apply_payment(apply(7, Some("10.00"), "bitcoin")).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert!(store.snapshot().payments.is_empty());
    }

    #[tokio::test]
    async fn settled_service_is_not_payable() {
        let mut cs = active_service(7, "0.00");
        cs.status = "cancelado".into();
        cs.payment_status = "pagado".into();
        let store = Arc::new(MemoryLedgerStore::with_service(cs));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let res = ledger.apply_payment(apply(7, Some("10.00"), "efectivo")).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_service_is_not_found() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let res = ledger.apply_payment(apply(999, Some("10.00"), "efectivo")).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn insert_failure_commits_neither_row() {
        let store = Arc::new(MemoryLedgerStore::failing_on_insert(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let res = ledger.apply_payment(apply(7, Some("40.00"), "transferencia")).await;
        assert!(matches!(res, Err(ServiceError::Db(_))));

        // The balance update ran inside the transaction but must not be
        // observable after the failed insert.
        let state = store.snapshot();
        assert_eq!(state.services[0].amount_due, dec("100.00"));
        assert_eq!(state.services[0].status, "activo");
        assert_eq!(state.services[0].payment_status, "pendiente");
        assert!(state.payments.is_empty());
    }

    #[tokio::test]
    async fn payment_defaults_are_applied() {
        let store = Arc::new(MemoryLedgerStore::with_service(active_service(7, "100.00")));
        let ledger = PaymentLedger::new(Arc::clone(&store) as Arc<dyn LedgerStore>);

        let receipt = ledger
            .apply_payment(apply(7, Some("40.00"), " Transferencia "))
            .await
            .expect("payment applies");

        assert_eq!(receipt.payment.payment_method, "transferencia");
        assert_eq!(receipt.payment.status, payment::DEFAULT_STATUS);
        assert_eq!(receipt.payment.payment_type, payment::DEFAULT_PAYMENT_TYPE);
    }
}
