use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Days, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use common::pagination::Pagination;
use models::payment;
use service::db::payments;
use service::db::payments::PaymentDetails;
use service::ledger::ApplyPayment;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentInput {
    pub client_service_id: i32,
    /// Omitted amount settles the full outstanding balance.
    pub amount: Option<Decimal>,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub payment_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePaymentOutput {
    pub payment: payment::Model,
    pub remaining_service_amount: Decimal,
}

/// Apply a payment against a contracted service's balance.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(input): Json<CreatePaymentInput>,
) -> Result<(StatusCode, Json<CreatePaymentOutput>), JsonApiError> {
    let receipt = state
        .ledger
        .apply_payment(ApplyPayment {
            client_service_id: input.client_service_id,
            amount: input.amount,
            payment_method: input.payment_method,
            reference_number: input.reference_number,
            notes: input.notes,
            payment_type: input.payment_type,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePaymentOutput {
            payment: receipt.payment,
            remaining_service_amount: receipt.remaining_service_amount,
        }),
    ))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(opts): Query<Pagination>,
) -> Result<Json<Vec<payment::Model>>, JsonApiError> {
    Ok(Json(payments::list_payments(&state.db, opts).await?))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<payment::Model>, JsonApiError> {
    match payments::get_payment(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(JsonApiError::not_found("payment")),
    }
}

pub async fn list_detailed_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentDetails>>, JsonApiError> {
    Ok(Json(payments::list_detailed(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
}

/// Payments registered between two calendar dates, both inclusive.
pub async fn list_payments_by_date(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<payment::Model>>, JsonApiError> {
    let from = range.start_date.and_time(NaiveTime::MIN).and_utc();
    let to = range
        .end_date
        .checked_add_days(Days::new(1))
        .unwrap_or(range.end_date)
        .and_time(NaiveTime::MIN)
        .and_utc();
    Ok(Json(payments::list_by_date_range(&state.db, from, to).await?))
}

pub async fn list_payments_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<payment::Model>>, JsonApiError> {
    Ok(Json(payments::list_by_status(&state.db, &status).await?))
}

pub async fn list_client_payments(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<Json<Vec<payment::Model>>, JsonApiError> {
    Ok(Json(payments::list_by_client(&state.db, client_id).await?))
}

#[derive(Debug, Serialize)]
pub struct ClientTotalOutput {
    pub total: Decimal,
}

pub async fn client_total_payments(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<Json<ClientTotalOutput>, JsonApiError> {
    let total = payments::total_by_client(&state.db, client_id).await?;
    Ok(Json(ClientTotalOutput { total }))
}

pub async fn list_service_payments(
    State(state): State<AppState>,
    Path(client_service_id): Path<i32>,
) -> Result<Json<Vec<payment::Model>>, JsonApiError> {
    Ok(Json(payments::list_by_client_service(&state.db, client_service_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusInput {
    pub status: String,
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<PaymentStatusInput>,
) -> Result<Json<payment::Model>, JsonApiError> {
    Ok(Json(payments::update_payment_status(&state.db, id, &input.status).await?))
}
