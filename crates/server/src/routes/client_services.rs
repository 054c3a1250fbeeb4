use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use models::client_service;
use service::db::client_services;
use service::db::client_services::{ClientServiceDetails, NewClientService};

use crate::errors::JsonApiError;
use crate::state::AppState;

pub async fn list_client_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientServiceDetails>>, JsonApiError> {
    Ok(Json(client_services::list_client_services(&state.db).await?))
}

pub async fn get_client_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ClientServiceDetails>, JsonApiError> {
    match client_services::get_client_service(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(JsonApiError::not_found("client service")),
    }
}

pub async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> Result<Json<Vec<ClientServiceDetails>>, JsonApiError> {
    Ok(Json(client_services::list_by_client(&state.db, client_id).await?))
}

pub async fn create_client_service(
    State(state): State<AppState>,
    Json(input): Json<NewClientService>,
) -> Result<(StatusCode, Json<client_service::Model>), JsonApiError> {
    let created = client_services::create_client_service(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct DueDateInput {
    pub due_date: Option<NaiveDate>,
}

/// Metadata-only edit; balance fields are owned by the payment ledger.
pub async fn update_due_date(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<DueDateInput>,
) -> Result<Json<client_service::Model>, JsonApiError> {
    Ok(Json(client_services::update_due_date(&state.db, id, input.due_date).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<StatusInput>,
) -> Result<Json<client_service::Model>, JsonApiError> {
    Ok(Json(client_services::update_status(&state.db, id, &input.status).await?))
}

pub async fn delete_client_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    if client_services::delete_client_service(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("client service"))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

pub async fn search_client_services(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ClientServiceDetails>>, JsonApiError> {
    Ok(Json(client_services::search_by_name(&state.db, &query.name).await?))
}
