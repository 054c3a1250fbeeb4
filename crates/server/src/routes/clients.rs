use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use models::client;
use service::db::clients;
use service::db::clients::ClientInput;

use crate::errors::JsonApiError;
use crate::state::AppState;

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<client::Model>>, JsonApiError> {
    Ok(Json(clients::list_clients(&state.db).await?))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<client::Model>, JsonApiError> {
    match clients::get_client(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(JsonApiError::not_found("client")),
    }
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<ClientInput>,
) -> Result<(StatusCode, Json<client::Model>), JsonApiError> {
    let created = clients::create_client(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ClientInput>,
) -> Result<Json<client::Model>, JsonApiError> {
    Ok(Json(clients::update_client(&state.db, id, input).await?))
}

#[derive(Debug, Deserialize)]
pub struct ClientStatusInput {
    pub is_active: bool,
}

pub async fn set_client_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ClientStatusInput>,
) -> Result<Json<client::Model>, JsonApiError> {
    Ok(Json(clients::set_client_active(&state.db, id, input.is_active).await?))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    if clients::delete_client(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("client"))
    }
}
