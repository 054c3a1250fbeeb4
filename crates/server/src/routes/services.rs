use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use models::service::Model as CatalogService;
use service::db::services;
use service::db::services::ServiceInput;

use crate::errors::JsonApiError;
use crate::state::AppState;

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogService>>, JsonApiError> {
    Ok(Json(services::list_services(&state.db).await?))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CatalogService>, JsonApiError> {
    match services::get_service(&state.db, id).await? {
        Some(found) => Ok(Json(found)),
        None => Err(JsonApiError::not_found("service")),
    }
}

pub async fn create_service(
    State(state): State<AppState>,
    Json(input): Json<ServiceInput>,
) -> Result<(StatusCode, Json<CatalogService>), JsonApiError> {
    let created = services::create_service(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ServiceInput>,
) -> Result<Json<CatalogService>, JsonApiError> {
    Ok(Json(services::update_service(&state.db, id, input).await?))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    if services::delete_service(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("service"))
    }
}
