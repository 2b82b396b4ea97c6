use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use super::paged_response;
use crate::controllers::zone_controller::ZoneController;
use crate::dto::spot_dto::{ZoneRequest, ZoneResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageRequest;

pub fn create_zone_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_zones).post(create_zone))
        .route("/:id", get(get_zone).put(update_zone).delete(delete_zone))
}

async fn create_zone(
    State(state): State<AppState>,
    Json(request): Json<ZoneRequest>,
) -> Result<(StatusCode, Json<ZoneResponse>), AppError> {
    let controller = ZoneController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ZoneResponse>, AppError> {
    let controller = ZoneController::new(state.store.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_zones(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Response, AppError> {
    let controller = ZoneController::new(state.store.clone());
    let response = controller.list(page).await?;
    Ok(paged_response(response))
}

async fn update_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ZoneRequest>,
) -> Result<StatusCode, AppError> {
    let controller = ZoneController::new(state.store.clone());
    controller.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_zone(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let controller = ZoneController::new(state.store.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
