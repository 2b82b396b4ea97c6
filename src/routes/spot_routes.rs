use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use super::paged_response;
use crate::controllers::spot_controller::SpotController;
use crate::dto::spot_dto::{SpotRequest, SpotResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageRequest;

pub fn create_spot_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_spots).post(create_spot))
        .route("/:id", get(get_spot).put(update_spot).delete(delete_spot))
        .route("/:id/release", post(release_spot))
}

async fn create_spot(
    State(state): State<AppState>,
    Json(request): Json<SpotRequest>,
) -> Result<(StatusCode, Json<SpotResponse>), AppError> {
    let controller = SpotController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_spot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SpotResponse>, AppError> {
    let controller = SpotController::new(state.store.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_spots(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Response, AppError> {
    let controller = SpotController::new(state.store.clone());
    let response = controller.list(page).await?;
    Ok(paged_response(response))
}

async fn update_spot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<SpotRequest>,
) -> Result<StatusCode, AppError> {
    let controller = SpotController::new(state.store.clone());
    controller.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_spot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let controller = SpotController::new(state.store.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn release_spot(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let controller = SpotController::new(state.store.clone());
    controller.release(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
