use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::paged_response;
use crate::controllers::motorcycle_controller::MotorcycleController;
use crate::dto::motorcycle_dto::{MotorcycleRequest, MotorcycleResponse, MotorcycleTypeQuery};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageRequest;

pub fn create_motorcycle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_motorcycles).post(create_motorcycle))
        .route("/type", get(list_motorcycles_by_type))
        .route(
            "/:id",
            get(get_motorcycle)
                .put(update_motorcycle)
                .delete(delete_motorcycle),
        )
}

async fn create_motorcycle(
    State(state): State<AppState>,
    Json(request): Json<MotorcycleRequest>,
) -> Result<(StatusCode, Json<MotorcycleResponse>), AppError> {
    let controller = MotorcycleController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_motorcycle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MotorcycleResponse>, AppError> {
    let controller = MotorcycleController::new(state.store.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_motorcycles(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Response, AppError> {
    let controller = MotorcycleController::new(state.store.clone());
    let response = controller.list(page).await?;
    Ok(paged_response(response))
}

async fn list_motorcycles_by_type(
    State(state): State<AppState>,
    Query(query): Query<MotorcycleTypeQuery>,
) -> Result<Response, AppError> {
    let controller = MotorcycleController::new(state.store.clone());
    let response = controller.list_by_type(&query.moto_type).await?;
    if response.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(response).into_response())
}

async fn update_motorcycle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<MotorcycleRequest>,
) -> Result<StatusCode, AppError> {
    let controller = MotorcycleController::new(state.store.clone());
    controller.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_motorcycle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let controller = MotorcycleController::new(state.store.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
