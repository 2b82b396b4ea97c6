use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use super::paged_response;
use crate::controllers::tag_controller::TagController;
use crate::dto::tag_dto::{TagRequest, TagResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageRequest;

pub fn create_tag_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/:id", get(get_tag).put(update_tag).delete(delete_tag))
}

async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<TagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), AppError> {
    let controller = TagController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagResponse>, AppError> {
    let controller = TagController::new(state.store.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_tags(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Response, AppError> {
    let controller = TagController::new(state.store.clone());
    let response = controller.list(page).await?;
    Ok(paged_response(response))
}

async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<TagRequest>,
) -> Result<StatusCode, AppError> {
    let controller = TagController::new(state.store.clone());
    controller.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let controller = TagController::new(state.store.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
