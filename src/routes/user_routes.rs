use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::paged_response;
use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{
    CategoryRequest, CategoryResponse, CreateUserRequest, UpdateUserRequest, UserNameQuery,
    UserResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageRequest;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/name", get(get_user_by_name))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub fn create_category_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", get(get_category).delete(delete_category))
}

fn controller(state: &AppState) -> UserController {
    UserController::new(state.store.clone(), state.config.bcrypt_cost)
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let response = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let response = controller(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn get_user_by_name(
    State(state): State<AppState>,
    Query(query): Query<UserNameQuery>,
) -> Result<Json<UserResponse>, AppError> {
    let response = controller(&state).get_by_name(&query.name).await?;
    Ok(Json(response))
}

async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Response, AppError> {
    let response = controller(&state).list(page).await?;
    Ok(paged_response(response))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    controller(&state).update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    controller(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    let response = controller(&state).create_category(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>, AppError> {
    let response = controller(&state).get_category(id).await?;
    Ok(Json(response))
}

async fn list_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let response = controller(&state).list_categories().await?;
    if response.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(response).into_response())
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    controller(&state).delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
