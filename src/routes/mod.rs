//! Routers de la API
//!
//! Cada recurso expone su router y los handlers crean el controller con el
//! `Store` compartido del estado.

pub mod motorcycle_routes;
pub mod spot_routes;
pub mod tag_routes;
pub mod user_routes;
pub mod zone_routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dto::paged_dto::PagedResult;

/// Una página vacía se responde con 204 sin body
pub(crate) fn paged_response<T: Serialize>(result: PagedResult<T>) -> Response {
    if result.items.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(result).into_response()
}
