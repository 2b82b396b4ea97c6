//! Backend de gestión de estacionamiento de una flota de motos
//!
//! Motos, tags RFID, vagas, zonas y usuarios. El núcleo es el motor de
//! ocupación (`services::occupancy_service`), que mantiene consistentes la
//! vaga de cada moto y el flag `occupied` de cada vaga.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::error;

use middleware::cors::cors_middleware;
use state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/motorcycles", routes::motorcycle_routes::create_motorcycle_router())
        .nest("/api/spots", routes::spot_routes::create_spot_router())
        .nest("/api/zones", routes::zone_routes::create_zone_router())
        .nest("/api/tags", routes::tag_routes::create_tag_router())
        .nest("/api/users", routes::user_routes::create_user_router())
        .nest("/api/user-categories", routes::user_routes::create_category_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check: abre una transacción para comprobar el almacenamiento
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match state.store.begin().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "environment": state.config.environment,
                "timestamp": timestamp,
            })),
        ),
        Err(e) => {
            error!("❌ Health check falló: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "timestamp": timestamp })),
            )
        }
    }
}
