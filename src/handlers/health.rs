// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// GET /api/health/
#[utoipa::path(
    get,
    path = "/api/health/",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço e banco no ar", body = HealthResponse),
        (status = 503, description = "Banco indisponível", body = HealthResponse)
    )
)]
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse { status: "ok", database: "up" })),
        Err(e) => {
            tracing::warn!("Health check sem banco: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "degraded", database: "down" }),
            )
        }
    }
}
