//! # API Handlers
//!
//! HTTP endpoint handlers. JSON endpoints return `Result<_, AppError>`; the
//! login flow answers with redirects.

use axum::{extract::State, http::StatusCode, response::Json};

use crate::db;
use crate::error::AppError;
use crate::models::{HealthStatus, ServiceInfo};
use crate::server::AppState;

pub mod auth;
pub mod login;
pub mod organisations;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness check including a database ping
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = HealthStatus)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    match db::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".into(),
                database: "ok".into(),
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "degraded".into(),
                    database: "unreachable".into(),
                }),
            )
        }
    }
}

/// Fallback for unmatched `/api` paths; runs behind the session check.
pub async fn api_not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

#[cfg(test)]
mod tests;
