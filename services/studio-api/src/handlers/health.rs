//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub database: &'static str,
    /// Size of the seeded class catalog; zero means seeding has not run
    pub catalog_classes: i64,
}

/// Liveness probe - always returns OK if the service is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "studio-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe - checks database connectivity and the seeded catalog
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, StatusCode> {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes")
        .fetch_one(&state.pool)
        .await
    {
        Ok(count) => Ok(Json(ReadyResponse {
            status: "ready",
            database: "connected",
            catalog_classes: count,
        })),
        Err(e) => {
            tracing::error!(error = ?e, "Database health check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn liveness_names_the_service() {
        let Json(res) = health().await;
        assert_eq!(res.status, "healthy");
        assert_eq!(res.service, "studio-api");
    }
}
