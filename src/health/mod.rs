//! Liveness endpoint

use axum::{extract::Extension, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::common::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Reports healthy only when the database answers a trivial query
pub async fn health_check(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    sqlx::query("SELECT 1").execute(&state.db).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "ok",
    }))
}

/// # Routes
/// - `GET /health` - Service and database liveness
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_ok() {
        let state = AppState::for_tests().await;
        let Json(body) = health_check(Extension(state)).await.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.database, "ok");
    }

    #[tokio::test]
    async fn test_health_check_fails_when_pool_closed() {
        let state = AppState::for_tests().await;
        state.db.close().await;
        assert!(matches!(
            health_check(Extension(state)).await,
            Err(ApiError::DatabaseError(_))
        ));
    }
}
