use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use recipesaver_storage_sqlite::get_connection;

use crate::main_lib::AppState;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Alive")))]
pub async fn healthz() -> &'static str {
    "ok"
}

/// Ready once a pooled database connection can be checked out.
#[utoipa::path(
    get,
    path = "/api/v1/readyz",
    responses((status = 200, description = "Ready"), (status = 503, description = "Database unavailable"))
)]
pub async fn readyz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match get_connection(&state.db_pool) {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
