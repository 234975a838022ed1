//! Axum router configuration with middleware.
//!
//! All chat routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/participants",
            post(handlers::participant::join).get(handlers::participant::list),
        )
        .route(
            "/messages",
            post(handlers::message::post).get(handlers::message::list),
        )
        .route("/status", post(handlers::status::heartbeat));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus a database round trip.
///
/// Answers 500 when the database cannot be reached.
async fn health_check(
    State(state): State<AppState>,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.db_pool.reader)
        .await
        .map_err(|e| AppError::Internal(format!("database unavailable: {e}")))?;

    Ok(axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "ok",
    })))
}
