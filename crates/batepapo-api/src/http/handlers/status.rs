//! Heartbeat handler.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::http::extractors::user::User;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/status - Refresh the `User` header's participant.
pub async fn heartbeat(
    State(state): State<AppState>,
    User(name): User,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let participant = state.presence_service.heartbeat(&name).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({ "name": participant.name, "active": true }),
        request_id,
        elapsed,
    );
    Ok(Json(resp))
}
