//! Participant handlers: join the room and list who is in it.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;

use batepapo_types::participant::Participant;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /api/v1/participants`.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

/// POST /api/v1/participants - Join the room.
pub async fn join(
    State(state): State<AppState>,
    body: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Participant>>), AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Json(body) = body?;

    let participant = state.presence_service.join(&body.name).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(participant, request_id, elapsed)
        .with_link("self", "/api/v1/participants")
        .with_link("messages", "/api/v1/messages");

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/participants - List participants in join order.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Participant>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let participants = state.presence_service.list_participants().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(participants, request_id, elapsed)
        .with_link("self", "/api/v1/participants");

    Ok(Json(resp))
}
