//! Message handlers: post to the room and read the visible history.

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use batepapo_types::message::{ChatMessage, Recipient};

use crate::http::error::AppError;
use crate::http::extractors::user::User;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of `POST /api/v1/messages`.
///
/// `kind` stays a string so an unknown kind is reported by the service
/// alongside the other validation failures.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub recipient: Recipient,
    pub text: String,
    pub kind: String,
}

/// Query parameters of `GET /api/v1/messages`.
#[derive(Debug, Deserialize, Default)]
pub struct MessageListQuery {
    /// Maximum number of messages, newest kept. Absent, zero or negative means all.
    pub limit: Option<i64>,
}

/// POST /api/v1/messages - Post a message as the `User` header's participant.
pub async fn post(
    State(state): State<AppState>,
    User(sender): User,
    body: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ChatMessage>>), AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Json(body) = body?;

    let msg = state
        .message_service
        .post_message(&sender, body.recipient, &body.text, &body.kind)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(msg, request_id, elapsed).with_link("self", "/api/v1/messages");

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/messages - Messages visible to the `User` header's participant.
pub async fn list(
    State(state): State<AppState>,
    User(viewer): User,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();
    let Query(query) = query?;

    let messages = state.message_service.list_messages(&viewer, query.limit).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp =
        ApiResponse::success(messages, request_id, elapsed).with_link("self", "/api/v1/messages");

    Ok(Json(resp))
}
