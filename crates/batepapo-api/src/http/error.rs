//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use batepapo_types::error::ChatError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Domain errors from the chat services.
    Chat(ChatError),
    /// Malformed request (body, query string or headers).
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Unauthorized(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NOT_JOINED", msg.clone())
            }
            AppError::Chat(ChatError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "NAME_TAKEN", msg.clone())
            }
            AppError::Chat(ChatError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "PARTICIPANT_NOT_FOUND", msg.clone())
            }
            AppError::Chat(ChatError::Storage(msg)) => {
                tracing::error!(error = %msg, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", "Storage failure".to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ApiResponse::error(code, &message, String::new());
        (status, Json(body)).into_response()
    }
}
