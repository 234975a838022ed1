//! `User` header extractor.
//!
//! The acting participant is named by the `User` request header. There is no
//! authentication; the header is taken at face value.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// Name of the header carrying the acting participant.
pub const USER_HEADER: &str = "user";

/// The participant a request acts as.
#[derive(Debug, Clone)]
pub struct User(pub String);

impl<S: Send + Sync> FromRequestParts<S> for User {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| AppError::Validation("Missing User header".to_string()))?;

        // Raw UTF-8 rather than `to_str`, which only accepts visible ASCII.
        let name = std::str::from_utf8(value.as_bytes())
            .map_err(|_| AppError::Validation("Invalid User header encoding".to_string()))?
            .trim();

        if name.is_empty() {
            return Err(AppError::Validation("Empty User header".to_string()));
        }

        Ok(User(name.to_string()))
    }
}
