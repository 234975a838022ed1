//! HTTP/REST API layer for Batepapo.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and
//! CORS support. The acting participant is named by the `User` header.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
