//! Shared domain types for Batepapo.
//!
//! This crate contains the core domain types of the chat room: participants,
//! messages and their recipients, room configuration, and the error types
//! shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, regex.

pub mod config;
pub mod error;
pub mod message;
pub mod participant;
pub mod sanitize;
