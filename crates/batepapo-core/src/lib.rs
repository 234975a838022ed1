//! Presence tracking, message routing and repository trait definitions for Batepapo.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `batepapo-types` -- never on
//! `batepapo-infra` or any database/IO crate.

pub mod clock;
pub mod repository;
pub mod service;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod testing;
