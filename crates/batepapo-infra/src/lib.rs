//! Infrastructure layer for Batepapo.
//!
//! Contains implementations of the repository traits defined in `batepapo-core`
//! (SQLite storage), the `config.toml` loader, and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod sqlite;
