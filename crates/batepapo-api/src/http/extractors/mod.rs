//! Custom request extractors.

pub mod user;
