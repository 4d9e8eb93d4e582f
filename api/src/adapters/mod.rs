//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod sql;

pub use sql::{ensure_schema, SqlUserRepository};
