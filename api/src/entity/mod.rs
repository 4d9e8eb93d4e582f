//! SeaORM entities
//!
//! Table mappings used by the SQL adapters.

pub mod users;
