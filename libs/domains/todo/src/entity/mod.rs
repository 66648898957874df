//! SeaORM entities backing the PostgreSQL repositories.

pub mod project;
pub mod task;
