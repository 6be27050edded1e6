//! `PostgreSQL` adapters for weld job persistence.

mod migration;
mod models;
mod repository;
mod schema;

pub use repository::PostgresWeldJobRepository;
