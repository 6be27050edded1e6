//! Shared helpers for `PostgreSQL` integration tests.
//!
//! Tests run only when `WELDTRACK_TEST_DATABASE_URL` names a reachable
//! database. Each test works inside its own throwaway schema, selected
//! through the connection's `search_path`, and drops it afterwards.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use uuid::Uuid;
use weldtrack::weld_job::{
    adapters::postgres::PostgresWeldJobRepository,
    services::{RandomBusinessIdSource, WeldJobLifecycleService},
};

/// Environment variable naming the test database.
pub const TEST_DATABASE_URL_ENV: &str = "WELDTRACK_TEST_DATABASE_URL";

/// Lifecycle service wired to `PostgreSQL`.
pub type PostgresService =
    WeldJobLifecycleService<PostgresWeldJobRepository, RandomBusinessIdSource, DefaultClock>;

/// A uniquely named schema dropped when the value goes out of scope.
pub struct TestSchema {
    base_url: String,
    name: String,
}

impl TestSchema {
    /// Creates an empty schema, or returns `None` when no test database is
    /// configured.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be reached or the schema cannot be
    /// created.
    #[must_use]
    pub fn create() -> Option<Self> {
        let base_url = std::env::var(TEST_DATABASE_URL_ENV).ok()?;
        let name = format!("weldtrack_test_{}", Uuid::new_v4().simple());
        let mut connection =
            PgConnection::establish(&base_url).expect("test database should be reachable");
        connection
            .batch_execute(&format!("CREATE SCHEMA {name}"))
            .expect("test schema should be created");
        Some(Self { base_url, name })
    }

    /// Connection URL whose `search_path` points at this schema.
    #[must_use]
    pub fn url(&self) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}options=-csearch_path%3D{}",
            self.base_url, self.name
        )
    }

    /// Runs raw SQL inside this schema.
    ///
    /// # Panics
    ///
    /// Panics if the connection or any statement fails.
    pub fn execute(&self, sql: &str) {
        let mut connection =
            PgConnection::establish(&self.url()).expect("test schema should be reachable");
        connection.batch_execute(sql).expect("setup SQL should run");
    }

    /// Builds a repository bound to this schema.
    #[must_use]
    pub fn repository(&self) -> PostgresWeldJobRepository {
        PostgresWeldJobRepository::new(self.url())
    }

    /// Builds a lifecycle service bound to this schema.
    #[must_use]
    pub fn service(&self) -> PostgresService {
        WeldJobLifecycleService::new(
            Arc::new(self.repository()),
            Arc::new(RandomBusinessIdSource),
            Arc::new(DefaultClock),
        )
    }
}

impl Drop for TestSchema {
    fn drop(&mut self) {
        if let Ok(mut connection) = PgConnection::establish(&self.base_url) {
            connection
                .batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name))
                .unwrap_or_default();
        }
    }
}

/// Creates a schema with the current table layout applied.
///
/// # Panics
///
/// Panics if setup or the schema guard fails.
pub async fn migrated_schema() -> Option<TestSchema> {
    let schema = TestSchema::create()?;
    schema
        .service()
        .ensure_schema()
        .await
        .expect("schema guard should succeed");
    Some(schema)
}
