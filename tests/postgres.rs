//! `PostgreSQL` integration tests for the weld job store.
//!
//! Tests skip unless `WELDTRACK_TEST_DATABASE_URL` is set. Modules:
//! - `helpers`: Throwaway schemas and service wiring
//! - `lifecycle_tests`: Register, resume, complete, edit, clear, delete
//! - `schema_guard_tests`: Table creation, legacy upgrades, soft failures
//! - `uniqueness_tests`: Business identifier and open-job constraints, racing registrations

mod postgres {
    pub mod helpers;

    mod lifecycle_tests;
    mod schema_guard_tests;
    mod uniqueness_tests;
}
