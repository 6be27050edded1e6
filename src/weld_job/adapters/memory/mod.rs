//! In-memory adapters for weld job persistence.

mod weld_job;

pub use weld_job::InMemoryWeldJobRepository;
