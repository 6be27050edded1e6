//! Shared helpers for in-memory weld job integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use weldtrack::weld_job::{
    adapters::memory::InMemoryWeldJobRepository,
    domain::{DeviceId, DeviceName, TableSnapshot},
    services::{RandomBusinessIdSource, WeldJobLifecycleService},
};

/// Lifecycle service wired to the in-memory store.
pub type MemoryService =
    WeldJobLifecycleService<InMemoryWeldJobRepository, RandomBusinessIdSource, DefaultClock>;

/// Store and service sharing the same records.
pub struct MemoryContext {
    pub repository: Arc<InMemoryWeldJobRepository>,
    pub service: MemoryService,
}

impl MemoryContext {
    /// Builds a context around a store with the given table shape.
    #[must_use]
    pub fn with_schema(snapshot: TableSnapshot) -> Self {
        let repository = Arc::new(InMemoryWeldJobRepository::with_schema(snapshot));
        let service = WeldJobLifecycleService::new(
            Arc::clone(&repository),
            Arc::new(RandomBusinessIdSource),
            Arc::new(DefaultClock),
        );
        Self {
            repository,
            service,
        }
    }
}

/// Provides a context whose table is already current.
#[fixture]
pub fn context() -> MemoryContext {
    MemoryContext::with_schema(TableSnapshot::current())
}

/// Parses a device identifier for test input.
#[must_use]
pub fn device(raw: &str) -> DeviceId {
    DeviceId::new(raw).expect("valid device id")
}

/// Parses a device name for test input.
#[must_use]
pub fn device_name(raw: &str) -> DeviceName {
    DeviceName::new(raw).expect("valid device name")
}
