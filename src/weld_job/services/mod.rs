//! Application services for weld job lifecycle orchestration.

mod allocator;
mod lifecycle;

#[cfg(test)]
pub use allocator::MockBusinessIdSource;
pub use allocator::{
    AllocationError, BusinessIdAllocator, BusinessIdSource, DEFAULT_ALLOCATION_ATTEMPTS,
    RandomBusinessIdSource,
};
pub use lifecycle::{
    EditWeldJobRequest, RegisterWeldJobRequest, RegistrationDisposition, RegistrationOutcome,
    WeldJobLifecycleError, WeldJobLifecycleResult, WeldJobLifecycleService,
};
