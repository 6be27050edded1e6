//! Adapter implementations for weld job persistence ports.

pub mod memory;
pub mod postgres;
