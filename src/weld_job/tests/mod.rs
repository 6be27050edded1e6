//! Unit tests for the weld job module.
