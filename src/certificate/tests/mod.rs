//! Unit tests for the certificate module.
