//! Integration test crate for the Vigil alerting pipeline.
//!
//! This crate exists solely to run integration tests that span multiple
//! Vigil crates. It has no public API - all functionality is in the test
//! modules.

#![forbid(unsafe_code)]
