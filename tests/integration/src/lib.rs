//! Integration test utilities for the chat presence server
//!
//! Helpers for running end-to-end tests against the REST API backed by
//! live PostgreSQL and Redis instances.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
