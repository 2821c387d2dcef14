//! Error handling utilities for repositories

use chat_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Errors from a collaborator lookup are surfaced as transient unavailability
pub fn map_dependency_error(e: SqlxError) -> DomainError {
    DomainError::DependencyUnavailable(e.to_string())
}
