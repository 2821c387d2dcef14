//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use chat_common::AppError;
use chat_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or store failure
    Domain(DomainError),

    /// Application error (auth, config)
    App(AppError),

    /// No resolvable caller identity
    Unauthenticated,

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// User-correctable input error
    Validation(String),

    /// An external collaborator failed; the whole operation may be retried
    DependencyUnavailable(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Unauthenticated => write!(f, "No authenticated caller identity"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::DependencyUnavailable(msg) => write!(f, "Dependency unavailable: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a dependency-unavailable error
    pub fn dependency_unavailable(msg: impl Into<String>) -> Self {
        Self::DependencyUnavailable(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_retryable(),
            Self::DependencyUnavailable(_) => true,
            _ => false,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_unauthenticated() {
                    401
                } else if e.is_validation() {
                    400
                } else if matches!(e, DomainError::DependencyUnavailable(_)) {
                    503
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::Unauthenticated => 401,
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::DependencyUnavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DependencyUnavailable(_) => "DEPENDENCY_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Unauthenticated => Self::Unauthenticated,
            DomainError::DependencyUnavailable(msg) => Self::DependencyUnavailable(msg),
            other => Self::Domain(other),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Unauthenticated => AppError::Unauthenticated,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::DependencyUnavailable(msg) => AppError::DependencyUnavailable(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::Snowflake;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Channel", 123);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Channel not found: 123"));
    }

    #[test]
    fn test_domain_not_found_keeps_specific_code() {
        let err: ServiceError = DomainError::ChannelNotFound(Snowflake::new(7)).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_CHANNEL");
    }

    #[test]
    fn test_empty_content_is_validation() {
        let err: ServiceError = DomainError::EmptyContent.into();
        assert_eq!(err.status_code(), 400);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_dependency_unavailable_is_retryable() {
        let err: ServiceError = DomainError::DependencyUnavailable("membership".into()).into();
        assert!(matches!(err, ServiceError::DependencyUnavailable(_)));
        assert_eq!(err.status_code(), 503);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_unauthenticated_error() {
        let err: ServiceError = DomainError::Unauthenticated.into();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::dependency_unavailable("down").into();
        assert_eq!(app_err.status_code(), 503);

        let app_err: AppError = ServiceError::not_found("Channel", "456").into();
        assert_eq!(app_err.status_code(), 404);
    }
}
