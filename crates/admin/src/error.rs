//! Crate-level error type with user-facing Arabic messages.
//!
//! Resource modules translate every [`SupabaseError`] at the boundary: the
//! raw error is logged, and callers receive a [`DataError`] whose `Display`
//! is the localized message shown in the dashboard.

use thiserror::Error;

use crate::config::ConfigError;
use crate::messages;
use crate::supabase::SupabaseError;

/// Result alias used by all resource operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors surfaced to dashboard code.
///
/// `Display` always produces the Arabic user-facing text; the wrapped source
/// (when present) stays available through `std::error::Error::source` for
/// logs and diagnostics.
#[derive(Debug, Error)]
pub enum DataError {
    /// A backend call failed.
    #[error("{message}")]
    Backend {
        message: &'static str,
        #[source]
        source: SupabaseError,
    },

    /// The requested row does not exist.
    #[error("{message}")]
    NotFound { message: &'static str },

    /// Input rejected before reaching the backend.
    #[error("{message}")]
    Invalid { message: &'static str },

    /// The backend is unreachable or not configured.
    #[error("{}", messages::CONNECTIVITY)]
    Connectivity {
        #[source]
        source: Option<ConfigError>,
    },
}

impl DataError {
    /// Wrap a backend failure, logging the raw error and keeping only the
    /// localized message on the surface. Provider not-found codes collapse
    /// into [`DataError::NotFound`] with the same message.
    pub(crate) fn backend(message: &'static str, source: SupabaseError) -> Self {
        if source.is_not_found() {
            tracing::debug!(error = %source, "row not found");
            return Self::NotFound { message };
        }
        tracing::error!(error = %source, "backend call failed");
        Self::Backend { message, source }
    }

    pub(crate) const fn not_found(message: &'static str) -> Self {
        Self::NotFound { message }
    }

    pub(crate) const fn invalid(message: &'static str) -> Self {
        Self::Invalid { message }
    }

    /// The localized message shown to operators.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Backend { message, .. }
            | Self::NotFound { message }
            | Self::Invalid { message } => message,
            Self::Connectivity { .. } => messages::CONNECTIVITY,
        }
    }

    /// Whether this error represents a missing row.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<ConfigError> for DataError {
    fn from(source: ConfigError) -> Self {
        tracing::error!(error = %source, "backend configuration invalid");
        Self::Connectivity {
            source: Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_localized_message() {
        let err = DataError::not_found(messages::PRODUCT_NOT_FOUND);
        assert_eq!(err.to_string(), messages::PRODUCT_NOT_FOUND);
    }

    #[test]
    fn test_backend_not_found_collapses() {
        let err = DataError::backend(messages::ORDER_NOT_FOUND, SupabaseError::NotFound);
        assert!(err.is_not_found());
        assert_eq!(err.message(), messages::ORDER_NOT_FOUND);
    }

    #[test]
    fn test_backend_failure_keeps_source() {
        let err = DataError::backend(
            messages::FETCH_PRODUCTS,
            SupabaseError::Api {
                status: 500,
                code: None,
                message: "boom".to_string(),
            },
        );
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), messages::FETCH_PRODUCTS);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_maps_to_connectivity() {
        let err: DataError = ConfigError::MissingEnvVar("SUPABASE_URL".to_string()).into();
        assert_eq!(err.to_string(), messages::CONNECTIVITY);
    }
}
