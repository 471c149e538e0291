//! Typed client for the hosted backend's REST and storage APIs.
//!
//! The backend exposes every table through a PostgREST-style REST interface
//! and binary assets through bucket-scoped storage endpoints. This module
//! provides:
//!
//! - [`SupabaseClient`] - explicitly constructed, cheaply cloneable handle
//!   (no process-wide singleton; consumers receive it by injection)
//! - [`TableQuery`] - filtered, paginated reads with the total row count
//!   returned in the same round trip
//! - storage helpers for uploading assets and best-effort cleanup
//!
//! # Example
//!
//! ```rust,ignore
//! use sidra_admin::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config)?;
//!
//! let page: Page<Product> = client
//!     .table("products")
//!     .order_desc("created_at")
//!     .page(PageRequest::new(1, 10))
//!     .fetch_page()
//!     .await?;
//! ```

mod client;
mod storage;

pub use client::{SupabaseClient, TableQuery};

use thiserror::Error;

/// Provider error code for "zero rows returned where one was requested".
pub(crate) const NOT_FOUND_CODE: &str = "PGRST116";

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status}{} - {message}", format_code(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Unauthorized (invalid or expired API key, or row policy denied).
    #[error("Unauthorized: API key rejected")]
    Unauthorized,

    /// Requested row does not exist.
    #[error("Row not found")]
    NotFound,

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SupabaseError {
    /// Whether this error means "the row does not exist" rather than a real
    /// failure. Lookup helpers use this to return `false`/`None` instead of
    /// propagating.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound => true,
            Self::Api { code, .. } => code.as_deref() == Some(NOT_FOUND_CODE),
            _ => false,
        }
    }
}

fn format_code(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variant() {
        assert!(SupabaseError::NotFound.is_not_found());
    }

    #[test]
    fn test_provider_code_counts_as_not_found() {
        let err = SupabaseError::Api {
            status: 406,
            code: Some(NOT_FOUND_CODE.to_string()),
            message: "JSON object requested, multiple (or no) rows returned".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_api_errors_are_not_not_found() {
        let err = SupabaseError::Api {
            status: 500,
            code: Some("XX000".to_string()),
            message: "internal".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_api_error_display_includes_code() {
        let err = SupabaseError::Api {
            status: 409,
            code: Some("23505".to_string()),
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 409 [23505] - duplicate key");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = SupabaseError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
