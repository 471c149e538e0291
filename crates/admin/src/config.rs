//! Backend configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Base URL of the hosted backend project
//! - `SUPABASE_ANON_KEY` - Anonymous API key (JWT)
//!
//! A missing or malformed variable is reported as a [`ConfigError`] and
//! surfaced to the dashboard as a connectivity failure; it never aborts the
//! process from library code.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Connection settings for the hosted backend.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project base URL (e.g. `https://abc.supabase.co`), without a
    /// trailing slash.
    pub url: String,
    /// Anonymous API key. Row-level security on the backend decides what
    /// this key may read and write.
    pub anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl SupabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, the URL does
    /// not parse, or the key fails validation (placeholder detection, JWT
    /// shape check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let url = get_required_env("SUPABASE_URL")?;
        let url = validate_project_url(&url)?;
        let anon_key = get_required_env("SUPABASE_ANON_KEY")?;
        validate_api_key(&anon_key, "SUPABASE_ANON_KEY")?;

        Ok(Self {
            url,
            anon_key: SecretString::from(anon_key),
        })
    }

    /// Build a config from explicit values (tests, alternate loaders).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL does not parse.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            url: validate_project_url(url)?,
            anon_key: SecretString::from(anon_key),
        })
    }

    /// Expose the anon key for header construction.
    #[must_use]
    pub fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Validate the project URL and normalize away any trailing slash.
fn validate_project_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            "SUPABASE_URL".to_string(),
            format!("unsupported scheme: {}", parsed.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Validate that an API key is not a placeholder and looks like a JWT.
fn validate_api_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = key.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Anon keys are JWTs: three base64url segments separated by dots
    if key.split('.').count() != 3 {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "expected a JWT (three dot-separated segments)".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FAKE_JWT: &str = "eyJhbGciOiJIUzI1NiJ9.eyJyb2xlIjoiYW5vbiJ9.sig";

    #[test]
    fn test_url_trailing_slash_is_stripped() {
        let config = SupabaseConfig::new("https://abc.supabase.co/", FAKE_JWT).unwrap();
        assert_eq!(config.url, "https://abc.supabase.co");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = validate_project_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let result = validate_project_url("ftp://abc.supabase.co");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_placeholder_key_is_rejected() {
        let result = validate_api_key("your-anon-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_non_jwt_key_is_rejected() {
        let result = validate_api_key("justarandomstring", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_valid_jwt_key_is_accepted() {
        assert!(validate_api_key(FAKE_JWT, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_anon_key() {
        let config = SupabaseConfig::new("https://abc.supabase.co", FAKE_JWT).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://abc.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(FAKE_JWT));
    }
}
