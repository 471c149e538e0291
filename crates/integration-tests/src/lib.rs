//! Integration tests for the Sidra admin data layer.
//!
//! # Running Tests
//!
//! The tests talk to a real backend project and are `#[ignore]`d by
//! default. Point them at a disposable project:
//!
//! ```bash
//! export SUPABASE_URL=https://<project>.supabase.co
//! export SUPABASE_ANON_KEY=<anon key>
//! cargo test -p sidra-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `products_flow` - create/read/update/delete round trips
//! - `orders_flow` - status protocol, stats, guest checkout
//! - `media_cleanup` - upload, cascade deletion, orphan tolerance
//! - `pagination` - totals, ranges, and the orders search edge case

use sidra_admin::SidraData;

/// Build the data layer from the test environment, panicking with a clear
/// message when the variables are absent.
///
/// # Panics
///
/// Panics if `SUPABASE_URL`/`SUPABASE_ANON_KEY` are not set or invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_data() -> SidraData {
    SidraData::from_env().expect("set SUPABASE_URL and SUPABASE_ANON_KEY to run integration tests")
}

/// Marker prefix so leaked test rows are easy to spot and sweep.
pub const TEST_MARKER: &str = "itest";

/// A unique, greppable name for test fixtures.
#[must_use]
pub fn test_name(kind: &str) -> String {
    format!("{TEST_MARKER}-{kind}-{}", uuid::Uuid::new_v4().simple())
}
