//! Backend connectivity probe.
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL` - Base URL of the hosted backend project
//! - `SUPABASE_ANON_KEY` - Anonymous API key (JWT)

use sidra_admin::{DataError, SidraData};
use sidra_core::PageRequest;

/// Load config, build the client, and issue one cheap read.
///
/// # Errors
///
/// Returns the localized error when configuration is missing or the
/// backend is unreachable.
pub async fn run() -> Result<(), DataError> {
    let data = SidraData::from_env()?;

    // One row is enough to prove the REST path end to end.
    let categories = data.categories().list_all().await?;
    let products = data
        .products()
        .list(PageRequest::new(1, 1), &Default::default())
        .await?;

    tracing::info!(
        categories = categories.len(),
        products = products.total,
        "backend reachable"
    );
    Ok(())
}
