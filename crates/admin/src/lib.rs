//! Sidra Admin - Data-access layer for the admin dashboard.
//!
//! Everything the dashboard shows or edits lives in a hosted backend
//! (relational tables behind a PostgREST-style REST interface, plus storage
//! buckets for images). This crate is the layer between that backend and
//! the dashboard views:
//!
//! - [`supabase`] - the typed backend client (REST reads/writes, storage)
//! - [`resources`] - one access module per entity (products, orders, blog,
//!   banners, combo offers, testimonials, branches, gallery, users,
//!   categories)
//! - [`cache`] - the shared query cache with per-entity invalidation
//! - [`stats`] - the dashboard summary, batched concurrently
//!
//! Errors shown to operators are Arabic; raw backend errors are logged at
//! the boundary and never surface (see [`messages`] and [`DataError`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use sidra_admin::SidraData;
//! use sidra_core::PageRequest;
//!
//! let data = SidraData::from_env()?;
//!
//! let page = data
//!     .products()
//!     .list(PageRequest::new(1, 10), &Default::default())
//!     .await?;
//!
//! let stats = data.dashboard_stats().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod messages;
pub mod resources;
pub mod stats;
pub mod supabase;

pub use config::{ConfigError, SupabaseConfig};
pub use error::{DataError, DataResult};
pub use stats::{DashboardStats, OrderStats};

use cache::{CacheValue, QueryCache};
use resources::{
    Banners, Blog, Branches, Categories, Combos, Galleries, Orders, Products, Testimonials, Users,
};
use supabase::SupabaseClient;

/// Cache key for the dashboard summary.
const DASHBOARD_KEY: &str = "stats:dashboard";

/// The dashboard's data root: one backend client plus the shared query
/// cache, with a handle per entity.
///
/// Constructed explicitly and passed to whatever hosts the dashboard; there
/// is no global instance. Cloning is cheap and shares both the client and
/// the cache.
#[derive(Debug, Clone)]
pub struct SidraData {
    client: SupabaseClient,
    cache: QueryCache,
}

impl SidraData {
    /// Build from an explicit config.
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if the client cannot be built.
    pub fn new(config: &SupabaseConfig) -> DataResult<Self> {
        let client = SupabaseClient::new(config).map_err(|err| {
            tracing::error!(error = %err, "backend client construction failed");
            DataError::Connectivity { source: None }
        })?;
        Ok(Self::with_client(client))
    }

    /// Build from environment variables (`SUPABASE_URL`,
    /// `SUPABASE_ANON_KEY`).
    ///
    /// # Errors
    ///
    /// Missing or invalid variables surface as a connectivity error with
    /// the localized message; the process keeps running.
    pub fn from_env() -> DataResult<Self> {
        let config = SupabaseConfig::from_env()?;
        Self::new(&config)
    }

    /// Wrap an existing client (tests, alternate construction).
    #[must_use]
    pub fn with_client(client: SupabaseClient) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
        }
    }

    /// The underlying backend client.
    #[must_use]
    pub const fn client(&self) -> &SupabaseClient {
        &self.client
    }

    /// The shared query cache.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn blog(&self) -> Blog<'_> {
        Blog::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn banners(&self) -> Banners<'_> {
        Banners::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn combos(&self) -> Combos<'_> {
        Combos::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn testimonials(&self) -> Testimonials<'_> {
        Testimonials::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn branches(&self) -> Branches<'_> {
        Branches::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn galleries(&self) -> Galleries<'_> {
        Galleries::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn users(&self) -> Users<'_> {
        Users::new(&self.client, &self.cache)
    }

    #[must_use]
    pub const fn categories(&self) -> Categories<'_> {
        Categories::new(&self.client, &self.cache)
    }

    /// The dashboard home summary, cached and batched.
    ///
    /// Never fails: each part degrades to zero/empty with the failure
    /// logged, so the dashboard renders regardless.
    pub async fn dashboard_stats(&self) -> DashboardStats {
        if let Some(CacheValue::Dashboard(stats)) = self.cache.get(DASHBOARD_KEY).await {
            return stats;
        }

        let stats = stats::load_dashboard(&self.client).await;
        self.cache
            .insert(DASHBOARD_KEY.to_string(), CacheValue::Dashboard(stats.clone()))
            .await;
        stats
    }
}
