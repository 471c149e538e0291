//! Query cache binding.
//!
//! List and detail reads go through a shared in-memory cache keyed by
//! `"{entity}:{page}:{filter fingerprint}"` (lists) or `"{entity}:id:{id}"`
//! (details). Mutations invalidate the owning entity's list family and
//! overwrite the detail entry with the row the mutation returned, so detail
//! views are consistent immediately while lists refetch on next read.
//!
//! No optimistic updates; consistency is invalidate-and-refetch.

use std::time::Duration;

use moka::future::Cache;

use sidra_core::{
    Banner, BlogPost, Branch, Category, ComboOffer, GalleryImage, Order, Page, Product, Profile,
    Testimonial,
};

use crate::stats::{DashboardStats, OrderStats};

/// Cached reads expire after five minutes even without invalidation.
const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Upper bound on cached entries.
const CACHE_CAPACITY: u64 = 1024;

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
    Order(Box<Order>),
    Orders(Page<Order>),
    OrderStats(OrderStats),
    Dashboard(DashboardStats),
    Post(Box<BlogPost>),
    Posts(Page<BlogPost>),
    Banners(Page<Banner>),
    Combos(Page<ComboOffer>),
    Testimonials(Page<Testimonial>),
    Branches(Page<Branch>),
    Gallery(Page<GalleryImage>),
    Profiles(Page<Profile>),
    Categories(Vec<Category>),
}

/// Shared query cache for the dashboard's read paths.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<String, CacheValue>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        let inner = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .support_invalidation_closures()
            .build();
        Self { inner }
    }

    pub async fn get(&self, key: &str) -> Option<CacheValue> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: String, value: CacheValue) {
        self.inner.insert(key, value).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Drop every entry belonging to one entity's list family, e.g.
    /// `invalidate_entity("products")` removes all cached product pages but
    /// leaves detail entries (which mutations overwrite directly) alone
    /// unless they are invalidated explicitly.
    pub fn invalidate_entity(&self, entity: &str) {
        let prefix = format!("{entity}:");
        if let Err(err) = self
            .inner
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!(error = %err, "cache invalidation failed");
        }
    }

    /// Drop everything.
    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Run pending invalidation tasks (tests and shutdown paths).
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

/// Cache key for one list page: entity, page number, page size, and the
/// filter fingerprint produced by the resource's filter type.
#[must_use]
pub fn list_key(entity: &str, page: u32, per_page: u32, fingerprint: &str) -> String {
    format!("{entity}:p{page}:n{per_page}:{fingerprint}")
}

/// Cache key for one detail row.
#[must_use]
pub fn detail_key(entity: &str, id: uuid::Uuid) -> String {
    format!("{entity}:id:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = QueryCache::new();
        let key = list_key("products", 1, 10, "-");
        cache
            .insert(key.clone(), CacheValue::Products(Page::empty()))
            .await;

        assert!(matches!(
            cache.get(&key).await,
            Some(CacheValue::Products(_))
        ));
    }

    #[tokio::test]
    async fn test_invalidate_entity_drops_list_family() {
        let cache = QueryCache::new();
        cache
            .insert(
                list_key("orders", 1, 10, "-"),
                CacheValue::Orders(Page::empty()),
            )
            .await;
        cache
            .insert(
                list_key("orders", 2, 10, "status=paid"),
                CacheValue::Orders(Page::empty()),
            )
            .await;
        cache
            .insert(
                list_key("products", 1, 10, "-"),
                CacheValue::Products(Page::empty()),
            )
            .await;

        cache.invalidate_entity("orders");
        cache.sync().await;

        assert!(cache.get(&list_key("orders", 1, 10, "-")).await.is_none());
        assert!(
            cache
                .get(&list_key("orders", 2, 10, "status=paid"))
                .await
                .is_none()
        );
        assert!(
            cache
                .get(&list_key("products", 1, 10, "-"))
                .await
                .is_some()
        );
    }

    #[test]
    fn test_key_shapes() {
        let id = Uuid::nil();
        assert_eq!(
            list_key("banners", 3, 20, "active=true"),
            "banners:p3:n20:active=true"
        );
        assert_eq!(
            detail_key("product", id),
            format!("product:id:{id}")
        );
    }
}
