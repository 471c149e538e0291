//! Dashboard summary statistics.
//!
//! The home screen batches its independent reads concurrently and degrades
//! each failed read to zero/empty with a logged warning rather than failing
//! the whole summary. Operators see "no data" with the error in the logs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sidra_core::{Order, OrderStatus};

use crate::resources::{orders, products, users};
use crate::supabase::{SupabaseClient, SupabaseError};

/// How many orders the dashboard previews.
const LATEST_ORDERS: u64 = 5;

/// Per-status order counts plus gross revenue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderStats {
    pub total: u64,
    pub pending: u64,
    pub paid: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
    /// Sum of `total_price` over non-cancelled orders.
    pub revenue: Decimal,
}

#[derive(Debug, Deserialize)]
struct TotalPriceRow {
    total_price: Decimal,
}

impl OrderStats {
    /// Count orders per status and sum revenue, all in one concurrent batch.
    ///
    /// # Errors
    ///
    /// Returns the first failing query's error.
    pub(crate) async fn load(client: &SupabaseClient) -> Result<Self, SupabaseError> {
        let count = |status: OrderStatus| {
            client
                .table(orders::TABLE)
                .eq("status", status)
                .count()
        };
        // Revenue needs the raw rows; the REST layer has no aggregate endpoint.
        let revenue_rows = client
            .table(orders::TABLE)
            .select("total_price")
            .neq("status", OrderStatus::Cancelled)
            .fetch::<TotalPriceRow>();

        let (pending, paid, shipped, delivered, cancelled, rows) = tokio::try_join!(
            count(OrderStatus::Pending),
            count(OrderStatus::Paid),
            count(OrderStatus::Shipped),
            count(OrderStatus::Delivered),
            count(OrderStatus::Cancelled),
            revenue_rows,
        )?;

        let revenue = rows.iter().map(|row| row.total_price).sum();

        Ok(Self {
            total: pending + paid + shipped + delivered + cancelled,
            pending,
            paid,
            shipped,
            delivered,
            cancelled,
            revenue,
        })
    }
}

/// The dashboard home summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub orders: OrderStats,
    pub products: u64,
    pub users: u64,
    pub latest_orders: Vec<Order>,
}

/// Fetch the summary, batching the independent reads concurrently.
///
/// Each part degrades to its default on failure; the failure is logged, not
/// propagated, so a broken stats query never blanks the whole dashboard.
pub(crate) async fn load_dashboard(client: &SupabaseClient) -> DashboardStats {
    let order_stats = OrderStats::load(client);
    let product_count = client.table(products::TABLE).count();
    let user_count = client.table(users::TABLE).count();
    let latest = client
        .table(orders::TABLE)
        .order_desc("created_at")
        .limit(LATEST_ORDERS)
        .fetch::<Order>();

    let (order_stats, product_count, user_count, latest) =
        tokio::join!(order_stats, product_count, user_count, latest);

    DashboardStats {
        orders: order_stats.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "order stats unavailable, showing zeros");
            OrderStats::default()
        }),
        products: product_count.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "product count unavailable, showing zero");
            0
        }),
        users: user_count.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "user count unavailable, showing zero");
            0
        }),
        latest_orders: latest.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "latest orders unavailable, showing none");
            Vec::new()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_zeroed() {
        let stats = OrderStats::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.revenue, Decimal::ZERO);
    }

    #[test]
    fn test_dashboard_default_is_empty() {
        let dashboard = DashboardStats::default();
        assert!(dashboard.latest_orders.is_empty());
        assert_eq!(dashboard.products, 0);
    }
}
