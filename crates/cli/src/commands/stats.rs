//! Dashboard summary command.

use sidra_admin::{DataError, SidraData};

/// Print the dashboard summary counts.
///
/// # Errors
///
/// Returns the localized error when configuration is missing; individual
/// stat failures degrade to zeros (matching the dashboard).
pub async fn run() -> Result<(), DataError> {
    let data = SidraData::from_env()?;
    let stats = data.dashboard_stats().await;

    tracing::info!(
        orders = stats.orders.total,
        pending = stats.orders.pending,
        paid = stats.orders.paid,
        shipped = stats.orders.shipped,
        delivered = stats.orders.delivered,
        cancelled = stats.orders.cancelled,
        revenue = %stats.orders.revenue,
        products = stats.products,
        users = stats.users,
        "dashboard summary"
    );

    for order in &stats.latest_orders {
        tracing::info!(
            id = %order.id,
            status = %order.status,
            total = %order.total_price,
            customer = %order.customer_display_name(),
            "latest order"
        );
    }
    Ok(())
}
