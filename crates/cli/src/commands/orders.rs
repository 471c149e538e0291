//! Order inspection commands.

use sidra_admin::resources::OrderFilters;
use sidra_admin::{DataError, SidraData};
use sidra_core::{OrderStatus, PageRequest};
use thiserror::Error;

/// Errors specific to order commands.
#[derive(Debug, Error)]
pub enum OrdersCliError {
    /// The status argument is not a known status.
    #[error("Invalid status: {0}. Valid: pending, paid, shipped, delivered, cancelled")]
    InvalidStatus(String),

    /// The data layer failed.
    #[error(transparent)]
    Data(#[from] DataError),
}

/// List one page of orders.
///
/// # Errors
///
/// Returns `InvalidStatus` for an unknown status string and the localized
/// data-layer error otherwise.
pub async fn list(
    status: Option<&str>,
    page: u32,
    per_page: u32,
    query: Option<String>,
) -> Result<(), OrdersCliError> {
    let status = status
        .map(|raw| {
            raw.parse::<OrderStatus>()
                .map_err(|_| OrdersCliError::InvalidStatus(raw.to_owned()))
        })
        .transpose()?;

    let data = SidraData::from_env()?;
    let filters = OrderFilters {
        status,
        search: query,
        ..Default::default()
    };
    let result = data
        .orders()
        .list(PageRequest::new(page, per_page), &filters)
        .await?;

    tracing::info!(page, total = result.total, "orders page");
    for order in &result.items {
        tracing::info!(
            id = %order.id,
            status = %order.status,
            total = %order.total_price,
            customer = %order.customer_display_name(),
            guest = order.is_guest(),
            created_at = %order.created_at,
            "order"
        );
    }
    Ok(())
}
