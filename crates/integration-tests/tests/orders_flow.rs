//! Order lifecycle against a live backend: guest checkout, the status
//! protocol, cache consistency, and stats movement.
//!
//! Run with: `cargo test -p sidra-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sidra_admin::resources::{CreateOrder, OrderFilters};
use sidra_core::{OrderStatus, PageRequest};
use sidra_integration_tests::{test_data, test_name};

fn guest_order(name: &str) -> CreateOrder {
    CreateOrder {
        user_id: None,
        guest_name: Some(name.to_string()),
        guest_phone: Some("0501234567".to_string()),
        guest_email: None,
        guest_address: Some("Test street 1".to_string()),
        total_price: Decimal::from(150),
        items: vec![],
    }
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_guest_checkout_round_trip() {
    let data = test_data();
    let name = test_name("order");

    let created = data.orders().create(guest_order(&name)).await.unwrap();
    assert!(created.is_guest());
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.customer_display_name(), name);

    data.orders().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_order_without_identity_is_rejected_before_write() {
    let data = test_data();

    let err = data.orders().create(CreateOrder::default()).await.unwrap_err();
    assert_eq!(err.to_string(), sidra_admin::messages::ORDER_IDENTITY);
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_status_update_reflected_in_detail_and_list_caches() {
    let data = test_data();
    let created = data
        .orders()
        .create(guest_order(&test_name("order")))
        .await
        .unwrap();

    // Warm both caches
    let _ = data.orders().get(created.id).await.unwrap();
    let filters = OrderFilters {
        status: Some(OrderStatus::Paid),
        ..Default::default()
    };
    let before = data
        .orders()
        .list(PageRequest::new(1, 50), &filters)
        .await
        .unwrap();
    assert!(!before.items.iter().any(|o| o.id == created.id));

    let updated = data
        .orders()
        .update_status(created.id, OrderStatus::Paid)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Paid);

    // Detail cache was overwritten with the fresh row
    let detail = data.orders().get(created.id).await.unwrap();
    assert_eq!(detail.status, OrderStatus::Paid);

    // List cache was invalidated, the refetch sees the new status
    let after = data
        .orders()
        .list(PageRequest::new(1, 50), &filters)
        .await
        .unwrap();
    assert!(after.items.iter().any(|o| o.id == created.id));

    data.orders().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_stats_shift_after_status_change() {
    let data = test_data();
    let created = data
        .orders()
        .create(guest_order(&test_name("order")))
        .await
        .unwrap();

    let before = data.orders().stats().await.unwrap();

    data.orders()
        .update_status(created.id, OrderStatus::Paid)
        .await
        .unwrap();

    // The mutation invalidated the stats cache; the next fetch recounts
    let after = data.orders().stats().await.unwrap();
    assert_eq!(after.paid, before.paid + 1);
    assert_eq!(after.pending, before.pending - 1);
    assert_eq!(after.total, before.total);

    data.orders().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_update_status_of_missing_order_is_not_found() {
    let data = test_data();

    let err = data
        .orders()
        .update_status(uuid::Uuid::new_v4(), OrderStatus::Paid)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), sidra_admin::messages::ORDER_NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_deleted_order_reads_as_absent_not_error() {
    let data = test_data();
    let created = data
        .orders()
        .create(guest_order(&test_name("order")))
        .await
        .unwrap();

    data.orders().delete(created.id).await.unwrap();

    assert!(!data.orders().exists(created.id).await.unwrap());
}
