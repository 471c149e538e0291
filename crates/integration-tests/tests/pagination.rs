//! Pagination totals against a live backend, including the orders
//! free-text-search edge case whose totals intentionally diverge.
//!
//! Run with: `cargo test -p sidra-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sidra_admin::resources::{CreateProduct, OrderFilters, ProductFilters};
use sidra_core::PageRequest;
use sidra_integration_tests::{test_data, test_name};

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_total_counts_all_matches_beyond_the_page() {
    let data = test_data();
    let marker = test_name("page");

    // Three products sharing a searchable marker, page size two
    let mut created = Vec::new();
    for i in 0..3 {
        created.push(
            data.products()
                .create(CreateProduct {
                    title: format!("{marker}-{i}"),
                    name_ar: format!("منتج {marker}"),
                    name_en: format!("Product {marker}"),
                    description_ar: "وصف".to_string(),
                    description_en: "desc".to_string(),
                    price: Decimal::from(10),
                    offer_price: None,
                    stock_quantity: 1,
                    image_urls: vec![],
                    category_id: None,
                    is_best_seller: false,
                    is_limited_offer: false,
                })
                .await
                .unwrap(),
        );
    }

    let filters = ProductFilters {
        search: Some(marker.clone()),
        ..Default::default()
    };
    let first = data
        .products()
        .list(PageRequest::new(1, 2), &filters)
        .await
        .unwrap();

    // The page holds two rows but the total covers all three
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.total, 3);

    let second = data
        .products()
        .list(PageRequest::new(2, 2), &filters)
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.total, 3);

    for product in created {
        data.products().delete(product.id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_orders_search_total_reflects_only_the_filtered_page() {
    use sidra_admin::resources::CreateOrder;

    let data = test_data();
    let name = test_name("order");

    let created = data
        .orders()
        .create(CreateOrder {
            user_id: None,
            guest_name: Some(name.clone()),
            guest_phone: Some("0500000000".to_string()),
            guest_email: None,
            guest_address: None,
            total_price: Decimal::from(10),
            items: vec![],
        })
        .await
        .unwrap();

    // Without a term: total is the server-side count across all pages
    let plain = data
        .orders()
        .list(PageRequest::new(1, 5), &OrderFilters::default())
        .await
        .unwrap();
    assert!(plain.total >= 1);

    // With a term: the filter runs client-side on the fetched page, so the
    // total collapses to the surviving rows of this page. This asserts the
    // current behavior, totals are NOT comparable across the two modes.
    let searched = data
        .orders()
        .list(
            PageRequest::new(1, 50),
            &OrderFilters {
                search: Some(name.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(searched.total, searched.items.len() as u64);
    assert!(searched.items.iter().any(|o| o.id == created.id));

    data.orders().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_out_of_range_page_is_empty_with_stable_total() {
    let data = test_data();

    let far = data
        .products()
        .list(PageRequest::new(10_000, 50), &ProductFilters::default())
        .await
        .unwrap();
    assert!(far.items.is_empty());
}
