//! Product create/read/update/delete round trips against a live backend.
//!
//! Run with: `cargo test -p sidra-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sidra_admin::resources::{CreateProduct, ProductFilters, UpdateProduct};
use sidra_core::PageRequest;
use sidra_integration_tests::{test_data, test_name};

fn sample_product(name: &str) -> CreateProduct {
    CreateProduct {
        title: name.to_string(),
        name_ar: format!("منتج {name}"),
        name_en: format!("Product {name}"),
        description_ar: "وصف تجريبي".to_string(),
        description_en: "Integration test fixture".to_string(),
        price: Decimal::from(100),
        offer_price: Some(Decimal::from(80)),
        stock_quantity: 3,
        image_urls: vec![],
        category_id: None,
        is_best_seller: false,
        is_limited_offer: false,
    }
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_create_then_read_back_equals_submission() {
    let data = test_data();
    let name = test_name("product");

    let created = data.products().create(sample_product(&name)).await.unwrap();
    assert_eq!(created.title, name);
    assert_eq!(created.price, Decimal::from(100));
    assert_eq!(created.offer_price, Some(Decimal::from(80)));
    assert_eq!(created.price_label(), "80$ (100$)");

    let fetched = data.products().get(created.id).await.unwrap();
    assert_eq!(fetched.name_ar, created.name_ar);
    assert_eq!(fetched.name_en, created.name_en);
    assert_eq!(fetched.stock_quantity, 3);
    // Server-assigned fields exist
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.created_at, created.created_at);

    data.products().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_partial_update_leaves_omitted_fields_unchanged() {
    let data = test_data();
    let created = data
        .products()
        .create(sample_product(&test_name("product")))
        .await
        .unwrap();

    let updated = data
        .products()
        .update(
            created.id,
            UpdateProduct {
                price: Some(Decimal::from(120)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.price, Decimal::from(120));
    // Everything omitted from the payload is untouched
    assert_eq!(updated.name_ar, created.name_ar);
    assert_eq!(updated.offer_price, created.offer_price);
    assert_eq!(updated.stock_quantity, created.stock_quantity);

    data.products().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_delete_makes_get_fail_localized() {
    let data = test_data();
    let created = data
        .products()
        .create(sample_product(&test_name("product")))
        .await
        .unwrap();

    data.products().delete(created.id).await.unwrap();

    let err = data.products().get(created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), sidra_admin::messages::PRODUCT_NOT_FOUND);

    // Deleting again is a no-op, not an error
    data.products().delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_best_seller_toggle_is_visible_in_filtered_list() {
    let data = test_data();
    let created = data
        .products()
        .create(sample_product(&test_name("product")))
        .await
        .unwrap();

    data.products()
        .set_best_seller(created.id, true)
        .await
        .unwrap();

    let filters = ProductFilters {
        best_seller: Some(true),
        ..Default::default()
    };
    let page = data
        .products()
        .list(PageRequest::new(1, 50), &filters)
        .await
        .unwrap();
    assert!(page.items.iter().any(|p| p.id == created.id));

    data.products().delete(created.id).await.unwrap();
}
