//! Storage upload and cascade-deletion behavior against a live backend.
//!
//! Run with: `cargo test -p sidra-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sidra_admin::resources::CreateProduct;
use sidra_integration_tests::{test_data, test_name};

/// Smallest valid PNG (1x1, transparent).
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_uploaded_image_is_publicly_retrievable() {
    let data = test_data();

    let url = data
        .products()
        .upload_image("itest.png", TINY_PNG.to_vec(), "image/png")
        .await
        .unwrap();

    let response = reqwest::get(&url).await.unwrap();
    assert!(response.status().is_success());

    // Cleanup through the parsed public URL
    let (bucket, path) = data.client().object_from_public_url(&url).unwrap();
    data.client().remove_object(&bucket, &path).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_data_url_upload_round_trip() {
    use base64::Engine as _;

    let data = test_data();
    let payload = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(TINY_PNG)
    );

    let url = data
        .client()
        .upload_data_url("gallery", "", &payload)
        .await
        .unwrap();
    assert!(url.ends_with(".png"));

    let response = reqwest::get(&url).await.unwrap();
    assert!(response.status().is_success());

    let (bucket, path) = data.client().object_from_public_url(&url).unwrap();
    data.client().remove_object(&bucket, &path).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_product_delete_removes_its_images() {
    let data = test_data();
    let name = test_name("product");

    let image_url = data
        .products()
        .upload_image("itest.png", TINY_PNG.to_vec(), "image/png")
        .await
        .unwrap();

    let created = data
        .products()
        .create(CreateProduct {
            title: name.clone(),
            name_ar: format!("منتج {name}"),
            name_en: format!("Product {name}"),
            description_ar: "وصف".to_string(),
            description_en: "desc".to_string(),
            price: Decimal::from(100),
            offer_price: None,
            stock_quantity: 1,
            image_urls: vec![image_url.clone()],
            category_id: None,
            is_best_seller: false,
            is_limited_offer: false,
        })
        .await
        .unwrap();

    data.products().delete(created.id).await.unwrap();

    // Best-effort cascade already ran; the object is gone
    let response = reqwest::get(&image_url).await.unwrap();
    assert!(!response.status().is_success());
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_foreign_image_url_does_not_block_deletion() {
    let data = test_data();
    let name = test_name("product");

    // A URL outside the project's storage cannot be parsed back to a path;
    // deletion must still succeed
    let created = data
        .products()
        .create(CreateProduct {
            title: name.clone(),
            name_ar: format!("منتج {name}"),
            name_en: format!("Product {name}"),
            description_ar: "وصف".to_string(),
            description_en: "desc".to_string(),
            price: Decimal::from(100),
            offer_price: None,
            stock_quantity: 1,
            image_urls: vec!["https://cdn.example.com/external.png".to_string()],
            category_id: None,
            is_best_seller: false,
            is_limited_offer: false,
        })
        .await
        .unwrap();

    data.products().delete(created.id).await.unwrap();

    let err = data.products().get(created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "Requires a live backend project and SUPABASE_* credentials"]
async fn test_gallery_add_then_delete_cleans_object() {
    let data = test_data();

    let image = data
        .galleries()
        .add(
            "itest.png",
            TINY_PNG.to_vec(),
            "image/png",
            Some("لقطة تجريبية".to_string()),
            Some("Test shot".to_string()),
        )
        .await
        .unwrap();

    let response = reqwest::get(&image.image_url).await.unwrap();
    assert!(response.status().is_success());

    data.galleries().delete(image.id).await.unwrap();

    let response = reqwest::get(&image.image_url).await.unwrap();
    assert!(!response.status().is_success());
}
