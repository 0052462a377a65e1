mod common;

use common::FakeBackend;
use product_catalog::config::CatalogConfig;
use product_catalog::model::Product;
use product_catalog::service::{HttpProductService, ImageUpload, ProductApi, ServiceError};

fn product(id: &str, name: &str, category: &str) -> Product {
    Product::builder()
        .id(id)
        .name(name)
        .description(format!("A {name}"))
        .price(19.99)
        .category(category)
        .image_url(format!("/images/{id}.png"))
        .build()
}

fn sample() -> Vec<Product> {
    vec![
        product("P1", "Widget", "Tools"),
        product("P2", "Gadget", "Toys"),
        product("P3", "Blue Widget", "Tools"),
    ]
}

async fn service_for(backend: &FakeBackend) -> HttpProductService {
    let config = CatalogConfig {
        base_url: backend.spawn().await,
        request_timeout_secs: 5,
        ..CatalogConfig::default()
    };
    HttpProductService::new(&config).unwrap()
}

#[tokio::test]
async fn test_list_returns_server_order() {
    let backend = FakeBackend::with_products(sample());
    let service = service_for(&backend).await;

    let products = service.list().await.unwrap();

    assert_eq!(products, sample());
}

#[tokio::test]
async fn test_get_by_id_found_and_missing() {
    let backend = FakeBackend::with_products(sample());
    let service = service_for(&backend).await;

    assert_eq!(service.get_by_id("P2").await.unwrap().name, "Gadget");

    let missing = service.get_by_id("nope").await.unwrap_err();
    assert_eq!(missing, ServiceError::NotFound("nope".into()));
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_create_posts_json_and_returns_record() {
    let backend = FakeBackend::default();
    let service = service_for(&backend).await;
    let draft = product("P9", "Sprocket", "Parts");

    let created = service.create(&draft).await.unwrap();

    assert_eq!(created, draft);
    assert_eq!(backend.ids(), vec!["P9"]);
}

#[tokio::test]
async fn test_create_conflict_surfaces_status() {
    let backend = FakeBackend::with_products(sample());
    let service = service_for(&backend).await;

    let err = service
        .create(&product("P1", "Again", "Tools"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Status { status: 409, .. }));
}

#[tokio::test]
async fn test_update_replaces_record() {
    let backend = FakeBackend::with_products(sample());
    let service = service_for(&backend).await;
    let edited = sample()[1].to_builder().price(5.0).build();

    let updated = service.update(&edited).await.unwrap();

    assert_eq!(updated, edited);
    assert_eq!(backend.state.lock().unwrap().products[1].price, 5.0);
}

#[tokio::test]
async fn test_update_with_empty_body_returns_submitted_record() {
    let backend = FakeBackend::with_products(sample());
    backend.state.lock().unwrap().empty_updates = true;
    let service = service_for(&backend).await;
    let edited = sample()[0].to_builder().name("Renamed").build();

    let updated = service.update(&edited).await.unwrap();

    assert_eq!(updated, edited);
}

#[tokio::test]
async fn test_update_acknowledgement_returns_submitted_record() {
    let backend = FakeBackend::with_products(sample());
    backend.state.lock().unwrap().ack_writes = true;
    let service = service_for(&backend).await;
    let edited = sample()[0].to_builder().name("Renamed").build();

    let updated = service.update(&edited).await.unwrap();

    assert_eq!(updated, edited);
    assert_eq!(backend.state.lock().unwrap().products[0].name, "Renamed");
}

#[tokio::test]
async fn test_create_acknowledgement_is_decode_error() {
    let backend = FakeBackend::default();
    backend.state.lock().unwrap().ack_writes = true;
    let service = service_for(&backend).await;

    let err = service.create(&sample()[0]).await.unwrap_err();

    assert!(matches!(err, ServiceError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn test_delete_removes_record() {
    let backend = FakeBackend::with_products(sample());
    let service = service_for(&backend).await;

    service.delete("P1").await.unwrap();

    assert_eq!(backend.ids(), vec!["P2", "P3"]);
    let again = service.delete("P1").await.unwrap_err();
    assert!(matches!(again, ServiceError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_search_sends_query_parameter() {
    let backend = FakeBackend::with_products(sample());
    let service = service_for(&backend).await;

    let matches = service.search("widget & co").await.unwrap();

    assert!(matches.is_empty());
    assert_eq!(
        backend.state.lock().unwrap().last_search.as_deref(),
        Some("widget & co")
    );

    let matches = service.search("widget").await.unwrap();
    let ids: Vec<_> = matches.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P3"]);
}

#[tokio::test]
async fn test_upload_sends_multipart_form() {
    let backend = FakeBackend::default();
    let service = service_for(&backend).await;
    let draft = product("P7", "Gizmo", "Tools");
    let image = ImageUpload::new("gizmo.png", "image/png", vec![1u8; 64]);

    let created = service.upload(&draft, &image).await.unwrap();

    assert_eq!(created.id, "P7");
    assert_eq!(created.image_url, "/images/gizmo.png");
    assert_eq!(created.price, 19.99);

    let received = backend.state.lock().unwrap().last_upload.clone().unwrap();
    assert_eq!(received.fields["pId"], "P7");
    assert_eq!(received.fields["name"], "Gizmo");
    assert_eq!(received.fields["description"], "A Gizmo");
    assert_eq!(received.fields["price"], "19.99");
    assert_eq!(received.fields["category"], "Tools");
    assert_eq!(received.file_name.as_deref(), Some("gizmo.png"));
    assert_eq!(received.content_type.as_deref(), Some("image/png"));
    assert_eq!(received.image_len, 64);
}

#[tokio::test]
async fn test_upload_with_bad_content_type_is_invalid_request() {
    let backend = FakeBackend::default();
    let service = service_for(&backend).await;
    let image = ImageUpload::new("gizmo.png", "not a mime type", vec![1u8]);

    let err = service
        .upload(&product("P7", "Gizmo", "Tools"), &image)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidRequest(_)));
    assert!(backend.ids().is_empty());
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let backend = FakeBackend::with_products(sample());
    backend.state.lock().unwrap().failing = true;
    let service = service_for(&backend).await;

    let err = service.list().await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Status {
            status: 500,
            path: "/api/product".into()
        }
    );
}
