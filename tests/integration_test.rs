mod common;

use common::FakeBackend;
use product_catalog::config::CatalogConfig;
use product_catalog::lifecycle::CatalogSystem;
use product_catalog::model::Product;
use product_catalog::service::ImageUpload;
use product_catalog::view::mock::{RecordingNotifier, ScriptedConfirmer};
use product_catalog::view::{Confirmation, Outcome};
use std::sync::Arc;

fn product(id: &str, name: &str) -> Product {
    Product::builder()
        .id(id)
        .name(name)
        .description(format!("The {name}"))
        .price(4.5)
        .category("Hardware")
        .image_url(format!("/images/{id}.jpg"))
        .build()
}

async fn config_for(backend: &FakeBackend) -> CatalogConfig {
    CatalogConfig {
        base_url: backend.spawn().await,
        request_timeout_secs: 5,
        ..CatalogConfig::default()
    }
}

/// Full round trip: real actor, real HTTP client, in-memory backend.
#[tokio::test]
async fn test_catalog_crud_against_http_backend() {
    let backend = FakeBackend::with_products(vec![product("1", "Hammer"), product("2", "Wrench")]);
    let config = config_for(&backend).await;
    let notifier = RecordingNotifier::new();
    let confirmer = ScriptedConfirmer::new([Confirmation::Rejected, Confirmation::Accepted]);

    let system = CatalogSystem::connect(
        &config,
        Arc::new(notifier.clone()),
        Arc::new(confirmer.clone()),
    )
    .await
    .unwrap();
    let view = system.view.clone();

    // Initial load happened during startup
    let state = view.snapshot().await.unwrap();
    assert_eq!(state.products.len(), 2);

    // Create
    view.open_create().await.unwrap();
    view.set_create_draft(product("3", "Pliers")).await.unwrap();
    assert!(view.check_unique_id().await.unwrap());
    assert_eq!(view.create().await.unwrap(), Outcome::Applied);
    assert_eq!(backend.ids(), vec!["1", "2", "3"]);

    // Create with image
    view.open_create().await.unwrap();
    view.set_create_draft(product("4", "Saw")).await.unwrap();
    let file = ImageUpload::new("saw.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]);
    assert!(view.select_file(Some(file)).await.unwrap());
    assert_eq!(view.upload().await.unwrap(), Outcome::Applied);
    let state = view.snapshot().await.unwrap();
    let saw = state.products.iter().find(|p| p.id == "4").unwrap();
    assert_eq!(saw.image_url, "/images/saw.jpg");

    // Edit
    view.open_edit(product("2", "Wrench")).await.unwrap();
    view.set_edit_draft(product("2", "Torque Wrench")).await.unwrap();
    assert_eq!(view.update().await.unwrap(), Outcome::Applied);

    // Search
    assert_eq!(view.search("WRENCH").await.unwrap(), Outcome::Applied);
    let state = view.snapshot().await.unwrap();
    assert_eq!(state.products[0].name, "Torque Wrench");
    assert_eq!(state.products.len(), 4);

    // Delete: declined, then accepted
    assert!(matches!(
        view.confirm_delete("1").await.unwrap(),
        Outcome::Rejected(_)
    ));
    assert_eq!(backend.ids().len(), 4);
    assert_eq!(view.confirm_delete("1").await.unwrap(), Outcome::Applied);
    assert_eq!(backend.ids(), vec!["2", "3", "4"]);

    let state = view.snapshot().await.unwrap();
    let ids: Vec<_> = state.products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3", "4"]);

    assert_eq!(
        notifier.details(),
        vec![
            "Product created successfully",
            "Product created successfully",
            "Product updated successfully",
            "You have cancelled the deletion",
            "Product deleted successfully",
        ]
    );

    drop(view);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_acknowledged_without_record_keeps_edit() {
    let backend = FakeBackend::with_products(vec![product("1", "Hammer")]);
    backend.state.lock().unwrap().ack_writes = true;
    let config = config_for(&backend).await;
    let system = CatalogSystem::connect(
        &config,
        Arc::new(RecordingNotifier::new()),
        Arc::new(ScriptedConfirmer::default()),
    )
    .await
    .unwrap();

    system.view.open_edit(product("1", "Hammer")).await.unwrap();
    system
        .view
        .set_edit_draft(product("1", "Claw Hammer"))
        .await
        .unwrap();
    assert_eq!(system.view.update().await.unwrap(), Outcome::Applied);

    let state = system.view.snapshot().await.unwrap();
    assert_eq!(state.products, vec![product("1", "Claw Hammer")]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_startup_survives_failing_backend() {
    let backend = FakeBackend::with_products(vec![product("1", "Hammer")]);
    backend.state.lock().unwrap().failing = true;
    let config = config_for(&backend).await;
    let notifier = RecordingNotifier::new();

    let system = CatalogSystem::connect(
        &config,
        Arc::new(notifier.clone()),
        Arc::new(ScriptedConfirmer::default()),
    )
    .await
    .unwrap();

    assert!(system.view.snapshot().await.unwrap().products.is_empty());
    assert!(notifier.notifications().is_empty());

    backend.state.lock().unwrap().failing = false;
    assert_eq!(system.view.load().await.unwrap(), Outcome::Applied);
    assert_eq!(system.view.snapshot().await.unwrap().products.len(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_connect_rejects_invalid_base_url() {
    let config = CatalogConfig {
        base_url: "not a url".into(),
        ..CatalogConfig::default()
    };

    let result = CatalogSystem::connect(
        &config,
        Arc::new(RecordingNotifier::new()),
        Arc::new(ScriptedConfirmer::default()),
    )
    .await;

    assert!(result.is_err());
}
