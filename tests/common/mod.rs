//! An in-memory product backend served over real HTTP, for exercising
//! `HttpProductService` end to end.
#![allow(dead_code)]

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use product_catalog::model::Product;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// What the backend received on its last upload.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub fields: HashMap<String, String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub image_len: usize,
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub products: Vec<Product>,
    pub last_upload: Option<ReceivedUpload>,
    pub last_search: Option<String>,
    /// Answer PUT with `204 No Content` instead of the stored record.
    pub empty_updates: bool,
    /// Answer POST and PUT with `{"message": ..}` instead of the record.
    pub ack_writes: bool,
    /// Answer every request with `500`.
    pub failing: bool,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    pub state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn with_products(products: Vec<Product>) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().products = products;
        backend
    }

    pub fn ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .products
            .iter()
            .map(|p| p.id.clone())
            .collect()
    }

    /// Serves the backend on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

fn router(backend: FakeBackend) -> Router {
    Router::new()
        .route("/api/product", get(list).post(create))
        .route("/api/product/search", get(search))
        .route("/api/product/upload", post(upload))
        .route(
            "/api/product/:id",
            get(get_by_id).put(update).delete(delete),
        )
        .with_state(backend)
}

fn guard(backend: &FakeBackend) -> Result<(), StatusCode> {
    if backend.state.lock().unwrap().failing {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

async fn list(State(backend): State<FakeBackend>) -> Result<Json<Vec<Product>>, StatusCode> {
    guard(&backend)?;
    Ok(Json(backend.state.lock().unwrap().products.clone()))
}

async fn get_by_id(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
) -> Result<Json<Product>, StatusCode> {
    guard(&backend)?;
    let state = backend.state.lock().unwrap();
    state
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create(
    State(backend): State<FakeBackend>,
    Json(product): Json<Product>,
) -> Result<axum::response::Response, StatusCode> {
    guard(&backend)?;
    let mut state = backend.state.lock().unwrap();
    if state.products.iter().any(|p| p.id == product.id) {
        return Err(StatusCode::CONFLICT);
    }
    state.products.push(product.clone());
    if state.ack_writes {
        return Ok(acknowledge("created").into_response());
    }
    Ok(Json(product).into_response())
}

fn acknowledge(message: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": message }))
}

async fn update(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    Json(product): Json<Product>,
) -> Result<axum::response::Response, StatusCode> {
    guard(&backend)?;
    let mut state = backend.state.lock().unwrap();
    let slot = state
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = product.clone();
    if state.empty_updates {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    if state.ack_writes {
        return Ok(acknowledge("updated").into_response());
    }
    Ok(Json(product).into_response())
}

async fn delete(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    guard(&backend)?;
    let mut state = backend.state.lock().unwrap();
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn search(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    guard(&backend)?;
    let term = params.get("q").cloned().unwrap_or_default();
    let mut state = backend.state.lock().unwrap();
    state.last_search = Some(term.clone());
    let matches = state
        .products
        .iter()
        .filter(|p| {
            [&p.name, &p.description, &p.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .cloned()
        .collect();
    Ok(Json(matches))
}

async fn upload(
    State(backend): State<FakeBackend>,
    mut multipart: Multipart,
) -> Result<Json<Product>, StatusCode> {
    guard(&backend)?;
    let mut received = ReceivedUpload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            received.file_name = field.file_name().map(str::to_string);
            received.content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            received.image_len = bytes.len();
        } else {
            let value = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            received.fields.insert(name, value);
        }
    }

    let field = |key: &str| received.fields.get(key).cloned().unwrap_or_default();
    let price = field("price")
        .parse::<f64>()
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let file_name = received.file_name.clone().ok_or(StatusCode::BAD_REQUEST)?;
    let product = Product::builder()
        .id(field("pId"))
        .name(field("name"))
        .description(field("description"))
        .price(price)
        .category(field("category"))
        .image_url(format!("/images/{file_name}"))
        .build();

    let mut state = backend.state.lock().unwrap();
    state.products.push(product.clone());
    state.last_upload = Some(received);
    Ok(Json(product))
}
