//! # ProductApi Trait
//!
//! The data-access seam between the view and the backend. The view only ever holds
//! an `Arc<dyn ProductApi>`, so production code plugs in
//! [`HttpProductService`](crate::service::HttpProductService) and tests plug in
//! [`MockProductApi`](crate::service::mock::MockProductApi).

use crate::model::Product;
use crate::service::ServiceError;
use async_trait::async_trait;

/// A binary attachment for [`ProductApi::upload`].
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

// Bytes can be megabytes; log the size instead.
impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Logical operations on the product resource.
///
/// Every call is a single request: no retries, no caching.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetches every product, in server order.
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;

    /// Fetches one product. Fails with [`ServiceError::NotFound`] on a 404.
    async fn get_by_id(&self, id: &str) -> Result<Product, ServiceError>;

    /// Submits a new product and returns the server's representation of it.
    async fn create(&self, draft: &Product) -> Result<Product, ServiceError>;

    /// Replaces the product identified by `product.id`.
    async fn update(&self, product: &Product) -> Result<Product, ServiceError>;

    /// Removes a product.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;

    /// Server-side free-text filter. Callers handle blank terms themselves.
    async fn search(&self, term: &str) -> Result<Vec<Product>, ServiceError>;

    /// Creates a product from the draft's fields plus one image attachment.
    async fn upload(&self, draft: &Product, image: &ImageUpload) -> Result<Product, ServiceError>;
}
