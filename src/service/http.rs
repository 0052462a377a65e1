//! # HTTP Product Service
//!
//! [`HttpProductService`] is the production [`ProductApi`]: each logical operation
//! becomes exactly one request against the product resource root
//! (`<base_url>/api/product`).
//!
//! | Operation | Method | Path | Body |
//! |-----------|--------|------|------|
//! | `list` | GET | `/` | none |
//! | `get_by_id` | GET | `/{id}` | none |
//! | `create` | POST | `/` | JSON product |
//! | `update` | PUT | `/{id}` | JSON product |
//! | `delete` | DELETE | `/{id}` | none |
//! | `search` | GET | `/search?q={term}` | none |
//! | `upload` | POST | `/upload` | multipart form |

use crate::config::CatalogConfig;
use crate::model::Product;
use crate::service::{ImageUpload, ProductApi, ServiceError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// REST client for the product backend.
#[derive(Clone, Debug)]
pub struct HttpProductService {
    client: Client,
    root: Url,
}

impl HttpProductService {
    /// Builds a client with the configured timeout.
    pub fn new(config: &CatalogConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Self::with_client(client, &config.resource_root())
    }

    /// Uses an existing `reqwest::Client` against an explicit resource root.
    pub fn with_client(client: Client, resource_root: &str) -> Result<Self, ServiceError> {
        let root = Url::parse(resource_root)
            .map_err(|e| ServiceError::InvalidRequest(format!("{resource_root}: {e}")))?;
        if root.cannot_be_a_base() {
            return Err(ServiceError::InvalidRequest(format!(
                "{resource_root}: not a base URL"
            )));
        }
        Ok(Self { client, root })
    }

    pub fn resource_root(&self) -> &Url {
        &self.root
    }

    /// Appends one percent-encoded path segment to the resource root.
    fn url_for(&self, segment: &str) -> Result<Url, ServiceError> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidRequest(format!("{}: not a base URL", self.root)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<Response, ServiceError> {
        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "Request failed");
            ServiceError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Non-success status");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        debug!(path, status = status.as_u16(), "Request ok");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    /// Decodes a single product. A record without an id is not a product: JSON
    /// objects that merely acknowledge the request would otherwise default into one.
    async fn decode_product(response: Response) -> Result<Product, ServiceError> {
        let product: Product = Self::decode(response).await?;
        if product.id.trim().is_empty() {
            return Err(ServiceError::Decode("response record has no pId".to_string()));
        }
        Ok(product)
    }

    /// Reads the answer to a write of `submitted`. The body is only an echo: if it is
    /// empty (e.g. `204 No Content`) or is not that same record, `submitted` stands.
    async fn decode_echo(response: Response, submitted: &Product) -> Result<Product, ServiceError> {
        let body = response.bytes().await?;
        match serde_json::from_slice::<Product>(&body) {
            Ok(echo) if echo.id == submitted.id => Ok(echo),
            _ => {
                debug!(id = %submitted.id, len = body.len(), "No record echoed, keeping submitted value");
                Ok(submitted.clone())
            }
        }
    }
}

#[async_trait]
impl ProductApi for HttpProductService {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let url = self.root.clone();
        debug!(%url, "GET");
        let response = self.execute(self.client.get(url.clone()), url.path()).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Product, ServiceError> {
        let url = self.url_for(id)?;
        debug!(%url, "GET");
        match self.execute(self.client.get(url.clone()), url.path()).await {
            Ok(response) => Self::decode_product(response).await,
            Err(ServiceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ServiceError::NotFound(id.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, draft), fields(id = %draft.id))]
    async fn create(&self, draft: &Product) -> Result<Product, ServiceError> {
        let url = self.root.clone();
        debug!(?draft, "POST");
        let response = self
            .execute(self.client.post(url.clone()).json(draft), url.path())
            .await?;
        Self::decode_product(response).await
    }

    #[instrument(skip(self, product), fields(id = %product.id))]
    async fn update(&self, product: &Product) -> Result<Product, ServiceError> {
        let url = self.url_for(&product.id)?;
        debug!(?product, "PUT");
        let response = self
            .execute(self.client.put(url.clone()).json(product), url.path())
            .await?;
        Self::decode_echo(response, product).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.url_for(id)?;
        debug!(%url, "DELETE");
        self.execute(self.client.delete(url.clone()), url.path())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(&self, term: &str) -> Result<Vec<Product>, ServiceError> {
        let url = self.url_for("search")?;
        debug!(%url, term, "GET");
        let response = self
            .execute(self.client.get(url.clone()).query(&[("q", term)]), url.path())
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, draft, image), fields(id = %draft.id, file = %image.file_name))]
    async fn upload(&self, draft: &Product, image: &ImageUpload) -> Result<Product, ServiceError> {
        let url = self.url_for("upload")?;
        debug!(?draft, ?image, "POST multipart");

        let image_part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new()
            .text("pId", draft.id.clone())
            .text("name", draft.name.clone())
            .text("description", draft.description.clone())
            .text("price", draft.price.to_string())
            .text("category", draft.category.clone())
            .part("image", image_part);

        let response = self
            .execute(self.client.post(url.clone()).multipart(form), url.path())
            .await?;
        Self::decode_product(response).await
    }
}
