use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
///
/// # Wire Format
/// The backend speaks camelCase JSON and names the identifier `pId`:
///
/// ```json
/// { "pId": "p-1", "name": "Widget", "description": "A widget", "price": 9.5,
///   "imageUrl": "/img/widget.png", "category": "tools" }
/// ```
///
/// Deserialization also accepts `id`, and any missing key falls back to its empty
/// value, so every record the server hands back normalizes into a full `Product`.
///
/// # Drafts
/// A draft is just a `Product` that has not been persisted yet. Drafts are never
/// edited in place: build a fresh value with [`Product::builder`] or
/// [`Product::to_builder`] and replace the old one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(rename = "pId", alias = "id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
}

impl Product {
    /// Starts building a product from empty fields.
    pub fn builder() -> ProductBuilder {
        ProductBuilder::default()
    }

    /// Starts building a new product seeded with this product's fields.
    pub fn to_builder(&self) -> ProductBuilder {
        ProductBuilder {
            inner: self.clone(),
        }
    }

    /// An all-empty draft, as shown when the create dialog opens.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Names of the required fields that fail validation, in form order.
    ///
    /// # Rules
    /// - `id`, `name`, `description`, `category`, `image_url` must be non-empty after trimming
    /// - `price` must be strictly positive (NaN fails)
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = self.missing_upload_fields();
        if self.image_url.trim().is_empty() {
            missing.push("image_url");
        }
        missing
    }

    /// Like [`missing_fields`](Self::missing_fields), minus `image_url`: on the
    /// create-with-image form the selected file stands in for it.
    pub fn missing_upload_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.trim().is_empty() {
            missing.push("id");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.price.is_nan() || self.price <= 0.0 {
            missing.push("price");
        }
        if self.category.trim().is_empty() {
            missing.push("category");
        }
        missing
    }

    /// Whether this product is valid for a JSON create.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Whether this product is valid for a create-with-image submission.
    pub fn is_complete_for_upload(&self) -> bool {
        self.missing_upload_fields().is_empty()
    }
}

/// Fluent builder producing immutable [`Product`] values.
///
/// ```rust
/// use product_catalog::model::Product;
///
/// let draft = Product::builder()
///     .id("p-1")
///     .name("Widget")
///     .description("A very small widget")
///     .price(9.5)
///     .category("tools")
///     .build();
/// assert!(draft.is_complete_for_upload());
/// assert!(!draft.is_complete());
///
/// let renamed = draft.to_builder().name("Gadget").build();
/// assert_eq!(draft.name, "Widget");
/// assert_eq!(renamed.name, "Gadget");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductBuilder {
    inner: Product,
}

impl ProductBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.inner.id = id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.inner.price = price;
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.inner.image_url = image_url.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.inner.category = category.into();
        self
    }

    pub fn build(self) -> Product {
        self.inner
    }
}
