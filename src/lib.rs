//! # Product Catalog
//!
//! A headless product-catalog front end: the state and behavior of a product screen
//! (list, search, create, create-with-image, edit, delete) driving a REST backend.
//!
//! ## Architecture
//!
//! ```text
//! ViewClient ──► ViewActor (owns ViewState) ──► ProductApi ──► HTTP backend
//!                    │
//!                    ├─► Notifier   (toasts)
//!                    └─► Confirmer  (delete prompt)
//! ```
//!
//! ### 1. Actor-owned state
//! The screen's state lives inside one [`ViewActor`](view::ViewActor) and is mutated
//! only by its message loop. Service calls run on spawned tasks and report back to the
//! loop, so slow requests never block other user actions.
//!
//! ### 2. Context injection
//! The service and the user-facing collaborators are injected at
//! [`run`](view::ViewActor::run) time as a [`ViewContext`](view::ViewContext). Tests
//! swap in [`MockProductApi`](service::mock::MockProductApi) and the recording doubles
//! from [`view::mock`].
//!
//! ### 3. Typed errors
//! Each layer has its own `thiserror` enum: [`ServiceError`](service::ServiceError),
//! [`ViewError`](view::ViewError), [`ConfigError`](config::ConfigError),
//! [`SystemError`](lifecycle::SystemError).
//!
//! ## Module Tour
//!
//! - [`model`] - the [`Product`](model::Product) record and its validation
//! - [`service`] - the [`ProductApi`](service::ProductApi) trait and its HTTP implementation
//! - [`view`] - view state, the controller actor, and its client
//! - [`config`] - defaults, JSON file, environment overrides
//! - [`lifecycle`] - [`CatalogSystem`](lifecycle::CatalogSystem) and tracing setup
//!
//! ## Running the Demo
//!
//! ```bash
//! CATALOG_BASE_URL=http://localhost:5000 RUST_LOG=info cargo run -- "phone"
//! ```

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod view;
