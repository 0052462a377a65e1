//! Data access for the product resource.
//!
//! - [`ProductApi`] - the async trait the view depends on
//! - [`HttpProductService`] - the reqwest implementation
//! - [`ServiceError`] - everything that can go wrong with a request
//! - [`mock`] - an expectation-driven double for tests

pub mod api;
pub mod error;
pub mod http;
pub mod mock;

pub use api::*;
pub use error::*;
pub use http::*;
