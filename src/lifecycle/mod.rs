//! Startup, shutdown, and logging setup for the catalog.

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use self::tracing::setup_tracing;
