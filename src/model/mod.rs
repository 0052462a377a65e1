//! Pure data structures shared by the service and view layers.

pub mod product;

pub use product::*;
