//! The product screen: state, controller actor, and the handle used to drive it.
//!
//! - [`ViewActor`] / [`ViewClient`] - the event loop and its cloneable handle
//! - [`ViewState`] - what the screen renders
//! - [`Notifier`] / [`Confirmer`] - how the view reaches the user
//! - [`mock`] - recording doubles for tests

pub mod actor;
pub mod client;
pub mod collaborators;
pub mod error;
mod flight;
pub mod message;
pub mod mock;
pub mod state;

pub use actor::*;
pub use client::*;
pub use collaborators::*;
pub use error::*;
pub use message::{Outcome, Rejection, Response, ViewRequest};
pub use state::*;
