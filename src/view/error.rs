//! # View Errors
//!
//! Failures of the channel between a [`ViewClient`](crate::view::ViewClient) and its
//! actor. Service failures are not errors at this level; they come back as
//! [`Outcome::Failed`](crate::view::Outcome::Failed).

/// Errors that can occur while talking to the view actor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("View actor closed")]
    ActorClosed,
    #[error("View actor dropped response channel")]
    ActorDropped,
}
