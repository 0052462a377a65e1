//! # View Messages
//!
//! [`ViewRequest`] is what a [`ViewClient`](crate::view::ViewClient) sends to the actor;
//! each variant carries a oneshot sender for the reply. [`Completion`] is what the
//! actor's own spawned service calls send back to it.

use crate::model::Product;
use crate::service::{ImageUpload, ServiceError};
use crate::view::flight::WriteSlot;
use crate::view::state::{Reconcile, ViewState};
use tokio::sync::oneshot;

/// One-shot reply channel used by every request.
pub type Response<T> = oneshot::Sender<T>;

/// Why a request was refused before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The create draft's id is already in the loaded collection.
    DuplicateId(String),
    /// Required fields are missing; lists them in form order.
    IncompleteForm(Vec<&'static str>),
    /// Create-with-image was requested without a selected file.
    MissingFile,
    /// The user declined the confirmation prompt.
    Declined,
    /// Update was requested with no edit draft.
    NothingToUpdate,
    /// The same kind of write is already pending.
    InFlight,
}

/// How a mutating request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The request succeeded and the view state reflects it.
    Applied,
    /// The backend call failed; state was left as it was.
    Failed(ServiceError),
    /// Refused client-side; no backend call was made.
    Rejected(Rejection),
    /// A newer refresh was issued before this one returned; its result was dropped.
    Superseded,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Requests handled by the [`ViewActor`](crate::view::ViewActor).
#[derive(Debug)]
pub enum ViewRequest {
    Load {
        respond_to: Response<Outcome>,
    },
    Search {
        text: String,
        respond_to: Response<Outcome>,
    },
    OpenCreate {
        respond_to: Response<()>,
    },
    CloseCreate {
        respond_to: Response<()>,
    },
    SetCreateDraft {
        draft: Product,
        respond_to: Response<()>,
    },
    ResetCreateDraft {
        respond_to: Response<()>,
    },
    CheckUniqueId {
        respond_to: Response<bool>,
    },
    ValidateForm {
        respond_to: Response<bool>,
    },
    SelectFile {
        file: Option<ImageUpload>,
        respond_to: Response<bool>,
    },
    Create {
        respond_to: Response<Outcome>,
    },
    Upload {
        respond_to: Response<Outcome>,
    },
    OpenEdit {
        product: Product,
        respond_to: Response<()>,
    },
    CloseEdit {
        respond_to: Response<()>,
    },
    SetEditDraft {
        draft: Product,
        respond_to: Response<()>,
    },
    Update {
        respond_to: Response<Outcome>,
    },
    ConfirmDelete {
        id: String,
        respond_to: Response<Outcome>,
    },
    Snapshot {
        respond_to: Response<ViewState>,
    },
}

#[derive(Debug)]
pub(crate) enum RefreshKind {
    Load,
    Search { term: String },
}

/// What to do once a refresh lands.
#[derive(Debug)]
pub(crate) enum Followup {
    /// Reply with the refresh's own outcome.
    Reply(Response<Outcome>),
    /// The refresh follows a confirmed write: re-apply it and report the write as applied.
    AfterWrite {
        change: Reconcile,
        respond_to: Response<Outcome>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CreateVia {
    Json,
    Upload,
}

/// Results of service calls, routed back onto the actor's loop.
#[derive(Debug)]
pub(crate) enum Completion {
    Refreshed {
        generation: u64,
        kind: RefreshKind,
        result: Result<Vec<Product>, ServiceError>,
        followup: Followup,
    },
    Created {
        via: CreateVia,
        result: Result<Product, ServiceError>,
        respond_to: Response<Outcome>,
    },
    Updated {
        draft: Product,
        result: Result<Product, ServiceError>,
        respond_to: Response<Outcome>,
    },
    Deleted {
        id: String,
        result: Result<(), ServiceError>,
        respond_to: Response<Outcome>,
    },
    DeleteDeclined {
        id: String,
        respond_to: Response<Outcome>,
    },
    /// The spawned call panicked; its reply channel is gone with it.
    Aborted {
        slot: Option<WriteSlot>,
        reason: String,
    },
}
