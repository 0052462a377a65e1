//! # View Actor
//!
//! [`ViewActor`] is the product screen's controller. It owns the [`ViewState`] and is the
//! only thing that ever mutates it, one message at a time, on its own task. That task
//! is the screen's event loop.
//!
//! ## Request flow
//!
//! ```text
//! ViewClient --ViewRequest--> ViewActor --spawn--> ProductApi call
//!                                 ^                     |
//!                                 +-----Completion------+
//! ```
//!
//! Service calls never run on the loop itself. They are spawned, and their results
//! come back as [`Completion`] messages, so a slow request never holds up other user
//! actions and every state change still happens on the loop.
//!
//! ## Writes
//!
//! Every confirmed write (create, upload, update, delete) is reconciled into the local
//! collection right away and followed by a full reload. When the reload lands, the
//! write is applied over it again, so a record the server just confirmed is shown
//! exactly once even if the reload raced with it or failed.
//!
//! ## Overlapping requests
//!
//! See [`flight`](crate::view::flight): refreshes are generation-tokened (latest wins),
//! writes are single-flight.

use crate::model::Product;
use crate::service::{ProductApi, ServiceError};
use crate::view::client::ViewClient;
use crate::view::collaborators::{ConfirmPrompt, Confirmation, Confirmer, Notification, Notifier};
use crate::view::flight::{FlightTracker, WriteSlot};
use crate::view::message::{
    Completion, CreateVia, Followup, Outcome, RefreshKind, Rejection, Response, ViewRequest,
};
use crate::view::state::{merge_search_results, DialogState, Reconcile, ViewState};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Behavior switches for the view.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Capacity of the request channel.
    pub channel_capacity: usize,
    /// Notify the user when a list load fails, instead of only logging it.
    pub notify_on_load_failure: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
            notify_on_load_failure: false,
        }
    }
}

impl From<&crate::config::CatalogConfig> for ViewOptions {
    fn from(config: &crate::config::CatalogConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
            notify_on_load_failure: config.notify_on_load_failure,
        }
    }
}

/// Dependencies injected into a running [`ViewActor`].
#[derive(Clone)]
pub struct ViewContext {
    pub api: Arc<dyn ProductApi>,
    pub notifier: Arc<dyn Notifier>,
    pub confirmer: Arc<dyn Confirmer>,
}

impl ViewContext {
    pub fn new(
        api: Arc<dyn ProductApi>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            api,
            notifier,
            confirmer,
        }
    }
}

/// The actor owning the product screen's state.
///
/// # Usage
///
/// ```rust
/// use product_catalog::service::mock::MockProductApi;
/// use product_catalog::view::mock::{RecordingNotifier, ScriptedConfirmer};
/// use product_catalog::view::{ViewActor, ViewContext, ViewOptions};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let api = MockProductApi::new();
///     api.expect_list().return_ok(vec![]);
///
///     // 1. Create
///     let (actor, view) = ViewActor::new(ViewOptions::default());
///
///     // 2. Wire & run
///     let context = ViewContext::new(
///         Arc::new(api.clone()),
///         Arc::new(RecordingNotifier::new()),
///         Arc::new(ScriptedConfirmer::default()),
///     );
///     let handle = tokio::spawn(actor.run(context));
///
///     // 3. Use
///     assert!(view.load().await.unwrap().is_applied());
///
///     drop(view);
///     handle.await.unwrap();
/// }
/// ```
pub struct ViewActor {
    receiver: mpsc::Receiver<ViewRequest>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    state: ViewState,
    flights: FlightTracker,
    options: ViewOptions,
}

impl ViewActor {
    /// Creates the actor and the client used to drive it.
    pub fn new(options: ViewOptions) -> (Self, ViewClient) {
        let (sender, receiver) = mpsc::channel(options.channel_capacity.max(1));
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            completion_tx,
            completion_rx,
            state: ViewState::default(),
            flights: FlightTracker::default(),
            options,
        };
        (actor, ViewClient::new(sender))
    }

    /// Runs the event loop until every client is dropped and in-flight calls have landed.
    pub async fn run(mut self, context: ViewContext) {
        info!("View actor started");
        let mut accepting = true;

        loop {
            tokio::select! {
                biased;
                Some(completion) = self.completion_rx.recv() => {
                    self.flights.task_finished();
                    self.on_completion(completion, &context);
                }
                request = self.receiver.recv(), if accepting => match request {
                    Some(request) => self.on_request(request, &context),
                    None => {
                        debug!("All view clients dropped");
                        accepting = false;
                    }
                },
                else => break,
            }

            if !accepting && self.flights.is_idle() {
                break;
            }
        }

        info!(products = self.state.products.len(), "View actor shutdown");
    }

    /// Runs `call` off the loop and routes its [`Completion`] back.
    ///
    /// `slot` is the write guard the call holds, if any. A call that panics still
    /// reports back (as [`Completion::Aborted`]) so the slot is released and the
    /// outstanding count drops.
    fn spawn<F>(&mut self, slot: Option<WriteSlot>, call: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.flights.task_started();
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let completion = match tokio::spawn(call).await {
                Ok(completion) => completion,
                Err(e) => Completion::Aborted {
                    slot,
                    reason: e.to_string(),
                },
            };
            let _ = completion_tx.send(completion);
        });
    }

    // =========================================================================
    // Requests
    // =========================================================================

    fn on_request(&mut self, request: ViewRequest, ctx: &ViewContext) {
        match request {
            ViewRequest::Load { respond_to } => {
                self.refresh(RefreshKind::Load, Followup::Reply(respond_to), ctx);
            }
            ViewRequest::Search { text, respond_to } => {
                let term = text.trim().to_lowercase();
                self.state.search_text = text;
                let kind = if term.is_empty() {
                    RefreshKind::Load
                } else {
                    RefreshKind::Search { term }
                };
                self.refresh(kind, Followup::Reply(respond_to), ctx);
            }
            ViewRequest::OpenCreate { respond_to } => {
                debug!("Opening create dialog");
                self.state.reset_create_form();
                self.state.create_dialog = DialogState::Open;
                let _ = respond_to.send(());
            }
            ViewRequest::CloseCreate { respond_to } => {
                self.state.create_dialog = DialogState::Closed;
                let _ = respond_to.send(());
            }
            ViewRequest::SetCreateDraft { draft, respond_to } => {
                self.state.create_draft = draft;
                let _ = respond_to.send(());
            }
            ViewRequest::ResetCreateDraft { respond_to } => {
                self.state.reset_create_form();
                let _ = respond_to.send(());
            }
            ViewRequest::CheckUniqueId { respond_to } => {
                let valid = self.check_unique_id(ctx);
                let _ = respond_to.send(valid);
            }
            ViewRequest::ValidateForm { respond_to } => {
                let valid = self.validate_form();
                let _ = respond_to.send(valid);
            }
            ViewRequest::SelectFile { file, respond_to } => {
                self.state.selected_file = file;
                let valid = self.validate_upload_form(ctx);
                let _ = respond_to.send(valid);
            }
            ViewRequest::Create { respond_to } => self.create(respond_to, ctx),
            ViewRequest::Upload { respond_to } => self.upload(respond_to, ctx),
            ViewRequest::OpenEdit { product, respond_to } => {
                debug!(id = %product.id, "Opening edit dialog");
                self.state.edit_draft = Some(product);
                self.state.edit_dialog = DialogState::Open;
                let _ = respond_to.send(());
            }
            ViewRequest::CloseEdit { respond_to } => {
                self.close_edit();
                let _ = respond_to.send(());
            }
            ViewRequest::SetEditDraft { draft, respond_to } => {
                self.state.edit_draft = Some(draft);
                let _ = respond_to.send(());
            }
            ViewRequest::Update { respond_to } => self.update(respond_to, ctx),
            ViewRequest::ConfirmDelete { id, respond_to } => {
                self.confirm_delete(id, respond_to, ctx)
            }
            ViewRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.state.clone());
            }
        }
    }

    fn refresh(&mut self, kind: RefreshKind, followup: Followup, ctx: &ViewContext) {
        let generation = self.flights.next_refresh();
        debug!(generation, ?kind, "Refreshing products");
        let api = ctx.api.clone();
        self.spawn(None, async move {
            let result = match &kind {
                RefreshKind::Load => api.list().await,
                RefreshKind::Search { term } => api.search(term).await,
            };
            Completion::Refreshed {
                generation,
                kind,
                result,
                followup,
            }
        });
    }

    /// Duplicate-id pre-check, then field completeness.
    fn check_unique_id(&mut self, ctx: &ViewContext) -> bool {
        let id = &self.state.create_draft.id;
        if self.state.contains_id(id) {
            warn!(%id, "Duplicate product id");
            ctx.notifier.notify(Notification::error("ID already exists"));
            self.state.form_valid = false;
            return false;
        }
        self.validate_form()
    }

    fn validate_form(&mut self) -> bool {
        self.state.form_valid = self.state.create_draft.is_complete();
        self.state.form_valid
    }

    /// Completeness check for the create-with-image form: fields plus a file.
    /// The file stands in for `image_url`.
    fn validate_upload_form(&mut self, ctx: &ViewContext) -> bool {
        self.state.form_valid = self.state.create_draft.is_complete_for_upload()
            && self.state.selected_file.is_some();
        if !self.state.form_valid {
            ctx.notifier.notify(Notification::error("All fields are required"));
        }
        self.state.form_valid
    }

    /// Runs the create-form checks, notifying the user on the first failure.
    fn vet_create_draft(&mut self, via: CreateVia, ctx: &ViewContext) -> Result<(), Rejection> {
        let draft = &self.state.create_draft;
        if self.state.contains_id(&draft.id) {
            let id = draft.id.clone();
            ctx.notifier.notify(Notification::error("ID already exists"));
            self.state.form_valid = false;
            return Err(Rejection::DuplicateId(id));
        }
        let missing = match via {
            CreateVia::Json => draft.missing_fields(),
            CreateVia::Upload => draft.missing_upload_fields(),
        };
        if !missing.is_empty() {
            ctx.notifier.notify(Notification::error("All fields are required"));
            self.state.form_valid = false;
            return Err(Rejection::IncompleteForm(missing));
        }
        self.state.form_valid = true;
        Ok(())
    }

    fn create(&mut self, respond_to: Response<Outcome>, ctx: &ViewContext) {
        if let Err(rejection) = self.vet_create_draft(CreateVia::Json, ctx) {
            let _ = respond_to.send(Outcome::Rejected(rejection));
            return;
        }
        if !self.flights.try_claim(WriteSlot::Create) {
            debug!("Create already in flight");
            let _ = respond_to.send(Outcome::Rejected(Rejection::InFlight));
            return;
        }

        let draft = self.state.create_draft.clone();
        info!(id = %draft.id, "Creating product");
        let api = ctx.api.clone();
        self.spawn(Some(WriteSlot::Create), async move {
            let result = api.create(&draft).await;
            Completion::Created {
                via: CreateVia::Json,
                result,
                respond_to,
            }
        });
    }

    fn upload(&mut self, respond_to: Response<Outcome>, ctx: &ViewContext) {
        let Some(file) = self.state.selected_file.clone() else {
            ctx.notifier
                .notify(Notification::error("Please select an image to upload"));
            let _ = respond_to.send(Outcome::Rejected(Rejection::MissingFile));
            return;
        };
        if let Err(rejection) = self.vet_create_draft(CreateVia::Upload, ctx) {
            let _ = respond_to.send(Outcome::Rejected(rejection));
            return;
        }
        if !self.flights.try_claim(WriteSlot::Create) {
            debug!("Create already in flight");
            let _ = respond_to.send(Outcome::Rejected(Rejection::InFlight));
            return;
        }

        let draft = self.state.create_draft.clone();
        info!(id = %draft.id, file = %file.file_name, "Uploading product");
        let api = ctx.api.clone();
        self.spawn(Some(WriteSlot::Create), async move {
            let result = api.upload(&draft, &file).await;
            Completion::Created {
                via: CreateVia::Upload,
                result,
                respond_to,
            }
        });
    }

    fn close_edit(&mut self) {
        self.state.edit_dialog = DialogState::Closed;
        self.state.edit_draft = None;
    }

    fn update(&mut self, respond_to: Response<Outcome>, ctx: &ViewContext) {
        let Some(draft) = self.state.edit_draft.clone() else {
            let _ = respond_to.send(Outcome::Rejected(Rejection::NothingToUpdate));
            return;
        };
        if !self.flights.try_claim(WriteSlot::Update) {
            debug!("Update already in flight");
            let _ = respond_to.send(Outcome::Rejected(Rejection::InFlight));
            return;
        }

        info!(id = %draft.id, "Updating product");
        let api = ctx.api.clone();
        self.spawn(Some(WriteSlot::Update), async move {
            let result = api.update(&draft).await;
            Completion::Updated {
                draft,
                result,
                respond_to,
            }
        });
    }

    fn confirm_delete(&mut self, id: String, respond_to: Response<Outcome>, ctx: &ViewContext) {
        if !self.flights.try_claim(WriteSlot::Delete(id.clone())) {
            debug!(%id, "Delete already in flight");
            let _ = respond_to.send(Outcome::Rejected(Rejection::InFlight));
            return;
        }

        let api = ctx.api.clone();
        let confirmer = ctx.confirmer.clone();
        let slot = WriteSlot::Delete(id.clone());
        self.spawn(Some(slot), async move {
            match confirmer.confirm(ConfirmPrompt::delete_product()).await {
                Confirmation::Rejected => Completion::DeleteDeclined { id, respond_to },
                Confirmation::Accepted => {
                    let result = api.delete(&id).await;
                    Completion::Deleted {
                        id,
                        result,
                        respond_to,
                    }
                }
            }
        });
    }

    // =========================================================================
    // Completions
    // =========================================================================

    fn on_completion(&mut self, completion: Completion, ctx: &ViewContext) {
        match completion {
            Completion::Refreshed {
                generation,
                kind,
                result,
                followup,
            } => self.on_refreshed(generation, kind, result, followup, ctx),
            Completion::Created {
                via,
                result,
                respond_to,
            } => {
                self.flights.release(&WriteSlot::Create);
                match result {
                    Ok(product) => {
                        info!(id = %product.id, ?via, "Product created");
                        self.state.create_dialog = DialogState::Closed;
                        self.state.reset_create_form();
                        ctx.notifier
                            .notify(Notification::success("Product created successfully"));
                        self.after_write(Reconcile::Upsert(product), respond_to, ctx);
                    }
                    Err(e) => {
                        error!(error = %e, ?via, "Error creating product");
                        ctx.notifier.notify(Notification::error("Error creating product"));
                        let _ = respond_to.send(Outcome::Failed(e));
                    }
                }
            }
            Completion::Updated {
                draft,
                result,
                respond_to,
            } => {
                self.flights.release(&WriteSlot::Update);
                match result {
                    Ok(returned) => {
                        // Only trust the echo if it is the record that was sent.
                        let product = if returned.id == draft.id {
                            returned
                        } else {
                            warn!(id = %draft.id, returned = %returned.id, "Update echoed another record");
                            draft
                        };
                        info!(id = %product.id, "Product updated");
                        self.close_edit();
                        ctx.notifier
                            .notify(Notification::success("Product updated successfully"));
                        self.after_write(Reconcile::Upsert(product), respond_to, ctx);
                    }
                    Err(e) => {
                        error!(error = %e, "Error updating product");
                        ctx.notifier.notify(Notification::error("Error updating product"));
                        let _ = respond_to.send(Outcome::Failed(e));
                    }
                }
            }
            Completion::Deleted {
                id,
                result,
                respond_to,
            } => {
                self.flights.release(&WriteSlot::Delete(id.clone()));
                match result {
                    Ok(()) => {
                        info!(%id, "Product deleted");
                        ctx.notifier
                            .notify(Notification::success("Product deleted successfully"));
                        self.after_write(Reconcile::Remove(id), respond_to, ctx);
                    }
                    Err(e) => {
                        error!(%id, error = %e, "Error deleting product");
                        ctx.notifier.notify(Notification::error("Error deleting product"));
                        let _ = respond_to.send(Outcome::Failed(e));
                    }
                }
            }
            Completion::DeleteDeclined { id, respond_to } => {
                self.flights.release(&WriteSlot::Delete(id.clone()));
                info!(%id, "Delete cancelled by user");
                ctx.notifier.notify(Notification::info(
                    "Cancelled",
                    "You have cancelled the deletion",
                ));
                let _ = respond_to.send(Outcome::Rejected(Rejection::Declined));
            }
            Completion::Aborted { slot, reason } => {
                error!(?slot, %reason, "Service task aborted");
                let Some(slot) = slot else {
                    return;
                };
                self.flights.release(&slot);
                let detail = match slot {
                    WriteSlot::Create => "Error creating product",
                    WriteSlot::Update => "Error updating product",
                    WriteSlot::Delete(_) => "Error deleting product",
                };
                ctx.notifier.notify(Notification::error(detail));
            }
        }
    }

    /// Reflects a confirmed write locally, then reloads from the server.
    fn after_write(&mut self, change: Reconcile, respond_to: Response<Outcome>, ctx: &ViewContext) {
        self.state.apply(&change);
        self.refresh(
            RefreshKind::Load,
            Followup::AfterWrite { change, respond_to },
            ctx,
        );
    }

    fn on_refreshed(
        &mut self,
        generation: u64,
        kind: RefreshKind,
        result: Result<Vec<Product>, ServiceError>,
        followup: Followup,
        ctx: &ViewContext,
    ) {
        if !self.flights.is_current_refresh(generation) {
            debug!(generation, ?kind, "Discarding stale refresh");
            match followup {
                Followup::Reply(respond_to) => {
                    let _ = respond_to.send(Outcome::Superseded);
                }
                Followup::AfterWrite { change, respond_to } => {
                    self.state.apply(&change);
                    let _ = respond_to.send(Outcome::Applied);
                }
            }
            return;
        }

        let outcome = match result {
            Ok(products) => {
                self.state.products = match &kind {
                    RefreshKind::Load => products,
                    RefreshKind::Search { .. } => {
                        merge_search_results(products, &self.state.products)
                    }
                };
                info!(count = self.state.products.len(), ?kind, "Loaded products");
                Outcome::Applied
            }
            Err(e) => {
                match &kind {
                    RefreshKind::Load => {
                        error!(error = %e, "Error fetching products");
                        if self.options.notify_on_load_failure {
                            ctx.notifier.notify(Notification::error("Error loading products"));
                        }
                    }
                    RefreshKind::Search { term } => {
                        error!(%term, error = %e, "Error searching products");
                        ctx.notifier
                            .notify(Notification::error("Error searching products"));
                    }
                }
                Outcome::Failed(e)
            }
        };

        match followup {
            Followup::Reply(respond_to) => {
                let _ = respond_to.send(outcome);
            }
            Followup::AfterWrite { change, respond_to } => {
                self.state.apply(&change);
                let _ = respond_to.send(Outcome::Applied);
            }
        }
    }
}
