use crate::model::Product;
use crate::service::ImageUpload;
use crate::view::error::ViewError;
use crate::view::message::{Outcome, Response, ViewRequest};
use crate::view::state::ViewState;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Handle for driving a running [`ViewActor`](crate::view::ViewActor).
///
/// Cheap to clone. The actor stops once every clone is dropped and its in-flight
/// service calls have landed.
#[derive(Clone)]
pub struct ViewClient {
    sender: mpsc::Sender<ViewRequest>,
}

impl ViewClient {
    pub fn new(sender: mpsc::Sender<ViewRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> ViewRequest,
    ) -> Result<T, ViewError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ViewError::ActorClosed)?;
        response.await.map_err(|_| ViewError::ActorDropped)
    }

    /// Replaces the displayed collection with the server's full list.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Outcome, ViewError> {
        debug!("Sending request");
        self.request(|respond_to| ViewRequest::Load { respond_to })
            .await
    }

    /// Searches the server and puts the matches ahead of the known collection.
    ///
    /// Blank text reloads the full list instead.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> Result<Outcome, ViewError> {
        let text = text.to_string();
        self.request(|respond_to| ViewRequest::Search { text, respond_to })
            .await
    }

    pub async fn open_create(&self) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::OpenCreate { respond_to })
            .await
    }

    pub async fn close_create(&self) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::CloseCreate { respond_to })
            .await
    }

    /// Stores the create form's current contents.
    pub async fn set_create_draft(&self, draft: Product) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::SetCreateDraft { draft, respond_to })
            .await
    }

    pub async fn reset_create_draft(&self) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::ResetCreateDraft { respond_to })
            .await
    }

    /// Checks the draft id against the loaded collection, then field completeness.
    ///
    /// A duplicate id notifies the user; missing fields do not.
    pub async fn check_unique_id(&self) -> Result<bool, ViewError> {
        self.request(|respond_to| ViewRequest::CheckUniqueId { respond_to })
            .await
    }

    /// Recomputes `form_valid` from the create draft. Never notifies.
    pub async fn validate_form(&self) -> Result<bool, ViewError> {
        self.request(|respond_to| ViewRequest::ValidateForm { respond_to })
            .await
    }

    /// Records (or clears) the image for create-with-image and revalidates the form.
    #[instrument(skip(self, file), fields(file = ?file.as_ref().map(|f| f.file_name.as_str())))]
    pub async fn select_file(&self, file: Option<ImageUpload>) -> Result<bool, ViewError> {
        self.request(|respond_to| ViewRequest::SelectFile { file, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn create(&self) -> Result<Outcome, ViewError> {
        debug!("Sending request");
        self.request(|respond_to| ViewRequest::Create { respond_to })
            .await
    }

    /// Creates the draft product together with the selected image.
    #[instrument(skip(self))]
    pub async fn upload(&self) -> Result<Outcome, ViewError> {
        debug!("Sending request");
        self.request(|respond_to| ViewRequest::Upload { respond_to })
            .await
    }

    /// Opens the edit dialog on a copy of `product`.
    pub async fn open_edit(&self, product: Product) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::OpenEdit { product, respond_to })
            .await
    }

    pub async fn close_edit(&self) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::CloseEdit { respond_to })
            .await
    }

    pub async fn set_edit_draft(&self, draft: Product) -> Result<(), ViewError> {
        self.request(|respond_to| ViewRequest::SetEditDraft { draft, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update(&self) -> Result<Outcome, ViewError> {
        debug!("Sending request");
        self.request(|respond_to| ViewRequest::Update { respond_to })
            .await
    }

    /// Asks the user to confirm, then deletes `id` if they accept.
    #[instrument(skip(self))]
    pub async fn confirm_delete(&self, id: &str) -> Result<Outcome, ViewError> {
        let id = id.to_string();
        self.request(|respond_to| ViewRequest::ConfirmDelete { id, respond_to })
            .await
    }

    /// A copy of the current view state.
    pub async fn snapshot(&self) -> Result<ViewState, ViewError> {
        self.request(|respond_to| ViewRequest::Snapshot { respond_to })
            .await
    }
}
