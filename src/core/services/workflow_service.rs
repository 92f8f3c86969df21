use crate::AppError;
use crate::api::client::StoryboardClient;
use crate::api::models::{GenerateResponse, ProgressStatus, Style, UploadResponse};
use crate::core::poller::{PollConfig, ProgressPoller};
use crate::error::StorageError;
use crate::utils::validation::{FileCandidate, FormField, validate_file, validate_required_fields};
use std::path::Path;

/// Upload -> generate -> processing, with client-side checks before each call
pub struct WorkflowService {
    client: StoryboardClient,
}

impl WorkflowService {
    pub fn new(client: StoryboardClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StoryboardClient {
        &self.client
    }

    /// Validate a screenplay on disk and upload it.
    ///
    /// Oversized or wrongly typed files are rejected before any request is made.
    pub async fn upload_screenplay(&self, path: &Path) -> Result<UploadResponse, AppError> {
        let io_error = |source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        };

        let candidate = FileCandidate::from_path(path).map_err(io_error)?;
        validate_file(&candidate)?;

        let bytes = tokio::fs::read(path).await.map_err(io_error)?;
        log::info!(
            "Uploading {} ({} bytes)",
            candidate.name,
            candidate.size
        );

        Ok(self.client.upload(&candidate.name, bytes).await?)
    }

    pub async fn start_generation(
        &self,
        project_id: &str,
        style: Style,
    ) -> Result<GenerateResponse, AppError> {
        validate_required_fields(&[FormField::new("project_id", project_id)])?;

        Ok(self.client.start_generation(project_id.trim(), style).await?)
    }

    pub async fn status(&self, project_id: &str) -> Result<ProgressStatus, AppError> {
        Ok(self.client.status(project_id).await?)
    }

    /// A poller for the project's status endpoint; grab its stop handle
    /// before calling `run`.
    pub fn watch(&self, project_id: &str, config: PollConfig) -> ProgressPoller<StoryboardClient> {
        ProgressPoller::new(
            self.client.clone(),
            StoryboardClient::status_endpoint(project_id),
            config,
        )
    }
}
