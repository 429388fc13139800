use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::FileUpload;
use crate::backend::FileBackend;
use crate::registry::FileRegistry;

/// Outcome of the last user-triggered operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Success(String),
    Error(String),
}

impl Feedback {
    pub fn text(&self) -> Option<&str> {
        match self {
            Feedback::None => None,
            Feedback::Success(t) | Feedback::Error(t) => Some(t),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Feedback::Error(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
}

/// Flips the upload state back to idle however the upload ends
struct UploadGuard<'a>(&'a watch::Sender<UploadState>);

impl<'a> UploadGuard<'a> {
    fn enter(state: &'a watch::Sender<UploadState>) -> Self {
        state.send_replace(UploadState::Uploading);
        Self(state)
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(UploadState::Idle);
    }
}

/// Keeps a local registry in step with the file service.
///
/// Every successful mutation is followed by a full re-list; the registry is
/// never patched locally. Failures never escape an operation, they land in
/// [`Feedback`] and leave the registry as it was.
pub struct FileRegistryClient<B> {
    backend: B,
    registry: FileRegistry,
    feedback: Feedback,
    upload_state: watch::Sender<UploadState>,
}

impl<B: FileBackend> FileRegistryClient<B> {
    pub fn new(backend: B) -> Self {
        let (upload_state, _) = watch::channel(UploadState::Idle);
        Self {
            backend,
            registry: FileRegistry::new(),
            feedback: Feedback::None,
            upload_state,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn upload_state(&self) -> UploadState {
        *self.upload_state.borrow()
    }

    /// Watch upload state changes, e.g. to disable a picker while one is in flight
    pub fn subscribe_upload_state(&self) -> watch::Receiver<UploadState> {
        self.upload_state.subscribe()
    }

    /// Surface a failure that happened before any request went out
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.feedback = Feedback::Error(message.into());
    }

    /// Replace the registry with the server's current listing
    pub async fn list(&mut self) {
        self.feedback = Feedback::None;
        refresh(&self.backend, &mut self.registry, &mut self.feedback).await;
    }

    /// Send one file, then re-list on success
    pub async fn upload(&mut self, file: FileUpload) {
        self.feedback = Feedback::None;
        let _uploading = UploadGuard::enter(&self.upload_state);

        info!("uploading {} ({} bytes)", file.name, file.len());
        match self.backend.upload_file(&file).await {
            Ok(receipt) => {
                info!("uploaded {}", receipt.filename);
                self.feedback = Feedback::Success(format!(
                    "File \"{}\" uploaded successfully",
                    receipt.filename
                ));
                refresh(&self.backend, &mut self.registry, &mut self.feedback).await;
            }
            Err(e) => {
                warn!("upload of {} failed: {}", file.name, e);
                self.feedback = Feedback::Error(e.user_message("Upload failed"));
            }
        }
    }

    /// Delete one file by its server name, then re-list on success
    pub async fn delete(&mut self, filename: &str) {
        self.feedback = Feedback::None;

        info!("deleting {}", filename);
        match self.backend.delete_file(filename).await {
            Ok(()) => {
                self.feedback =
                    Feedback::Success(format!("File \"{}\" deleted successfully", filename));
                refresh(&self.backend, &mut self.registry, &mut self.feedback).await;
            }
            Err(e) => {
                warn!("delete of {} failed: {}", filename, e);
                self.feedback = Feedback::Error(e.user_message("Delete failed"));
            }
        }
    }
}

async fn refresh<B: FileBackend>(backend: &B, registry: &mut FileRegistry, feedback: &mut Feedback) {
    match backend.list_files().await {
        Ok(files) => {
            info!("registry refreshed: {} files", files.len());
            registry.replace(files);
        }
        Err(e) => {
            warn!("failed to fetch files: {}", e);
            *feedback = Feedback::Error(format!("Failed to fetch files: {}", e));
        }
    }
}
