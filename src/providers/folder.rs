/*!
 * File drop vendor.
 *
 * Submitted documents are written to `outbox/{projectId}.xlf`. The vendor
 * (a person or a sync job) delivers the translation as `inbox/{projectId}.xlf`,
 * or gives up by writing the reason to `inbox/{projectId}.failed`. A result
 * file in the inbox marks the project as ready.
 */

use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::BoundaryError;
use crate::providers::{RemoteStatus, VendorBoundary, VendorReceipt, VendorSubmission};

/// Vendor exchanging documents through two directories
#[derive(Debug, Clone)]
pub struct FolderVendor {
    outbox: PathBuf,
    inbox: PathBuf,
}

impl FolderVendor {
    pub fn new(outbox: impl Into<PathBuf>, inbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: outbox.into(),
            inbox: inbox.into(),
        }
    }

    pub fn outbox_path(&self, project_id: &str) -> PathBuf {
        self.outbox.join(format!("{}.xlf", project_id))
    }

    pub fn result_path(&self, project_id: &str) -> PathBuf {
        self.inbox.join(format!("{}.xlf", project_id))
    }

    pub fn failure_path(&self, project_id: &str) -> PathBuf {
        self.inbox.join(format!("{}.failed", project_id))
    }
}

fn request_failed(path: &Path, error: std::io::Error) -> BoundaryError {
    BoundaryError::RequestFailed(format!("{}: {}", path.display(), error))
}

/// Remove a file, treating an already missing file as removed
async fn remove_if_exists(path: &Path) -> Result<(), BoundaryError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(request_failed(path, e)),
    }
}

/// Project ids become file names, so they must not reach outside the folders
fn check_project_id(project_id: &str) -> Result<(), BoundaryError> {
    let valid = !project_id.is_empty()
        && project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BoundaryError::UnknownProject(project_id.to_string()))
    }
}

#[async_trait]
impl VendorBoundary for FolderVendor {
    async fn send_document(&self, submission: VendorSubmission) -> Result<VendorReceipt, BoundaryError> {
        check_project_id(&submission.project_id)?;
        fs::create_dir_all(&self.outbox)
            .await
            .map_err(|e| request_failed(&self.outbox, e))?;

        let path = self.outbox_path(&submission.project_id);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| request_failed(&path, e))?;
        file.write_all(submission.document.as_bytes())
            .await
            .map_err(|e| request_failed(&path, e))?;
        file.flush().await.map_err(|e| request_failed(&path, e))?;

        debug!("Dropped job {} into {}", submission.job_id, path.display());
        Ok(VendorReceipt {
            project_id: submission.project_id,
        })
    }

    async fn poll_status(&self, project_id: &str) -> Result<RemoteStatus, BoundaryError> {
        check_project_id(project_id)?;

        if fs::try_exists(self.result_path(project_id)).await.unwrap_or(false) {
            return Ok(RemoteStatus::Ready);
        }

        let failure = self.failure_path(project_id);
        match fs::read_to_string(&failure).await {
            Ok(reason) => return Ok(RemoteStatus::Failed(reason.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(request_failed(&failure, e)),
        }

        if fs::try_exists(self.outbox_path(project_id)).await.unwrap_or(false) {
            Ok(RemoteStatus::NotReady)
        } else {
            Err(BoundaryError::UnknownProject(project_id.to_string()))
        }
    }

    async fn fetch_result(&self, project_id: &str) -> Result<String, BoundaryError> {
        check_project_id(project_id)?;
        let path = self.result_path(project_id);
        fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => BoundaryError::UnknownProject(project_id.to_string()),
            _ => request_failed(&path, e),
        })
    }

    async fn cancel(&self, project_id: &str) -> Result<(), BoundaryError> {
        check_project_id(project_id)?;
        if fs::try_exists(self.result_path(project_id)).await.unwrap_or(false) {
            return Err(BoundaryError::Refused(format!(
                "Project {} has already been delivered",
                project_id
            )));
        }
        remove_if_exists(&self.outbox_path(project_id)).await
    }

    async fn release(&self, project_id: &str) -> Result<(), BoundaryError> {
        check_project_id(project_id)?;
        let delivered = fs::try_exists(self.result_path(project_id)).await.unwrap_or(false)
            || fs::try_exists(self.failure_path(project_id)).await.unwrap_or(false);
        let pending = fs::try_exists(self.outbox_path(project_id)).await.unwrap_or(false);
        if pending && !delivered {
            return Err(BoundaryError::Refused(format!(
                "Project {} is still in translation",
                project_id
            )));
        }

        remove_if_exists(&self.outbox_path(project_id)).await?;
        remove_if_exists(&self.result_path(project_id)).await?;
        remove_if_exists(&self.failure_path(project_id)).await
    }

    fn name(&self) -> &str {
        "folder"
    }
}
