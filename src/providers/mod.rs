/*!
 * Vendor boundary implementations.
 *
 * A connector hands documents to an external translation vendor and later
 * asks for them back. This module defines that boundary and ships two
 * implementations:
 * - `folder`: file drop through an outbox and an inbox directory
 * - `mock`: scripted behaviors for tests
 */

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt::Debug;

use crate::errors::BoundaryError;

/// A document handed to the vendor
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSubmission {
    /// Host id of the job
    pub job_id: u64,

    /// Project id proposed by the connector; the vendor may assign its own
    pub project_id: String,

    /// Source locale
    pub source_locale: String,

    /// Target locale
    pub target_locale: String,

    /// XLIFF text
    pub document: String,

    /// User provided description
    pub description: Option<String>,

    /// User provided deadline, when one was set
    pub deadline: Option<NaiveDateTime>,
}

/// What the vendor answers to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorReceipt {
    /// Id under which the vendor tracks the project
    pub project_id: String,
}

/// Progress of a project on the vendor side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Still being translated
    NotReady,
    /// The translated document can be fetched
    Ready,
    /// The vendor gave up on the project
    Failed(String),
}

/// Common trait for all translation vendors
///
/// Implementations must be usable from several tasks at once. Calls for the
/// same project are never issued concurrently by the connector.
#[async_trait]
pub trait VendorBoundary: Send + Sync + Debug {
    /// Hand a document over for translation
    async fn send_document(&self, submission: VendorSubmission) -> Result<VendorReceipt, BoundaryError>;

    /// Ask how far along a project is
    async fn poll_status(&self, project_id: &str) -> Result<RemoteStatus, BoundaryError>;

    /// Fetch the translated document of a ready project
    async fn fetch_result(&self, project_id: &str) -> Result<String, BoundaryError>;

    /// Ask the vendor to stop working on a project
    ///
    /// Returns `BoundaryError::Refused` when the vendor vetoes the cancellation.
    async fn cancel(&self, project_id: &str) -> Result<(), BoundaryError>;

    /// Tell the vendor the project's data may be discarded
    async fn release(&self, _project_id: &str) -> Result<(), BoundaryError> {
        Ok(())
    }

    /// Name of the vendor, used in logs
    fn name(&self) -> &str;
}

pub mod folder;
pub mod mock;

pub use folder::FolderVendor;
pub use mock::{MockBehavior, MockVendor};
