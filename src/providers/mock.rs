/*!
 * Mock vendor for testing.
 *
 * This module provides a vendor that simulates different behaviors:
 * - `MockVendor::working()` - Translates everything on the first poll
 * - `MockVendor::ready_after(n)` - Reports not ready for `n` polls
 * - `MockVendor::refusing()` - Vetoes cancellation and release
 * - `MockVendor::failing()` - Every call fails
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::BoundaryError;
use crate::interchange::xliff;
use crate::providers::{RemoteStatus, VendorBoundary, VendorReceipt, VendorSubmission};

/// Behavior mode for the mock vendor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Ready on the first poll
    Working,
    /// Not ready for the first `polls` polls of each project
    ReadyAfter { polls: usize },
    /// Never finishes
    NeverReady,
    /// Reports every project as permanently failed
    RemoteFailure,
    /// Works, but vetoes cancellation and release
    Refusing,
    /// Every call fails with an error
    Failing,
    /// Works, but every call takes `delay_ms` (for timeout testing)
    Slow { delay_ms: u64 },
}

#[derive(Debug, Clone)]
struct MockProject {
    document: String,
    polls: usize,
}

/// Mock vendor for testing connector behavior
#[derive(Debug)]
pub struct MockVendor {
    /// Behavior mode
    behavior: MockBehavior,
    /// Call counter across all operations
    request_count: Arc<AtomicUsize>,
    /// Projects received so far
    projects: Arc<Mutex<HashMap<String, MockProject>>>,
    /// Custom translation of each source text (optional)
    translation: Option<fn(&str) -> String>,
    /// Whether the vendor assigns its own project ids
    assigns_ids: bool,
}

impl MockVendor {
    /// Create a new mock vendor with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            projects: Arc::new(Mutex::new(HashMap::new())),
            translation: None,
            assigns_ids: false,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn ready_after(polls: usize) -> Self {
        Self::new(MockBehavior::ReadyAfter { polls })
    }

    pub fn never_ready() -> Self {
        Self::new(MockBehavior::NeverReady)
    }

    pub fn remote_failure() -> Self {
        Self::new(MockBehavior::RemoteFailure)
    }

    pub fn refusing() -> Self {
        Self::new(MockBehavior::Refusing)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom translation for every segment source
    pub fn with_translation(mut self, translation: fn(&str) -> String) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Let the vendor pick project ids instead of accepting the proposed one
    pub fn with_vendor_ids(mut self) -> Self {
        self.assigns_ids = true;
        self
    }

    /// Number of boundary calls made so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of projects received
    pub fn submitted_count(&self) -> usize {
        self.projects.lock().len()
    }

    /// Document of a received project
    pub fn document(&self, project_id: &str) -> Option<String> {
        self.projects.lock().get(project_id).map(|p| p.document.clone())
    }

    /// Put a project in place as if it had been submitted earlier
    pub fn seed_project(&self, project_id: &str, document: &str) {
        self.projects.lock().insert(
            project_id.to_string(),
            MockProject {
                document: document.to_string(),
                polls: 0,
            },
        );
    }

    fn translate(&self, source: &str) -> String {
        match self.translation {
            Some(translation) => translation(source),
            None => format!("[TRANSLATED] {}", source),
        }
    }

    async fn begin_call(&self) -> Result<(), BoundaryError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Failing => Err(BoundaryError::RequestFailed(
                "Simulated vendor failure".to_string(),
            )),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Clone for MockVendor {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            projects: Arc::clone(&self.projects),
            translation: self.translation,
            assigns_ids: self.assigns_ids,
        }
    }
}

#[async_trait]
impl VendorBoundary for MockVendor {
    async fn send_document(&self, submission: VendorSubmission) -> Result<VendorReceipt, BoundaryError> {
        self.begin_call().await?;

        let project_id = if self.assigns_ids {
            format!("mock-{}", submission.job_id)
        } else {
            submission.project_id
        };
        self.seed_project(&project_id, &submission.document);

        Ok(VendorReceipt { project_id })
    }

    async fn poll_status(&self, project_id: &str) -> Result<RemoteStatus, BoundaryError> {
        self.begin_call().await?;

        if self.behavior == MockBehavior::NeverReady {
            return Ok(RemoteStatus::NotReady);
        }

        let mut projects = self.projects.lock();
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| BoundaryError::UnknownProject(project_id.to_string()))?;
        project.polls += 1;

        Ok(match self.behavior {
            MockBehavior::RemoteFailure => {
                RemoteStatus::Failed("Simulated remote failure".to_string())
            }
            MockBehavior::ReadyAfter { polls } if project.polls <= polls => RemoteStatus::NotReady,
            _ => RemoteStatus::Ready,
        })
    }

    async fn fetch_result(&self, project_id: &str) -> Result<String, BoundaryError> {
        self.begin_call().await?;

        let source = self
            .document(project_id)
            .ok_or_else(|| BoundaryError::UnknownProject(project_id.to_string()))?;

        // Documents that are not XLIFF are handed back untouched so tests can
        // feed arbitrary payloads through `seed_project`
        let Ok(mut doc) = xliff::read_document(&source) else {
            return Ok(source);
        };
        for unit in &mut doc.units {
            for segment in &mut unit.segments {
                if segment.target.is_none() {
                    segment.target = Some(self.translate(&segment.source));
                }
            }
        }

        Ok(xliff::write_document(&doc))
    }

    async fn cancel(&self, project_id: &str) -> Result<(), BoundaryError> {
        self.begin_call().await?;

        if self.behavior == MockBehavior::Refusing {
            return Err(BoundaryError::Refused(format!(
                "Project {} is already in translation",
                project_id
            )));
        }
        self.projects.lock().remove(project_id);
        Ok(())
    }

    async fn release(&self, project_id: &str) -> Result<(), BoundaryError> {
        self.begin_call().await?;

        if self.behavior == MockBehavior::Refusing {
            return Err(BoundaryError::Refused(format!(
                "Project {} cannot be released",
                project_id
            )));
        }
        self.projects.lock().remove(project_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
