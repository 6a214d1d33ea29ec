/*!
 * Translation connectors.
 *
 * A connector links the host's translation jobs to one external vendor. The
 * host drives every job through the connector's lifecycle operations and
 * stores whatever job the connector hands back, success or not.
 *
 * - `reference`: the reference connector exchanging XLIFF with a vendor boundary
 * - `registry`: explicit registration and lookup of connectors by alias
 */

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ConnectorError;
use crate::job::TranslationJob;

pub mod reference;
pub mod registry;

pub use reference::ReferenceConnector;
pub use registry::ConnectorRegistry;

/// Result of a lifecycle operation
///
/// Both variants carry the job the host must persist. On failure the job is
/// the original one unless the failure itself changed its state.
#[derive(Debug)]
pub enum Outcome {
    Succeeded(TranslationJob),
    Failed {
        job: TranslationJob,
        cause: ConnectorError,
    },
}

impl Outcome {
    pub fn succeed(job: TranslationJob) -> Self {
        Self::Succeeded(job)
    }

    pub fn fail(job: TranslationJob, cause: impl Into<ConnectorError>) -> Self {
        Self::Failed {
            job,
            cause: cause.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The job to persist
    pub fn job(&self) -> &TranslationJob {
        match self {
            Self::Succeeded(job) => job,
            Self::Failed { job, .. } => job,
        }
    }

    pub fn into_job(self) -> TranslationJob {
        match self {
            Self::Succeeded(job) => job,
            Self::Failed { job, .. } => job,
        }
    }

    pub fn cause(&self) -> Option<&ConnectorError> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed { cause, .. } => Some(cause),
        }
    }

    /// Drop the job carried by a failure and keep only the cause
    pub fn into_result(self) -> Result<TranslationJob, ConnectorError> {
        match self {
            Self::Succeeded(job) => Ok(job),
            Self::Failed { cause, .. } => Err(cause),
        }
    }
}

/// Locations of the connector's UI views
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderViews {
    /// Connector settings page
    pub config: String,
    /// Shown while the job is being prepared
    pub pending: String,
    /// Shown once the job is with the vendor
    pub submitted: String,
    /// Shown once the translation was approved
    pub approved: String,
}

impl ProviderViews {
    /// Turn app-relative paths (`~/App_Plugins/...`) into absolute ones
    pub fn to_absolute(&self) -> Self {
        fn absolute(path: &str) -> String {
            let trimmed = path.trim_start_matches('~');
            if trimmed.starts_with('/') {
                trimmed.to_string()
            } else {
                format!("/{}", trimmed)
            }
        }

        Self {
            config: absolute(&self.config),
            pending: absolute(&self.pending),
            submitted: absolute(&self.submitted),
            approved: absolute(&self.approved),
        }
    }
}

/// A link between the host's translation jobs and one external vendor
///
/// Operations on different jobs may run concurrently. Operations on the same
/// job must be serialized by the caller: the connector holds no per-job lock.
/// Lifecycle operations never return an error directly; failures travel in
/// the `Outcome` together with the job to store.
#[async_trait]
pub trait TranslationConnector: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Unique alias, used to select the connector and key its settings
    fn alias(&self) -> &str;

    /// Stable identity
    fn key(&self) -> Uuid;

    /// Locations of the connector's views
    fn views(&self) -> ProviderViews;

    /// Whether the connector is configured well enough to be used
    fn is_active(&self) -> bool;

    /// Hand a freshly created job to the vendor
    async fn submit(&self, job: TranslationJob) -> Outcome;

    /// Ask the vendor whether a submitted job is done, and import it if so
    async fn check(&self, job: TranslationJob) -> Outcome;

    /// Withdraw a submitted job
    async fn cancel(&self, job: TranslationJob) -> Outcome;

    /// Release a finished job on the vendor side before the host deletes it
    async fn remove(&self, job: TranslationJob) -> Outcome;

    /// Whether the connector can handle the job's language pair
    fn can_translate(&self, job: &TranslationJob) -> bool;

    /// Target languages offered for a source language; empty means any
    fn supported_target_languages(&self, source_locale: &str) -> Vec<String>;

    /// Pick up configuration changes
    fn reload(&self);
}
