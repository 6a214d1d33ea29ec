/*!
 * Reference connector.
 *
 * Exchanges XLIFF 2.0 documents with a vendor boundary. Job content is
 * exported with blank fields dropped and rich-text fields split into blocks;
 * the vendor's project id is kept in the job's provider properties.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::SettingsSource;
use crate::errors::ConnectorError;
use crate::file_utils::FileManager;
use crate::interchange::{xliff, SerializerOptions, XliffSerializer};
use crate::job::{JobEvent, JobOptions, JobState, TranslationJob};
use crate::language_utils;
use crate::providers::{RemoteStatus, VendorBoundary, VendorSubmission};

use super::{Outcome, ProviderViews, TranslationConnector};

pub const NAME: &str = "Reference Connector";
pub const ALIAS: &str = "reference";
pub const KEY: Uuid = Uuid::from_u128(0x5b6c_2f7e_8a41_4d8e_9c3b_1f0a_7e52_d9c4);

/// Setting holding the vendor API key; the connector is active when it is set
pub const KEY_SETTING: &str = "key";
/// Setting holding the comma separated list of offered target languages
pub const LANGUAGES_SETTING: &str = "languages";

const PLUGIN_ROOT: &str = "~/App_Plugins/Translations.Reference";

/// Reference connector backed by a vendor boundary
pub struct ReferenceConnector {
    settings: Arc<dyn SettingsSource>,
    vendor: Arc<dyn VendorBoundary>,
    temp_root: PathBuf,
}

impl ReferenceConnector {
    pub fn new(
        settings: Arc<dyn SettingsSource>,
        vendor: Arc<dyn VendorBoundary>,
        temp_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            vendor,
            temp_root: temp_root.into(),
        }
    }

    /// Folder receiving a copy of every submitted document
    pub fn artifact_dir(&self) -> PathBuf {
        self.temp_root.join(ALIAS)
    }

    /// Options used to build the document sent to the vendor
    pub fn export_options() -> SerializerOptions {
        SerializerOptions {
            remove_blanks: true,
            split_html: true,
            ..SerializerOptions::default()
        }
    }

    fn import_options() -> SerializerOptions {
        SerializerOptions {
            preserve_white_space: true,
            languages_must_match: false,
            ..SerializerOptions::default()
        }
    }

    /// Target languages configured for the connector; empty when unconstrained
    fn configured_languages(&self) -> Vec<String> {
        self.settings
            .setting(ALIAS, LANGUAGES_SETTING)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(language_utils::normalize_locale)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Project id of a job that must already have been submitted
    fn submitted_project_id(job: &TranslationJob) -> Result<String, ConnectorError> {
        let blob = job
            .provider_properties
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| ConnectorError::MissingOptions(format!("job {} has no provider properties", job.id)))?;

        let options = JobOptions::decode(Some(blob))?;
        options
            .project_id()
            .map(str::to_string)
            .ok_or_else(|| ConnectorError::MissingOptions(format!("job {} has no project id", job.id)))
    }

    /// Keep a copy of the document for troubleshooting; failures only warn
    fn write_artifact(&self, job: &TranslationJob, document: &str) {
        match FileManager::write_unique(self.artifact_dir(), job.id, "xlf", document) {
            Ok(path) => debug!("Job {}: wrote {}", job.id, path.display()),
            Err(e) => warn!("Job {}: could not write debug copy: {:#}", job.id, e),
        }
    }

    async fn try_submit(&self, job: &TranslationJob) -> Result<TranslationJob, ConnectorError> {
        let next = job.state.transition(JobEvent::Submitted)?;
        let mut options = JobOptions::decode(job.provider_properties.as_deref())?;

        let doc = XliffSerializer::export(
            job,
            &job.source_locale,
            &job.target_locale,
            &Self::export_options(),
        )?;
        let document = xliff::write_document(&doc);

        let submission = VendorSubmission {
            job_id: job.id,
            project_id: Uuid::new_v4().to_string(),
            source_locale: job.source_locale.clone(),
            target_locale: job.target_locale.clone(),
            document: document.clone(),
            description: options.description.clone(),
            deadline: options.has_deadline().then_some(options.deadline),
        };
        let receipt = self.vendor.send_document(submission).await?;
        self.write_artifact(job, &document);

        options.project_id = Some(receipt.project_id);
        let mut submitted = job.clone();
        submitted.provider_properties = Some(options.encode());
        submitted.state = next;
        Ok(submitted)
    }

    async fn try_remove(&self, job: &TranslationJob) -> Result<TranslationJob, ConnectorError> {
        match JobOptions::decode(job.provider_properties.as_deref()) {
            Ok(options) => {
                if let Some(project_id) = options.project_id() {
                    self.vendor.release(project_id).await?;
                }
            }
            Err(e) => warn!("Job {}: unreadable provider properties, removing locally: {}", job.id, e),
        }

        let mut removed = job.clone();
        removed.state = JobState::Removed;
        Ok(removed)
    }
}

/// Whether a configured language entry admits a target locale.
/// `fr` admits every French locale, `fr-CA` only itself.
fn language_admits(entry: &str, target: &str) -> bool {
    if language_utils::locales_match(entry, target) {
        return true;
    }
    let target = language_utils::normalize_locale(target);
    !entry.contains('-')
        && target
            .split('-')
            .next()
            .is_some_and(|primary| primary.eq_ignore_ascii_case(entry))
}

fn view(path: &str) -> String {
    format!("{}/{}", PLUGIN_ROOT, path)
}

#[async_trait]
impl TranslationConnector for ReferenceConnector {
    fn name(&self) -> &str {
        NAME
    }

    fn alias(&self) -> &str {
        ALIAS
    }

    fn key(&self) -> Uuid {
        KEY
    }

    fn views(&self) -> ProviderViews {
        ProviderViews {
            config: view("config.html"),
            pending: view("pending.html"),
            submitted: view("submitted.html"),
            approved: view("submitted.html"),
        }
        .to_absolute()
    }

    fn is_active(&self) -> bool {
        self.settings
            .setting(ALIAS, KEY_SETTING)
            .is_some_and(|key| !key.trim().is_empty())
    }

    async fn submit(&self, job: TranslationJob) -> Outcome {
        match self.try_submit(&job).await {
            Ok(submitted) => {
                info!(
                    "Job {} ({}) submitted to {} [{} -> {}]",
                    submitted.id,
                    submitted.name,
                    self.vendor.name(),
                    submitted.source_locale,
                    submitted.target_locale
                );
                Outcome::succeed(submitted)
            }
            Err(cause) => {
                warn!("Job {}: submit failed: {}", job.id, cause);
                Outcome::fail(job, cause)
            }
        }
    }

    async fn check(&self, job: TranslationJob) -> Outcome {
        let checking = match job.state.transition(JobEvent::CheckStarted) {
            Ok(state) => state,
            Err(e) => return Outcome::fail(job, e),
        };
        let project_id = match Self::submitted_project_id(&job) {
            Ok(project_id) => project_id,
            Err(cause) => {
                warn!("Job {}: cannot check: {}", job.id, cause);
                return Outcome::fail(job, cause);
            }
        };

        let status = match self.vendor.poll_status(&project_id).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Job {}: status poll failed: {}", job.id, e);
                return Outcome::fail(job, e);
            }
        };

        match status {
            RemoteStatus::NotReady => {
                debug!("Job {}: project {} not ready yet", job.id, project_id);
                let id = job.id;
                Outcome::fail(job, ConnectorError::NotReady(id))
            }
            RemoteStatus::Failed(reason) => {
                warn!("Job {}: vendor reports project {} failed: {}", job.id, project_id, reason);
                let mut failed = job;
                match checking.transition(JobEvent::RemoteFailed) {
                    Ok(state) => failed.state = state,
                    Err(e) => return Outcome::fail(failed, e),
                }
                Outcome::fail(failed, ConnectorError::RemoteFailed(reason))
            }
            RemoteStatus::Ready => {
                let result = match self.vendor.fetch_result(&project_id).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Job {}: fetching project {} failed: {}", job.id, project_id, e);
                        return Outcome::fail(job, e);
                    }
                };

                let mut completed = match XliffSerializer::from_xliff(&result, &job, &Self::import_options()) {
                    Ok(completed) => completed,
                    Err(e) => {
                        warn!("Job {}: translated document rejected: {}", job.id, e);
                        return Outcome::fail(job, e);
                    }
                };
                match checking.transition(JobEvent::Completed) {
                    Ok(state) => completed.state = state,
                    Err(e) => return Outcome::fail(job, e),
                }

                info!("Job {} ({}) completed", completed.id, completed.name);
                Outcome::succeed(completed)
            }
        }
    }

    async fn cancel(&self, job: TranslationJob) -> Outcome {
        let next = match job.state.transition(JobEvent::Cancelled) {
            Ok(state) => state,
            Err(e) => return Outcome::fail(job, e),
        };
        let options = match JobOptions::decode(job.provider_properties.as_deref()) {
            Ok(options) => options,
            Err(e) => return Outcome::fail(job, e),
        };

        match options.project_id() {
            Some(project_id) => {
                if let Err(e) = self.vendor.cancel(project_id).await {
                    warn!("Job {}: vendor did not cancel project {}: {}", job.id, project_id, e);
                    return Outcome::fail(job, e);
                }
            }
            None => debug!("Job {}: no project id, cancelling locally", job.id),
        }

        info!("Job {} ({}) cancelled", job.id, job.name);
        let mut cancelled = job;
        cancelled.state = next;
        Outcome::succeed(cancelled)
    }

    async fn remove(&self, job: TranslationJob) -> Outcome {
        match self.try_remove(&job).await {
            Ok(removed) => {
                info!("Job {} ({}) removed", removed.id, removed.name);
                Outcome::succeed(removed)
            }
            Err(cause) => {
                warn!("Job {}: remove failed: {}", job.id, cause);
                Outcome::fail(job, cause)
            }
        }
    }

    fn can_translate(&self, job: &TranslationJob) -> bool {
        let valid = language_utils::validate_locale(&job.source_locale).is_ok()
            && language_utils::validate_locale(&job.target_locale).is_ok();
        if !valid {
            return false;
        }

        let languages = self.configured_languages();
        languages.is_empty()
            || languages
                .iter()
                .any(|entry| language_admits(entry, &job.target_locale))
    }

    fn supported_target_languages(&self, source_locale: &str) -> Vec<String> {
        self.configured_languages()
            .into_iter()
            .filter(|l| !language_utils::locales_match(l, source_locale))
            .collect()
    }

    /// Settings are read on every call and nothing is cached, so there is
    /// nothing to refresh.
    fn reload(&self) {
        debug!("{}: reload requested, settings are read on demand", NAME);
    }
}

impl std::fmt::Debug for ReferenceConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceConnector")
            .field("vendor", &self.vendor)
            .field("temp_root", &self.temp_root)
            .finish()
    }
}
