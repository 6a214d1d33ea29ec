/*!
 * Background polling of submitted jobs.
 *
 * The host keeps its jobs in a `JobStore`. A `CheckSweep` periodically asks
 * the connector to check every submitted job, with a bounded number of checks
 * in flight and a time limit per check, and stores whatever the connector
 * hands back when it changed the job.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::app_config::SweepConfig;
use crate::connector::{Outcome, TranslationConnector};
use crate::file_utils::FileManager;
use crate::job::{JobState, TranslationJob};

/// Host-side job persistence
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Jobs waiting on the vendor
    async fn submitted_jobs(&self) -> Result<Vec<TranslationJob>>;

    /// Persist a job handed back by a connector
    async fn save(&self, job: &TranslationJob) -> Result<()>;
}

/// Jobs kept in memory
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<u64, TranslationJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: TranslationJob) {
        self.jobs.write().insert(job.id, job);
    }

    pub fn get(&self, id: u64) -> Option<TranslationJob> {
        self.jobs.read().get(&id).cloned()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn submitted_jobs(&self) -> Result<Vec<TranslationJob>> {
        let mut jobs: Vec<TranslationJob> = self
            .jobs
            .read()
            .values()
            .filter(|j| j.state == JobState::Submitted)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.id);
        Ok(jobs)
    }

    async fn save(&self, job: &TranslationJob) -> Result<()> {
        self.insert(job.clone());
        Ok(())
    }
}

/// Jobs kept as JSON files in a directory tree
///
/// A job is written back to the file it was read from; new jobs go to
/// `{id}.json` at the root.
#[derive(Debug)]
pub struct DirectoryJobStore {
    root: PathBuf,
    paths: Mutex<HashMap<u64, PathBuf>>,
}

impl DirectoryJobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: Mutex::new(HashMap::new()),
        }
    }

    /// Every readable job under the root
    pub fn load_all(&self) -> Result<Vec<TranslationJob>> {
        let mut jobs = Vec::new();
        for path in FileManager::find_files(&self.root, "json")? {
            let content = match FileManager::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping {}: unreadable ({:#})", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<TranslationJob>(&content) {
                Ok(job) => {
                    self.paths.lock().insert(job.id, path);
                    jobs.push(job);
                }
                Err(e) => warn!("Skipping {}: not a translation job ({})", path.display(), e),
            }
        }
        Ok(jobs)
    }
}

#[async_trait]
impl JobStore for DirectoryJobStore {
    async fn submitted_jobs(&self) -> Result<Vec<TranslationJob>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|j| j.state == JobState::Submitted)
            .collect())
    }

    async fn save(&self, job: &TranslationJob) -> Result<()> {
        let path = self
            .paths
            .lock()
            .get(&job.id)
            .cloned()
            .unwrap_or_else(|| self.root.join(format!("{}.json", job.id)));
        let json = serde_json::to_string_pretty(job).context("Failed to serialize job")?;
        FileManager::write_to_file(&path, &json)?;
        self.paths.lock().insert(job.id, path);
        Ok(())
    }
}

/// Tally of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Jobs checked
    pub checked: usize,
    /// Jobs whose translation was imported
    pub completed: usize,
    /// Jobs still in translation
    pub not_ready: usize,
    /// Jobs the vendor gave up on
    pub failed: usize,
    /// Checks that failed, timed out, or whose result could not be stored
    pub errors: usize,
}

enum CheckResult {
    Completed,
    NotReady,
    RemoteFailed,
    Error,
}

/// Periodic check of every submitted job
pub struct CheckSweep {
    connector: Arc<dyn TranslationConnector>,
    store: Arc<dyn JobStore>,
    max_concurrent_checks: usize,
    check_timeout: Duration,
}

impl CheckSweep {
    pub fn new(
        connector: Arc<dyn TranslationConnector>,
        store: Arc<dyn JobStore>,
        config: &SweepConfig,
    ) -> Self {
        Self {
            connector,
            store,
            max_concurrent_checks: config.max_concurrent_checks.max(1),
            check_timeout: Duration::from_secs(config.check_timeout_secs),
        }
    }

    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    /// Check every submitted job once
    pub async fn run_once(&self) -> Result<SweepReport> {
        self.run_once_with_progress(|_, _| {}).await
    }

    /// Check every submitted job once, reporting `(done, total)` after each check
    pub async fn run_once_with_progress(
        &self,
        progress_callback: impl Fn(usize, usize) + Send + Sync,
    ) -> Result<SweepReport> {
        let start = Instant::now();
        let jobs = self
            .store
            .submitted_jobs()
            .await
            .context("Failed to list submitted jobs")?;
        let total = jobs.len();
        let done = std::sync::atomic::AtomicUsize::new(0);

        let results: Vec<CheckResult> = stream::iter(jobs)
            .map(|job| {
                let done = &done;
                let progress_callback = &progress_callback;
                async move {
                    let result = self.check_one(job).await;
                    let finished = done.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                    progress_callback(finished, total);
                    result
                }
            })
            .buffer_unordered(self.max_concurrent_checks)
            .collect()
            .await;

        let mut report = SweepReport {
            checked: total,
            ..SweepReport::default()
        };
        for result in results {
            match result {
                CheckResult::Completed => report.completed += 1,
                CheckResult::NotReady => report.not_ready += 1,
                CheckResult::RemoteFailed => report.failed += 1,
                CheckResult::Error => report.errors += 1,
            }
        }

        info!(
            "Sweep checked {} jobs in {:.1}s: {} completed, {} not ready, {} failed, {} errors",
            report.checked,
            start.elapsed().as_secs_f64(),
            report.completed,
            report.not_ready,
            report.failed,
            report.errors
        );
        Ok(report)
    }

    async fn check_one(&self, job: TranslationJob) -> CheckResult {
        let id = job.id;
        let state = job.state;

        let outcome = match tokio::time::timeout(self.check_timeout, self.connector.check(job)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Job {}: check timed out after {:?}", id, self.check_timeout);
                return CheckResult::Error;
            }
        };

        let result = match &outcome {
            Outcome::Succeeded(_) => CheckResult::Completed,
            Outcome::Failed { cause, .. } if cause.is_not_ready() => return CheckResult::NotReady,
            Outcome::Failed { job, .. } if job.state != state => CheckResult::RemoteFailed,
            Outcome::Failed { cause, .. } => {
                debug!("Job {}: check failed: {}", id, cause);
                return CheckResult::Error;
            }
        };

        match self.store.save(outcome.job()).await {
            Ok(()) => result,
            Err(e) => {
                error!("Job {}: could not store checked job: {:#}", id, e);
                CheckResult::Error
            }
        }
    }

    /// Sweep on a fixed interval until `shutdown` turns true or its sender is dropped
    pub async fn run_every(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!("Sweep failed: {:#}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Check sweep stopped");
                        break;
                    }
                }
            }
        }
    }
}
