use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::{Config, MemorySettings};
use crate::connector::{ConnectorRegistry, Outcome, ProviderViews, ReferenceConnector, TranslationConnector};
use crate::file_utils::FileManager;
use crate::interchange::{xliff, XliffSerializer};
use crate::job::TranslationJob;
use crate::providers::FolderVendor;
use crate::scheduler::{CheckSweep, DirectoryJobStore, SweepReport};

// @module: Application controller playing host for job files

/// Lifecycle operation requested from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOperation {
    Submit,
    Check,
    Cancel,
    Remove,
}

impl fmt::Display for JobOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOperation::Submit => write!(f, "submit"),
            JobOperation::Check => write!(f, "check"),
            JobOperation::Cancel => write!(f, "cancel"),
            JobOperation::Remove => write!(f, "remove"),
        }
    }
}

/// Identity and state of the selected connector
#[derive(Debug, Clone, Serialize)]
pub struct ConnectorStatus {
    pub name: String,
    pub alias: String,
    pub key: Uuid,
    pub active: bool,
    pub views: ProviderViews,
    pub registered: Vec<String>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Every known connector
    registry: ConnectorRegistry,

    // @field: Connector selected by the configuration
    connector: Arc<dyn TranslationConnector>,
}

impl Controller {
    // @method: Create a controller wired to the folder vendor from the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let settings = Arc::new(MemorySettings::from_config(&config));
        let vendor = Arc::new(FolderVendor::new(&config.vendor.outbox, &config.vendor.inbox));
        let reference: Arc<dyn TranslationConnector> =
            Arc::new(ReferenceConnector::new(settings, vendor, &config.temp_root));

        let registry = ConnectorRegistry::new();
        registry.register(reference)?;

        Self::with_registry(config, registry)
    }

    // @method: Create a controller over an already populated registry
    pub fn with_registry(config: Config, registry: ConnectorRegistry) -> Result<Self> {
        let connector = registry.get(&config.connector).ok_or_else(|| {
            anyhow!(
                "Unknown connector '{}', registered: {}",
                config.connector,
                registry.aliases().join(", ")
            )
        })?;

        Ok(Self {
            config,
            registry,
            connector,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connector(&self) -> Arc<dyn TranslationConnector> {
        Arc::clone(&self.connector)
    }

    /// Read a job file
    pub fn read_job<P: AsRef<Path>>(path: P) -> Result<TranslationJob> {
        let content = FileManager::read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Not a translation job: {:?}", path.as_ref()))
    }

    /// Write a job file
    pub fn write_job<P: AsRef<Path>>(path: P, job: &TranslationJob) -> Result<()> {
        let json = serde_json::to_string_pretty(job).context("Failed to serialize job")?;
        FileManager::write_to_file(path, &json)
    }

    /// Run a lifecycle operation on a job file and store the job handed back
    pub async fn run_operation<P: AsRef<Path>>(&self, operation: JobOperation, path: P) -> Result<Outcome> {
        let path = path.as_ref();
        let job = Self::read_job(path)?;
        debug!("Running {} on job {} from {:?}", operation, job.id, path);

        let outcome = match operation {
            JobOperation::Submit => self.connector.submit(job).await,
            JobOperation::Check => self.connector.check(job).await,
            JobOperation::Cancel => self.connector.cancel(job).await,
            JobOperation::Remove => self.connector.remove(job).await,
        };

        Self::write_job(path, outcome.job())?;
        Ok(outcome)
    }

    /// Render the XLIFF document a submit of this job file would send
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let job = Self::read_job(path)?;
        let doc = XliffSerializer::export(
            &job,
            &job.source_locale,
            &job.target_locale,
            &ReferenceConnector::export_options(),
        )?;
        Ok(xliff::write_document(&doc))
    }

    /// Identity and state of the selected connector
    pub fn status(&self) -> ConnectorStatus {
        ConnectorStatus {
            name: self.connector.name().to_string(),
            alias: self.connector.alias().to_string(),
            key: self.connector.key(),
            active: self.connector.is_active(),
            views: self.connector.views(),
            registered: self.registry.aliases(),
        }
    }

    /// Check every submitted job file under a directory once
    pub async fn sweep<P: AsRef<Path>>(
        &self,
        jobs_dir: P,
        progress_callback: impl Fn(usize, usize) + Send + Sync,
    ) -> Result<SweepReport> {
        let jobs_dir = jobs_dir.as_ref();
        if !jobs_dir.is_dir() {
            return Err(anyhow!("Jobs directory does not exist: {:?}", jobs_dir));
        }

        info!("Sweeping job files under {:?}", jobs_dir);
        let store = Arc::new(DirectoryJobStore::new(jobs_dir));
        let sweep = CheckSweep::new(self.connector(), store, &self.config.sweep);
        sweep.run_once_with_progress(progress_callback).await
    }
}
