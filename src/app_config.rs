use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the connector host configuration: per-connector
/// settings, the temp storage root, the vendor drop folders and the
/// background check sweep.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Alias of the connector to use
    #[serde(default = "default_connector")]
    pub connector: String,

    /// Settings for each connector, keyed by connector alias
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,

    /// Root folder for temporary files (debug artifacts)
    #[serde(default = "default_temp_root")]
    pub temp_root: PathBuf,

    /// Drop folders used by the folder vendor
    #[serde(default)]
    pub vendor: VendorConfig,

    /// Background check sweep
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for one connector
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
    // @field: Connector alias
    pub alias: String,

    // @field: Setting name -> value
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

impl ProviderSettings {
    // @param alias: Connector alias
    // @returns: Settings with no values
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            settings: HashMap::new(),
        }
    }
}

/// Folder vendor configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VendorConfig {
    /// Where submitted documents are dropped for the vendor
    #[serde(default = "default_outbox")]
    pub outbox: PathBuf,

    /// Where the vendor drops finished documents
    #[serde(default = "default_inbox")]
    pub inbox: PathBuf,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            outbox: default_outbox(),
            inbox: default_inbox(),
        }
    }
}

/// Background check sweep configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SweepConfig {
    /// Seconds between sweeps
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of checks in flight at once
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,

    /// Time limit for a single check, in seconds
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_concurrent_checks: default_max_concurrent_checks(),
            check_timeout_secs: default_check_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Host-side configuration lookup keyed by connector alias and setting name
pub trait SettingsSource: Send + Sync {
    /// Current value of a setting, if it is set
    fn setting(&self, alias: &str, name: &str) -> Option<String>;
}

fn default_connector() -> String {
    "reference".to_string()
}

fn default_temp_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tmconnector")
}

fn default_outbox() -> PathBuf {
    default_temp_root().join("vendor").join("outbox")
}

fn default_inbox() -> PathBuf {
    default_temp_root().join("vendor").join("inbox")
}

fn default_interval_secs() -> u64 {
    300 // five minutes between sweeps
}

fn default_max_concurrent_checks() -> usize {
    4
}

fn default_check_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load the configuration from a JSON file, creating a default one if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load the configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        crate::file_utils::FileManager::write_to_file(path, &json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.connector.trim().is_empty() {
            return Err(anyhow!("A connector alias is required"));
        }

        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.alias.as_str()) {
                return Err(anyhow!("Duplicate settings for connector '{}'", provider.alias));
            }
        }

        if self.sweep.max_concurrent_checks == 0 {
            return Err(anyhow!("sweep.max_concurrent_checks must be at least 1"));
        }

        if self.sweep.check_timeout_secs == 0 {
            return Err(anyhow!("sweep.check_timeout_secs must be at least 1"));
        }

        Ok(())
    }

    /// Get the settings for a connector alias
    pub fn get_provider_settings(&self, alias: &str) -> Option<&ProviderSettings> {
        self.providers.iter().find(|p| p.alias == alias)
    }

    /// Set a connector setting, adding the connector entry if needed
    pub fn set_setting(&mut self, alias: &str, name: &str, value: &str) {
        let index = match self.providers.iter().position(|p| p.alias == alias) {
            Some(index) => index,
            None => {
                self.providers.push(ProviderSettings::new(alias));
                self.providers.len() - 1
            }
        };
        self.providers[index]
            .settings
            .insert(name.to_string(), value.to_string());
    }
}

impl SettingsSource for Config {
    fn setting(&self, alias: &str, name: &str) -> Option<String> {
        self.get_provider_settings(alias)
            .and_then(|p| p.settings.get(name))
            .cloned()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            connector: default_connector(),
            providers: vec![ProviderSettings::new(&default_connector())],
            temp_root: default_temp_root(),
            vendor: VendorConfig::default(),
            sweep: SweepConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Settings held in memory and changeable at runtime
///
/// Used by hosts that edit connector settings while running, and by tests.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<(String, String), String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the settings of a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let settings = Self::new();
        for provider in &config.providers {
            for (name, value) in &provider.settings {
                settings.set(&provider.alias, name, value);
            }
        }
        settings
    }

    pub fn set(&self, alias: &str, name: &str, value: &str) {
        self.values
            .write()
            .insert((alias.to_string(), name.to_string()), value.to_string());
    }

    pub fn remove(&self, alias: &str, name: &str) {
        self.values
            .write()
            .remove(&(alias.to_string(), name.to_string()));
    }
}

impl SettingsSource for MemorySettings {
    fn setting(&self, alias: &str, name: &str) -> Option<String> {
        self.values
            .read()
            .get(&(alias.to_string(), name.to_string()))
            .cloned()
    }
}
