/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use tmconnector::app_config::{Config, LogLevel, MemorySettings, SettingsSource};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.connector, "reference");
    assert_eq!(config.sweep.interval_secs, 300);
    assert_eq!(config.sweep.max_concurrent_checks, 4);
    assert_eq!(config.sweep.check_timeout_secs, 60);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.temp_root.ends_with("tmconnector"));
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.connector = " ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.sweep.max_concurrent_checks = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.sweep.check_timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    let duplicate = config.providers[0].clone();
    config.providers.push(duplicate);
    assert!(config.validate().is_err());
}

/// Settings are looked up by connector alias and name
#[test]
fn test_setSetting_shouldBeVisibleThroughSettingsSource() {
    let mut config = Config::default();
    config.set_setting("reference", "key", "abc");
    config.set_setting("other", "languages", "fr,de");

    assert_eq!(config.setting("reference", "key").as_deref(), Some("abc"));
    assert_eq!(config.setting("other", "languages").as_deref(), Some("fr,de"));
    assert!(config.setting("reference", "languages").is_none());
    assert_eq!(config.providers.len(), 2);
}

/// Saved configuration loads back with the same values
#[test]
fn test_saveAndLoad_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.set_setting("reference", "key", "secret");
    config.sweep.interval_secs = 30;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded.setting("reference", "key").as_deref(), Some("secret"));
    assert_eq!(loaded.sweep.interval_secs, 30);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// A sparse file gets defaults for everything it leaves out
#[test]
fn test_load_withSparseFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"sweep": {"interval_secs": 10}, "log_level": "warn"}"#,
    )?;

    let config = Config::load(&path)?;
    assert_eq!(config.connector, "reference");
    assert_eq!(config.sweep.interval_secs, 10);
    assert_eq!(config.sweep.max_concurrent_checks, 4);
    assert_eq!(config.log_level, LogLevel::Warn);
    Ok(())
}

/// A missing file is created with the defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(Config::load(&path)?.connector, config.connector);
    Ok(())
}

/// Invalid JSON is reported with the file name
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ nope")?;

    let err = Config::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("conf.json"));
    Ok(())
}

/// In-memory settings start from the config and change at runtime
#[test]
fn test_memorySettings_fromConfig_shouldSeedAndUpdate() {
    let mut config = Config::default();
    config.set_setting("reference", "key", "k1");

    let settings = MemorySettings::from_config(&config);
    assert_eq!(settings.setting("reference", "key").as_deref(), Some("k1"));

    settings.set("reference", "key", "k2");
    assert_eq!(settings.setting("reference", "key").as_deref(), Some("k2"));
    settings.remove("reference", "key");
    assert!(settings.setting("reference", "key").is_none());
}
