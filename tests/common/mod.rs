/*!
 * Common test utilities for the tmconnector test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use tmconnector::app_config::MemorySettings;
use tmconnector::connector::ReferenceConnector;
use tmconnector::job::{ContentField, TranslationJob};
use tmconnector::providers::MockVendor;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs to the test output; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A typical page job: a plain title, a rich-text body and a blank field
pub fn sample_job(id: u64) -> TranslationJob {
    TranslationJob::new(id, "en-US", "fr-FR")
        .with_name("Home page")
        .with_field(ContentField::text("title", "Welcome"))
        .with_field(ContentField::html(
            "body",
            "<p>First paragraph.</p>\n<p>Second <strong>paragraph</strong>.</p>",
        ))
        .with_field(ContentField::text("summary", "  "))
}

/// Reference connector over a mock vendor, with editable settings
pub fn reference_connector(vendor: MockVendor, temp_root: &Path) -> (Arc<ReferenceConnector>, Arc<MemorySettings>) {
    let settings = Arc::new(MemorySettings::new());
    let connector = Arc::new(ReferenceConnector::new(
        settings.clone(),
        Arc::new(vendor),
        temp_root,
    ));
    (connector, settings)
}
