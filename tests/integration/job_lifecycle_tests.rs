/*!
 * Integration tests for the job lifecycle through the reference connector
 */

use tmconnector::connector::TranslationConnector;
use tmconnector::errors::{BoundaryError, ConnectorError};
use tmconnector::file_utils::FileManager;
use tmconnector::job::{ContentField, JobOptions, JobState, TranslationJob};
use tmconnector::providers::MockVendor;
use crate::common;

/// Submitting job 42 stores a project id and leaves a debug copy behind
#[tokio::test]
async fn test_submit_withJob42_shouldStoreOptionsAndArtifact() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::working(), temp_dir.path());

    let outcome = connector.submit(common::sample_job(42)).await;
    assert!(outcome.is_success());

    let job = outcome.into_job();
    assert_eq!(job.state, JobState::Submitted);

    let properties: serde_json::Value =
        serde_json::from_str(job.provider_properties.as_deref().unwrap()).unwrap();
    assert!(!properties["projectId"].as_str().unwrap().is_empty());
    assert_eq!(properties["description"], serde_json::Value::Null);
    assert_eq!(properties["deadline"], "0001-01-01T00:00:00");

    let artifacts = FileManager::find_files(temp_dir.path().join("reference"), "xlf").unwrap();
    assert_eq!(artifacts.len(), 1);
    let name = artifacts[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("42-"));
}

/// A ready result containing "Bonjour" for the title completes the job
#[tokio::test]
async fn test_check_withReadyBonjour_shouldCompleteJob() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let vendor = MockVendor::working().with_translation(|source| {
        if source == "Hello" { "Bonjour".to_string() } else { source.to_string() }
    });
    let (connector, _) = common::reference_connector(vendor, temp_dir.path());

    let job = TranslationJob::new(43, "en-US", "fr-FR").with_field(ContentField::text("title", "Hello"));
    let submitted = connector.submit(job).await.into_job();
    let outcome = connector.check(submitted).await;

    assert!(outcome.is_success());
    let completed = outcome.into_job();
    assert_eq!(completed.content.get("title"), Some("Bonjour"));
    assert_eq!(completed.state, JobState::Completed);
}

/// Polling a job that is not ready changes nothing until it is
#[tokio::test]
async fn test_check_repeatedWhileNotReady_shouldBeSideEffectFree() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::ready_after(2), temp_dir.path());

    let submitted = connector.submit(common::sample_job(1)).await.into_job();
    let snapshot = serde_json::to_string(&submitted).unwrap();

    for _ in 0..2 {
        let outcome = connector.check(submitted.clone()).await;
        assert!(outcome.cause().is_some_and(|c| c.is_not_ready()));
        assert_eq!(serde_json::to_string(outcome.job()).unwrap(), snapshot);
    }

    let outcome = connector.check(submitted).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.job().state, JobState::Completed);
}

/// Rich text is sent as blocks and reassembled on import
#[tokio::test]
async fn test_roundTrip_withHtmlBody_shouldTranslateEachBlock() {
    let temp_dir = common::create_temp_dir().unwrap();
    let vendor = MockVendor::working().with_translation(|source| source.replace("paragraph", "paragraphe"));
    let (connector, _) = common::reference_connector(vendor, temp_dir.path());

    let submitted = connector.submit(common::sample_job(5)).await.into_job();
    let completed = connector.check(submitted).await.into_job();

    assert_eq!(
        completed.content.get("body"),
        Some("<p>First paragraphe.</p>\n<p>Second <strong>paragraphe</strong>.</p>")
    );
    assert_eq!(completed.content.get("summary"), Some("  "));
}

/// Descriptions and deadlines set by the user survive submission
#[tokio::test]
async fn test_submit_withUserOptions_shouldKeepThem() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::working().with_vendor_ids(), temp_dir.path());

    let deadline = chrono::NaiveDate::from_ymd_opt(2026, 1, 31)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let options = JobOptions::default()
        .with_description("Launch copy")
        .with_deadline(deadline);
    let job = common::sample_job(8).with_properties(&options.encode());

    let submitted = connector.submit(job).await.into_job();
    let stored = JobOptions::decode(submitted.provider_properties.as_deref()).unwrap();
    assert_eq!(stored.project_id(), Some("mock-8"));
    assert_eq!(stored.description.as_deref(), Some("Launch copy"));
    assert_eq!(stored.deadline, deadline);
}

/// Cancellation honours the vendor's veto
#[tokio::test]
async fn test_cancel_withVendorVeto_shouldKeepSubmitted() {
    let temp_dir = common::create_temp_dir().unwrap();

    let (accepting, _) = common::reference_connector(MockVendor::working(), temp_dir.path());
    let submitted = accepting.submit(common::sample_job(1)).await.into_job();
    let outcome = accepting.cancel(submitted).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.job().state, JobState::Cancelled);

    let (refusing, _) = common::reference_connector(MockVendor::refusing(), temp_dir.path());
    let submitted = refusing.submit(common::sample_job(2)).await.into_job();
    let outcome = refusing.cancel(submitted.clone()).await;
    assert!(matches!(
        outcome.cause(),
        Some(ConnectorError::Boundary(BoundaryError::Refused(_)))
    ));
    assert_eq!(outcome.job(), &submitted);
}

/// A job the vendor gave up on ends up Failed and can then be removed
#[tokio::test]
async fn test_remoteFailure_thenRemove_shouldReachRemoved() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::remote_failure(), temp_dir.path());

    let submitted = connector.submit(common::sample_job(9)).await.into_job();
    let failed = connector.check(submitted).await;
    assert!(!failed.is_success());
    assert_eq!(failed.job().state, JobState::Failed);

    let removed = connector.remove(failed.into_job()).await;
    assert!(removed.is_success());
    assert_eq!(removed.job().state, JobState::Removed);
}

/// A failing vendor never corrupts the job
#[tokio::test]
async fn test_failingVendor_shouldReturnOriginalJob() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::failing(), temp_dir.path());

    let job = common::sample_job(10);
    let outcome = connector.submit(job.clone()).await;
    assert!(outcome.cause().is_some_and(|c| c.is_retryable()));
    assert_eq!(outcome.job(), &job);
}

/// Activation follows the key setting at once, reload or not
#[tokio::test]
async fn test_isActive_withKeyChanges_shouldFollowImmediately() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, settings) = common::reference_connector(MockVendor::working(), temp_dir.path());

    assert!(!connector.is_active());
    settings.set("reference", "key", "abc");
    assert!(connector.is_active());
    settings.set("reference", "key", "");
    connector.reload();
    assert!(!connector.is_active());
}
