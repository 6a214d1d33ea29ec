/*!
 * Integration tests for the background check sweep
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tmconnector::app_config::SweepConfig;
use tmconnector::connector::TranslationConnector;
use tmconnector::job::JobState;
use tmconnector::providers::MockVendor;
use tmconnector::scheduler::{CheckSweep, DirectoryJobStore, JobStore, MemoryJobStore};
use crate::common;

/// A mixed batch is fully processed and reported
#[tokio::test]
async fn test_sweep_withManyJobs_shouldCheckEveryJob() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::working(), temp_dir.path());
    let store = Arc::new(MemoryJobStore::new());

    for id in 1..=10 {
        store.insert(connector.submit(common::sample_job(id)).await.into_job());
    }

    let config = SweepConfig {
        max_concurrent_checks: 3,
        ..SweepConfig::default()
    };
    let sweep = CheckSweep::new(connector, store.clone(), &config);

    let calls = AtomicUsize::new(0);
    let report = sweep
        .run_once_with_progress(|done, total| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(done <= total);
        })
        .await
        .unwrap();

    assert_eq!(report.checked, 10);
    assert_eq!(report.completed, 10);
    assert_eq!(calls.load(Ordering::SeqCst), 10);
    assert!(store.submitted_jobs().await.unwrap().is_empty());
}

/// Jobs without usable properties are counted as errors and left alone
#[tokio::test]
async fn test_sweep_withBrokenJob_shouldNotAbort() {
    let temp_dir = common::create_temp_dir().unwrap();
    let (connector, _) = common::reference_connector(MockVendor::working(), temp_dir.path());
    let store = Arc::new(MemoryJobStore::new());

    store.insert(connector.submit(common::sample_job(1)).await.into_job());
    let broken = common::sample_job(2).with_state(JobState::Submitted);
    store.insert(broken.clone());

    let sweep = CheckSweep::new(connector, store.clone(), &SweepConfig::default());
    let report = sweep.run_once().await.unwrap();

    assert_eq!(report.completed, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(store.get(2).unwrap(), broken);
}

/// The directory store feeds the sweep from job files and writes them back
#[tokio::test]
async fn test_sweep_withDirectoryStore_shouldUpdateJobFiles() {
    let temp_dir = common::create_temp_dir().unwrap();
    let jobs_dir = temp_dir.path().join("jobs");
    let (connector, _) = common::reference_connector(MockVendor::working(), temp_dir.path());

    let store = Arc::new(DirectoryJobStore::new(&jobs_dir));
    for id in [11, 12] {
        let submitted = connector.submit(common::sample_job(id)).await.into_job();
        store.save(&submitted).await.unwrap();
    }

    let sweep = CheckSweep::new(connector as Arc<dyn TranslationConnector>, store.clone(), &SweepConfig::default());
    let report = sweep.run_once().await.unwrap();
    assert_eq!(report.completed, 2);

    let reloaded = DirectoryJobStore::new(&jobs_dir).load_all().unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.iter().all(|j| j.state == JobState::Completed));
}
