/*!
 * Tests for error classification and conversion
 */

use tmconnector::errors::{AppError, BoundaryError, ConnectorError, DeserializeError, SerializeError};
use tmconnector::job::{JobEvent, JobOptions, JobState};

/// Not ready is retryable but is not a fault
#[test]
fn test_notReady_shouldBeRetryableSteadyState() {
    let err = ConnectorError::NotReady(42);
    assert!(err.is_not_ready());
    assert!(err.is_retryable());
    assert!(err.to_string().contains("42"));
}

/// Transport problems may be retried, rejected input may not
#[test]
fn test_isRetryable_shouldSeparateTransientFromPermanent() {
    assert!(ConnectorError::from(BoundaryError::Timeout(5)).is_retryable());
    assert!(ConnectorError::from(DeserializeError::Malformed("x".into())).is_retryable());
    assert!(!ConnectorError::from(SerializeError::InvalidLocale("zz".into())).is_retryable());
    assert!(!ConnectorError::RemoteFailed("gave up".into()).is_retryable());
    assert!(!ConnectorError::MissingOptions("none".into()).is_retryable());
}

/// Lower level errors convert into connector errors with `?`
#[test]
fn test_conversions_shouldWrapSources() {
    let options_err = JobOptions::decode(Some("{")).unwrap_err();
    assert!(matches!(ConnectorError::from(options_err), ConnectorError::Options(_)));

    let transition = JobState::Created.transition(JobEvent::Cancelled).unwrap_err();
    assert!(matches!(ConnectorError::from(transition), ConnectorError::InvalidState(_)));
}

/// Application errors wrap connector and io errors
#[test]
fn test_appError_fromSources_shouldKeepMessage() {
    let app: AppError = ConnectorError::RemoteFailed("no translator".into()).into();
    assert!(app.to_string().contains("no translator"));

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "job.json missing");
    let app: AppError = io.into();
    assert!(matches!(app, AppError::File(ref m) if m.contains("job.json")));

    let app: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app, AppError::Unknown(_)));
}
