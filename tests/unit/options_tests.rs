/*!
 * Tests for the provider options codec
 */

use chrono::NaiveDate;
use tmconnector::job::options::unset_deadline;
use tmconnector::job::JobOptions;

/// Encoded options must decode to the same value
#[test]
fn test_decode_withEncodedOptions_shouldRestoreThem() {
    let deadline = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(17, 30, 0)
        .unwrap();
    let options = JobOptions {
        project_id: Some("p-123".to_string()),
        description: Some("Spring campaign".to_string()),
        deadline,
    };

    assert_eq!(JobOptions::decode(Some(&options.encode())).unwrap(), options);
    assert_eq!(
        JobOptions::decode(Some(JobOptions::default().encode().as_str())).unwrap(),
        JobOptions::default()
    );
}

/// Absent or empty blobs mean "no options yet"
#[test]
fn test_decode_withEmptyInput_shouldYieldAbsentFields() {
    for blob in [None, Some(""), Some(" \n")] {
        let options = JobOptions::decode(blob).unwrap();
        assert!(options.project_id.is_none());
        assert!(options.description.is_none());
        assert!(!options.has_deadline());
    }
}

/// The wire form uses lower-camel names and the unset deadline sentinel
#[test]
fn test_encode_withDefaults_shouldWriteSentinelDeadline() {
    let value: serde_json::Value = serde_json::from_str(&JobOptions::default().encode()).unwrap();
    assert_eq!(value["projectId"], serde_json::Value::Null);
    assert_eq!(value["description"], serde_json::Value::Null);
    assert_eq!(value["deadline"], "0001-01-01T00:00:00");
}

/// Blobs written by other tools may omit fields or set them to null
#[test]
fn test_decode_withPartialBlob_shouldFillDefaults() {
    let options = JobOptions::decode(Some(r#"{"projectId":"abc","deadline":null}"#)).unwrap();
    assert_eq!(options.project_id(), Some("abc"));
    assert_eq!(options.deadline, unset_deadline());

    let options = JobOptions::decode(Some(r#"{"description":"x","unknownField":1}"#)).unwrap();
    assert_eq!(options.description.as_deref(), Some("x"));
}

/// A blank project id counts as no project id
#[test]
fn test_projectId_withBlankValue_shouldBeNone() {
    let options = JobOptions::decode(Some(r#"{"projectId":"  "}"#)).unwrap();
    assert!(options.project_id().is_none());
}

/// Malformed blobs are rejected
#[test]
fn test_decode_withMalformedBlob_shouldFail() {
    assert!(JobOptions::decode(Some("{\"projectId\":")).is_err());
    assert!(JobOptions::decode(Some(r#"{"deadline":"tomorrow"}"#)).is_err());
}

/// Deadlines written by other tools may carry a UTC marker or an offset
#[test]
fn test_decode_withOffsetDeadlines_shouldNormalizeToUtc() {
    let expected = NaiveDate::from_ymd_opt(2026, 11, 30)
        .unwrap()
        .and_hms_opt(17, 30, 0)
        .unwrap();

    let utc = JobOptions::decode(Some(r#"{"projectId":"p","deadline":"2026-11-30T17:30:00Z"}"#)).unwrap();
    assert_eq!(utc.deadline, expected);
    assert_eq!(utc.project_id(), Some("p"));

    let offset = JobOptions::decode(Some(r#"{"projectId":"p","deadline":"2026-11-30T18:30:00.123+01:00"}"#)).unwrap();
    assert_eq!(
        offset.deadline,
        NaiveDate::from_ymd_opt(2026, 11, 30)
            .unwrap()
            .and_hms_milli_opt(17, 30, 0, 123)
            .unwrap()
    );
}

/// A bare date is a deadline at midnight
#[test]
fn test_decode_withDateOnlyDeadline_shouldUseMidnight() {
    let options = JobOptions::decode(Some(r#"{"deadline":"2026-11-30"}"#)).unwrap();
    assert_eq!(
        options.deadline,
        NaiveDate::from_ymd_opt(2026, 11, 30).unwrap().and_hms_opt(0, 0, 0).unwrap()
    );
    assert!(options.has_deadline());
}

/// Normalized deadlines are written back in the naive form
#[test]
fn test_encode_afterOffsetDeadline_shouldWriteNaiveForm() {
    let options = JobOptions::decode(Some(r#"{"deadline":"2026-11-30T17:30:00Z"}"#)).unwrap();
    assert!(options.encode().contains(r#""deadline":"2026-11-30T17:30:00""#));

    let unset = JobOptions::decode(Some(JobOptions::default().encode().as_str())).unwrap();
    assert_eq!(unset.deadline, unset_deadline());
}
