/*!
 * Tests for the job lifecycle state machine
 */

use tmconnector::job::{JobEvent, JobState, TranslationJob};

const ALL_STATES: [JobState; 7] = [
    JobState::Created,
    JobState::Submitted,
    JobState::Checking,
    JobState::Completed,
    JobState::Failed,
    JobState::Cancelled,
    JobState::Removed,
];

/// Removed is final: no event leaves it
#[test]
fn test_transition_fromRemoved_shouldRejectEveryEvent() {
    for event in [
        JobEvent::Submitted,
        JobEvent::CheckStarted,
        JobEvent::CheckNotReady,
        JobEvent::Completed,
        JobEvent::RemoteFailed,
        JobEvent::Cancelled,
        JobEvent::Removed,
    ] {
        assert!(JobState::Removed.transition(event).is_err(), "{:?} accepted", event);
    }
}

/// Only Created jobs can be submitted
#[test]
fn test_transition_withSubmitted_shouldOnlyLeaveCreated() {
    for state in ALL_STATES {
        let result = state.transition(JobEvent::Submitted);
        assert_eq!(result.is_ok(), state == JobState::Created, "from {}", state);
    }
}

/// A remote failure can be recorded during or outside a check
#[test]
fn test_transition_withRemoteFailed_shouldReachFailed() {
    assert_eq!(JobState::Submitted.transition(JobEvent::RemoteFailed).unwrap(), JobState::Failed);
    assert_eq!(JobState::Checking.transition(JobEvent::RemoteFailed).unwrap(), JobState::Failed);
    assert_eq!(JobState::Failed.transition(JobEvent::Removed).unwrap(), JobState::Removed);
}

/// Only Submitted jobs are polled
#[test]
fn test_isOutstanding_shouldMatchPolledStates() {
    let outstanding: Vec<JobState> = ALL_STATES.into_iter().filter(|s| s.is_outstanding()).collect();
    assert_eq!(outstanding, vec![JobState::Submitted, JobState::Checking]);
}

/// Job files store the state in snake case
#[test]
fn test_jobJson_shouldCarryStateName() {
    let job = TranslationJob::new(3, "en", "fr").with_state(JobState::Cancelled);
    let json = serde_json::to_value(&job).unwrap();
    assert_eq!(json["state"], "cancelled");

    let parsed: TranslationJob = serde_json::from_str(r#"{"id":3,"source_locale":"en","target_locale":"fr"}"#).unwrap();
    assert_eq!(parsed.state, JobState::Created);
    assert!(parsed.content.is_empty());
}

/// Error messages name the state and the rejected event
#[test]
fn test_invalidTransition_display_shouldNameStateAndEvent() {
    let err = JobState::Completed.transition(JobEvent::Cancelled).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("completed"));
    assert!(message.contains("Cancelled"));
}
