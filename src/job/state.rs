/*!
 * Job lifecycle state machine.
 *
 * The host owns the job state, but only moves it along the edges listed in
 * `JobState::transition`, and only after a connector operation succeeded
 * (or, for `RemoteFailed`, after a check reported a permanent remote failure).
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a translation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Created by the host, not yet handed to a connector
    #[default]
    Created,
    /// Accepted by the connector and the vendor
    Submitted,
    /// Transient state while a check is in progress; never persisted
    Checking,
    /// Translation returned and merged into the job
    Completed,
    /// The vendor gave up on the job
    Failed,
    /// Cancelled before completion
    Cancelled,
    /// Removed by the host
    Removed,
}

/// Event that drives a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    Submitted,
    CheckStarted,
    CheckNotReady,
    Completed,
    RemoteFailed,
    Cancelled,
    Removed,
}

/// Raised when an event is not legal from the current state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot apply {event:?} to a job in state '{from}'")]
pub struct InvalidTransition {
    pub from: JobState,
    pub event: JobEvent,
}

impl JobState {
    /// Apply an event, returning the next state
    pub fn transition(self, event: JobEvent) -> Result<JobState, InvalidTransition> {
        use JobEvent as E;
        use JobState as S;

        let next = match (self, event) {
            (S::Created, E::Submitted) => S::Submitted,
            (S::Submitted, E::CheckStarted) => S::Checking,
            (S::Checking, E::CheckNotReady) => S::Submitted,
            (S::Submitted | S::Checking, E::Completed) => S::Completed,
            (S::Submitted | S::Checking, E::RemoteFailed) => S::Failed,
            (S::Submitted, E::Cancelled) => S::Cancelled,
            (S::Completed | S::Failed | S::Cancelled, E::Removed) => S::Removed,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }

    /// Whether the job has reached a state from which it can only be removed
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether the job is waiting on the vendor and should be polled
    pub fn is_outstanding(self) -> bool {
        matches!(self, Self::Submitted | Self::Checking)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Created => write!(f, "created"),
            JobState::Submitted => write!(f, "submitted"),
            JobState::Checking => write!(f, "checking"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
            JobState::Cancelled => write!(f, "cancelled"),
            JobState::Removed => write!(f, "removed"),
        }
    }
}

impl std::str::FromStr for JobState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(JobState::Created),
            "submitted" => Ok(JobState::Submitted),
            "checking" => Ok(JobState::Checking),
            "completed" => Ok(JobState::Completed),
            "failed" => Ok(JobState::Failed),
            "cancelled" => Ok(JobState::Cancelled),
            "removed" => Ok(JobState::Removed),
            _ => Err(anyhow::anyhow!("Invalid job state: {}", s)),
        }
    }
}
