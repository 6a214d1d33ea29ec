/*!
 * Connector-private job metadata and its codec.
 *
 * The host stores the encoded form as an opaque string on the job and hands it
 * back unchanged on every call. Field names on the wire are lower-camel and
 * other tooling reads them, so they must not change.
 */

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::OptionsError;

/// Provider options carried on a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOptions {
    /// Id of the job on the vendor side, set once at submit time
    #[serde(default)]
    pub project_id: Option<String>,

    /// User provided description of the job
    #[serde(default)]
    pub description: Option<String>,

    /// User provided deadline. Advisory only.
    #[serde(default = "unset_deadline", deserialize_with = "deadline_or_unset")]
    pub deadline: NaiveDateTime,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            project_id: None,
            description: None,
            deadline: unset_deadline(),
        }
    }
}

impl JobOptions {
    /// Decode the opaque blob stored on a job.
    ///
    /// An absent or blank blob (or the JSON literal `null`) decodes to the
    /// default options; anything else must be a valid encoding.
    pub fn decode(blob: Option<&str>) -> Result<Self, OptionsError> {
        let blob = match blob {
            Some(b) if !b.trim().is_empty() => b,
            _ => return Ok(Self::default()),
        };

        let options: Option<JobOptions> = serde_json::from_str(blob)?;
        Ok(options.unwrap_or_default())
    }

    /// Encode for storage on the job
    pub fn encode(&self) -> String {
        // Every field is a plain string or a timestamp, serialization cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = deadline;
        self
    }

    /// Whether the user supplied a deadline
    pub fn has_deadline(&self) -> bool {
        self.deadline != unset_deadline()
    }

    /// The project id, if one has been assigned and is not blank
    pub fn project_id(&self) -> Option<&str> {
        self.project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Value of `deadline` when the user did not provide one
pub fn unset_deadline() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn deadline_or_unset<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(raw) => parse_deadline(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid deadline '{}'", raw))),
        None => Ok(unset_deadline()),
    }
}

/// Accepts a naive timestamp, an RFC 3339 timestamp with an offset
/// (converted to UTC) or a bare date.
fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
