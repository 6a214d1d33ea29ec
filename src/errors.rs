/*!
 * Error types for the connector.
 *
 * This module contains custom error types for the different parts of the
 * connector, using the thiserror crate for ergonomic error definitions.
 * Lifecycle operations never return these directly to the host; they are
 * carried inside an `Outcome` as the failure cause.
 */

use thiserror::Error;

/// Errors raised while decoding the opaque provider properties blob
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The blob is not a valid encoding of the job options
    #[error("Invalid job options: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur while exporting job content to an interchange document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    /// Source or target locale is empty or not a recognised language tag
    #[error("Invalid locale '{0}'")]
    InvalidLocale(String),

    /// A rich-text field could not be split into blocks
    #[error("Malformed markup in field '{field}': {message}")]
    MalformedMarkup {
        /// Key of the offending field
        field: String,
        /// What the splitter tripped over
        message: String,
    },
}

/// Errors that can occur while reading an interchange document or merging it into a job
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeserializeError {
    /// The document is not well-formed XML
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The document is XML but not a usable XLIFF 2.0 document
    #[error("Invalid XLIFF: {0}")]
    InvalidStructure(String),

    /// The document's language pair differs from the job's
    #[error("Language mismatch: document is {document_source} -> {document_target}, job is {job_source} -> {job_target}")]
    LanguageMismatch {
        /// Source locale declared by the document
        document_source: String,
        /// Target locale declared by the document
        document_target: String,
        /// Source locale of the job
        job_source: String,
        /// Target locale of the job
        job_target: String,
    },

    /// None of the document's units refer to a field of the job
    #[error("Document does not reference any field of job {0}")]
    NoMatchingFields(u64),
}

/// Errors reported by the external translation vendor boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// The vendor call failed (transport, storage, unexpected response)
    #[error("Vendor request failed: {0}")]
    RequestFailed(String),

    /// The vendor explicitly refused the operation (e.g. vetoed a cancellation)
    #[error("Vendor refused the request: {0}")]
    Refused(String),

    /// The vendor does not know the referenced project
    #[error("Unknown vendor project: {0}")]
    UnknownProject(String),

    /// The vendor call did not finish in time
    #[error("Vendor request timed out after {0} seconds")]
    Timeout(u64),
}

/// Failure cause attached to a lifecycle outcome
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// The provider properties could not be decoded
    #[error("Options error: {0}")]
    Options(#[from] OptionsError),

    /// Export of the job content failed
    #[error("Serialize error: {0}")]
    Serialize(#[from] SerializeError),

    /// Import of a returned document failed
    #[error("Deserialize error: {0}")]
    Deserialize(#[from] DeserializeError),

    /// The vendor boundary failed or refused
    #[error("Boundary error: {0}")]
    Boundary(#[from] BoundaryError),

    /// The remote job is not finished yet; expected while polling
    #[error("Job {0} is not ready yet")]
    NotReady(u64),

    /// The job has no provider properties, or they carry no project id
    #[error("No job properties: {0}")]
    MissingOptions(String),

    /// The operation is not legal from the job's current state
    #[error("Invalid state: {0}")]
    InvalidState(#[from] crate::job::state::InvalidTransition),

    /// The vendor reports the remote job as permanently failed
    #[error("Remote job failed: {0}")]
    RemoteFailed(String),
}

impl ConnectorError {
    /// Whether this is the steady "not finished yet" polling state
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }

    /// Whether the host may simply try the same operation again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NotReady(_) | Self::Boundary(_) | Self::Deserialize(_)
        )
    }
}

/// Main application error type used by the binary and the controller
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading or validating configuration
    #[error("Config error: {0}")]
    Config(String),

    /// A lifecycle operation reported failure
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
