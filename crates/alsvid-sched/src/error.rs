//! Error handling for the scheduler.

use thiserror::Error;

/// Result type for scheduler operations.
pub type SchedResult<T> = Result<T, SchedError>;

/// Errors that can occur during scheduler operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchedError {
    /// Job not found in the scheduler.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job reached its terminal failure state.
    #[error("Job {id} failed: {reason}")]
    JobFailed {
        /// The job identifier.
        id: String,
        /// The last error observed before the retry budget ran out.
        reason: String,
    },

    /// No terminal outcome appeared within the configured wait window.
    ///
    /// Also what a second `await_result` call for an already-consumed job
    /// runs into: results are taken exactly once.
    #[error("Timed out waiting for result of job {0}")]
    AwaitTimeout(String),

    /// Device error during execution.
    #[error("Device error: {0}")]
    Device(String),

    /// Persistence error.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// SQLite database error.
    #[error("Database error: {0}")]
    Database(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed job identifier.
    #[error("Invalid job id: {0}")]
    InvalidJobId(String),

    /// Internal scheduler error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<alsvid_hal::HalError> for SchedError {
    fn from(e: alsvid_hal::HalError) -> Self {
        SchedError::Device(e.to_string())
    }
}

impl From<rusqlite::Error> for SchedError {
    fn from(e: rusqlite::Error) -> Self {
        SchedError::Database(e.to_string())
    }
}
