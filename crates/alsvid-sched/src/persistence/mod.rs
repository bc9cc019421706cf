//! Persistence layer for job records.
//!
//! The scheduler records every submission and terminal transition through a
//! [`JobStore`]. Store failures are logged by the caller and never surface
//! as job failures.

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedResult;
use crate::job::{JobId, JobRecord, JobStatus};

/// The persisted form of a job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRow {
    /// Job identifier.
    pub id: JobId,
    /// Device selector.
    pub device: String,
    /// Numeric priority (lower runs first).
    pub priority: u32,
    /// Current status.
    pub status: JobStatus,
    /// Failed attempts so far.
    pub attempts: u32,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Timestamp of the terminal transition.
    pub completed_at: Option<DateTime<Utc>>,
    /// Terminal error text, if the job failed.
    pub error: Option<String>,
    /// Gate count of the submitted program, if known.
    pub gate_count: Option<u32>,
    /// Circuit depth of the submitted program, if known.
    pub depth: Option<u32>,
    /// Qubit count of the submitted program, if known.
    pub qubits: Option<u32>,
}

impl JobRow {
    /// Build the initial row for a freshly submitted record.
    pub fn from_record(record: &JobRecord) -> Self {
        let metrics = record.payload.metrics;
        Self {
            id: record.id.clone(),
            device: record.payload.device.clone(),
            priority: record.priority.value(),
            status: JobStatus::Queued,
            attempts: 0,
            submitted_at: record.submitted_at,
            completed_at: None,
            error: None,
            gate_count: metrics.map(|m| m.gate_count as u32),
            depth: metrics.and_then(|m| m.depth),
            qubits: metrics.map(|m| m.qubits),
        }
    }
}

/// A partial update applied to a persisted job row.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    /// New status, if it changed.
    pub status: Option<JobStatus>,
    /// New attempt count, if it changed.
    pub attempts: Option<u32>,
    /// Terminal transition timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Terminal error text.
    pub error: Option<String>,
}

impl JobUpdate {
    /// Update the status only.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Record the attempt count alongside this update.
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Terminal completion update.
    pub fn completed() -> Self {
        Self {
            status: Some(JobStatus::Completed),
            completed_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Terminal failure update with the last error text.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            completed_at: Some(Utc::now()),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Apply this update to a row.
    pub fn apply(self, row: &mut JobRow) {
        if let Some(status) = self.status {
            row.status = status;
        }
        if let Some(attempts) = self.attempts {
            row.attempts = attempts;
        }
        if let Some(completed_at) = self.completed_at {
            row.completed_at = Some(completed_at);
        }
        if let Some(error) = self.error {
            row.error = Some(error);
        }
    }
}

/// Trait for persistent job storage.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a freshly submitted job.
    async fn insert(&self, row: &JobRow) -> SchedResult<()>;

    /// Apply a partial update to a job.
    async fn update(&self, id: &JobId, update: JobUpdate) -> SchedResult<()>;

    /// Load a job by ID.
    async fn get(&self, id: &JobId) -> SchedResult<Option<JobRow>>;

    /// List jobs, newest first.
    async fn list(&self, limit: usize) -> SchedResult<Vec<JobRow>>;
}
