//! Job types for the scheduler.

use alsvid_hal::ExecutionResult;
use alsvid_ir::CircuitMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedError;

/// Unique identifier for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Create a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a job ID from a string.
    pub fn parse(s: &str) -> Result<Self, SchedError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SchedError::InvalidJobId(s.to_string()))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job priority. **Lower values are served first.**
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub u32);

impl Priority {
    /// High priority (0, runs first).
    pub const HIGH: Priority = Priority(0);

    /// Normal priority (1, the default).
    pub const NORMAL: Priority = Priority(1);

    /// Low priority (2, runs last).
    pub const LOW: Priority = Priority(2);

    /// Create a priority with an arbitrary numeric value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// The executable payload of a job: a compiled instruction stream plus the
/// name of the device capability that should run it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// The emitted instruction stream.
    pub program: String,
    /// Device selector, resolved in the registry by the executing worker.
    pub device: String,
    /// Metrics of the optimized circuit, captured at submit time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<CircuitMetrics>,
}

impl JobPayload {
    /// Create a new payload.
    pub fn new(program: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            device: device.into(),
            metrics: None,
        }
    }

    /// Attach circuit metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: CircuitMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// Persisted status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Waiting in the priority queue (or between retry attempts).
    Queued,
    /// Owned by a worker for one execution attempt.
    Running,
    /// Terminal: execution returned a result.
    Completed,
    /// Terminal: retry budget exhausted.
    Failed,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Get the status name.
    pub fn name(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Parse a status from its name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(JobStatus::Queued),
            "running" => Some(JobStatus::Running),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One submitted unit of work.
///
/// The queue exclusively owns unscheduled records; exactly one worker owns a
/// record for the duration of one execution attempt, and only that worker
/// increments `attempt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job identifier.
    pub id: JobId,
    /// The executable payload.
    pub payload: JobPayload,
    /// Scheduling priority (lower value first).
    pub priority: Priority,
    /// Maximum number of automatic retries on execution failure.
    pub max_retries: u32,
    /// Failed attempts so far. Starts at 0.
    pub attempt: u32,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new record at submission time.
    pub fn new(payload: JobPayload, priority: Priority, max_retries: u32) -> Self {
        Self {
            id: JobId::new(),
            payload,
            priority,
            max_retries,
            attempt: 0,
            submitted_at: Utc::now(),
        }
    }
}

/// Terminal outcome of a job, held in its result slot until the first
/// `await_result` call consumes it.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// Execution returned a result.
    Completed(ExecutionResult),
    /// Retry budget exhausted; the last error text is retained.
    Failed(String),
}

impl JobOutcome {
    /// Check if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }
}
