//! Per-job execution journal.
//!
//! One JSON document per job: created at submit time, updated with the
//! terminal outcome. Journaling is fire-and-forget — failures are logged
//! locally and never propagate as job failures.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SchedResult;
use crate::job::{JobId, JobPayload};

/// Trait for the per-job journal collaborator.
#[async_trait]
pub trait JobJournal: Send + Sync {
    /// Record a submission.
    async fn log_submit(&self, id: &JobId, payload: &JobPayload);

    /// Record a successful completion.
    async fn log_complete(&self, id: &JobId, summary: &str);

    /// Record a terminal failure.
    async fn log_error(&self, id: &JobId, error: &str);
}

/// Journal that discards everything. Useful in tests.
#[derive(Default)]
pub struct NullJournal;

#[async_trait]
impl JobJournal for NullJournal {
    async fn log_submit(&self, _id: &JobId, _payload: &JobPayload) {}

    async fn log_complete(&self, _id: &JobId, _summary: &str) {}

    async fn log_error(&self, _id: &JobId, _error: &str) {}
}

/// One journal document.
#[derive(Debug, Serialize, Deserialize)]
struct JournalEntry {
    job: String,
    device: String,
    submitted: String,
    status: String,
    program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gate_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qubits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// File-backed journal: one JSON document per job under `dir`.
pub struct JsonJournal {
    dir: PathBuf,
}

impl JsonJournal {
    /// Create a journal writing under the given directory.
    ///
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &JobId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn write(&self, id: &JobId, entry: &JournalEntry) -> SchedResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(entry)?;
        tokio::fs::write(self.path_for(id), json).await?;
        Ok(())
    }

    async fn read(&self, id: &JobId) -> SchedResult<JournalEntry> {
        let json = tokio::fs::read_to_string(self.path_for(id)).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn finish(&self, id: &JobId, status: &str, summary: Option<&str>, error: Option<&str>) {
        let mut entry = match self.read(id).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Journal entry for job {id} missing at completion: {e}");
                JournalEntry {
                    job: id.to_string(),
                    device: String::new(),
                    submitted: String::new(),
                    status: String::new(),
                    program: String::new(),
                    gate_count: None,
                    depth: None,
                    qubits: None,
                    finished: None,
                    result_summary: None,
                    error: None,
                }
            }
        };

        entry.status = status.to_string();
        entry.finished = Some(Utc::now().to_rfc3339());
        entry.result_summary = summary.map(str::to_string);
        entry.error = error.map(str::to_string);

        if let Err(e) = self.write(id, &entry).await {
            warn!("Failed to update journal for job {id}: {e}");
        }
    }
}

#[async_trait]
impl JobJournal for JsonJournal {
    async fn log_submit(&self, id: &JobId, payload: &JobPayload) {
        let entry = JournalEntry {
            job: id.to_string(),
            device: payload.device.clone(),
            submitted: Utc::now().to_rfc3339(),
            status: "submitted".to_string(),
            program: payload.program.clone(),
            gate_count: payload.metrics.map(|m| m.gate_count),
            depth: payload.metrics.and_then(|m| m.depth),
            qubits: payload.metrics.map(|m| m.qubits),
            finished: None,
            result_summary: None,
            error: None,
        };
        if let Err(e) = self.write(id, &entry).await {
            warn!("Failed to write submit journal for job {id}: {e}");
        }
    }

    async fn log_complete(&self, id: &JobId, summary: &str) {
        self.finish(id, "completed", Some(summary), None).await;
    }

    async fn log_error(&self, id: &JobId, error: &str) {
        self.finish(id, "failed", None, Some(error)).await;
    }
}
