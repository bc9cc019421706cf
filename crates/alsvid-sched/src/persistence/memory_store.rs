//! In-memory job store for tests and ephemeral deployments.

use std::sync::Mutex;

use async_trait::async_trait;
use rustc_hash::FxHashMap;

use crate::error::{SchedError, SchedResult};
use crate::job::JobId;
use crate::persistence::{JobRow, JobStore, JobUpdate};

/// In-memory job store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<FxHashMap<JobId, JobRow>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SchedResult<std::sync::MutexGuard<'_, FxHashMap<JobId, JobRow>>> {
        self.rows
            .lock()
            .map_err(|e| SchedError::Persistence(e.to_string()))
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert(&self, row: &JobRow) -> SchedResult<()> {
        self.lock()?.insert(row.id.clone(), row.clone());
        Ok(())
    }

    async fn update(&self, id: &JobId, update: JobUpdate) -> SchedResult<()> {
        let mut rows = self.lock()?;
        let row = rows
            .get_mut(id)
            .ok_or_else(|| SchedError::JobNotFound(id.to_string()))?;
        update.apply(row);
        Ok(())
    }

    async fn get(&self, id: &JobId) -> SchedResult<Option<JobRow>> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn list(&self, limit: usize) -> SchedResult<Vec<JobRow>> {
        let mut rows: Vec<_> = self.lock()?.values().cloned().collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobPayload, JobRecord, JobStatus, Priority};

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let record = JobRecord::new(JobPayload::new("prog", "sim"), Priority::LOW, 1);
        let row = JobRow::from_record(&record);

        store.insert(&row).await.unwrap();
        store
            .update(&row.id, JobUpdate::completed())
            .await
            .unwrap();

        let loaded = store.get(&row.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Completed);
        assert!(loaded.completed_at.is_some());

        assert_eq!(store.list(10).await.unwrap().len(), 1);
    }
}
