//! SQLite-based persistence for production use.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::error::{SchedError, SchedResult};
use crate::job::JobId;
use crate::persistence::{JobRow, JobStore, JobUpdate};

/// SQLite-based job store.
///
/// Provides persistent storage with ACID guarantees. Recommended for
/// production use.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new(path: impl AsRef<Path>) -> SchedResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create a new in-memory SQLite store.
    pub fn in_memory() -> SchedResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SchedResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                device TEXT NOT NULL,
                priority INTEGER NOT NULL,
                status TEXT NOT NULL,
                attempts INTEGER NOT NULL,
                submitted_at TEXT NOT NULL,
                completed_at TEXT,
                error TEXT,
                gate_count INTEGER,
                depth INTEGER,
                qubits INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
            CREATE INDEX IF NOT EXISTS idx_jobs_submitted_at ON jobs(submitted_at);
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> SchedResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SchedError::Database(e.to_string()))
    }

    fn save(&self, row: &JobRow) -> SchedResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO jobs
                (id, device, priority, status, attempts, submitted_at,
                 completed_at, error, gate_count, depth, qubits)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            rusqlite::params![
                row.id.to_string(),
                row.device,
                row.priority,
                row.status.name(),
                row.attempts,
                row.submitted_at.to_rfc3339(),
                row.completed_at.map(|t| t.to_rfc3339()),
                row.error,
                row.gate_count,
                row.depth,
                row.qubits,
            ],
        )?;
        Ok(())
    }

    fn load(&self, id: &JobId) -> SchedResult<Option<JobRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, device, priority, status, attempts, submitted_at, \
             completed_at, error, gate_count, depth, qubits \
             FROM jobs WHERE id = ?1",
        )?;
        let mut rows = stmt.query(rusqlite::params![id.to_string()])?;

        match rows.next()? {
            Some(row) => Ok(Some(Self::row_from_sql(row)?)),
            None => Ok(None),
        }
    }

    fn row_from_sql(row: &rusqlite::Row<'_>) -> SchedResult<JobRow> {
        let id: String = row.get(0)?;
        let status: String = row.get(3)?;
        let submitted_at: String = row.get(5)?;
        let completed_at: Option<String> = row.get(6)?;

        Ok(JobRow {
            id: JobId::parse(&id)?,
            device: row.get(1)?,
            priority: row.get(2)?,
            status: crate::job::JobStatus::parse(&status)
                .ok_or_else(|| SchedError::Database(format!("unknown status '{status}'")))?,
            attempts: row.get(4)?,
            submitted_at: chrono::DateTime::parse_from_rfc3339(&submitted_at)
                .map_err(|e| SchedError::Database(e.to_string()))?
                .with_timezone(&chrono::Utc),
            completed_at: completed_at
                .map(|t| {
                    chrono::DateTime::parse_from_rfc3339(&t)
                        .map(|t| t.with_timezone(&chrono::Utc))
                        .map_err(|e| SchedError::Database(e.to_string()))
                })
                .transpose()?,
            error: row.get(7)?,
            gate_count: row.get(8)?,
            depth: row.get(9)?,
            qubits: row.get(10)?,
        })
    }
}

#[async_trait]
impl JobStore for SqliteStore {
    async fn insert(&self, row: &JobRow) -> SchedResult<()> {
        self.save(row)
    }

    async fn update(&self, id: &JobId, update: JobUpdate) -> SchedResult<()> {
        let mut row = self
            .load(id)?
            .ok_or_else(|| SchedError::JobNotFound(id.to_string()))?;
        update.apply(&mut row);
        self.save(&row)
    }

    async fn get(&self, id: &JobId) -> SchedResult<Option<JobRow>> {
        self.load(id)
    }

    async fn list(&self, limit: usize) -> SchedResult<Vec<JobRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, device, priority, status, attempts, submitted_at, \
             completed_at, error, gate_count, depth, qubits \
             FROM jobs ORDER BY datetime(submitted_at) DESC LIMIT ?1",
        )?;
        let mut rows = stmt.query(rusqlite::params![limit as i64])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(Self::row_from_sql(row)?);
        }
        Ok(out)
    }
}
