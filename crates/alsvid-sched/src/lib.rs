//! Alsvid Priority Job Scheduler
//!
//! A single-process, in-memory scheduler: one shared priority queue drained
//! by a pool of tokio worker tasks. Jobs carry a compiled instruction
//! stream and a device selector; workers delegate execution to the device
//! capability (`compile → run → monitor`) and route the outcome back to
//! blocked callers.
//!
//! # Guarantees
//!
//! - **Ordering**: strictly lower priority value first; FIFO by enqueue
//!   sequence among equal priorities. A retried job re-enters with a fresh
//!   sequence number and competes on requeue time.
//! - **Retries**: execution failures retry automatically with exponential
//!   backoff (`backoff_unit · 2^(n-1)`) until the per-job budget is
//!   exhausted; the last error is the terminal outcome.
//! - **Delivery**: every terminal outcome is durably recorded through the
//!   [`JobStore`] and then retrievable exactly once via
//!   [`Scheduler::await_result`].
//! - **Containment**: a worker never crashes on a job error, and
//!   store/journal failures never fail a job.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use alsvid_hal::DeviceRegistry;
//! use alsvid_sched::{
//!     JobPayload, JsonJournal, Priority, Scheduler, SchedulerConfig, SqliteStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = DeviceRegistry::new();
//!
//! let scheduler = Scheduler::new(
//!     SchedulerConfig::default(),
//!     Arc::new(registry),
//!     Arc::new(SqliteStore::new("jobs.db")?),
//!     Arc::new(JsonJournal::new(".alsvid_logs")),
//! );
//!
//! let job_id = scheduler
//!     .submit(JobPayload::new("...program...", "simulator"), Priority::HIGH, 3)
//!     .await;
//! let result = scheduler.await_result(&job_id).await?;
//! println!("counts: {:?}", result.counts);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod job;
pub mod journal;
pub mod persistence;
pub mod queue;
pub mod scheduler;

pub use error::{SchedError, SchedResult};
pub use job::{JobId, JobOutcome, JobPayload, JobRecord, JobStatus, Priority};
pub use journal::{JobJournal, JsonJournal, NullJournal};
pub use persistence::{JobRow, JobStore, JobUpdate, MemoryStore, SqliteStore};
pub use queue::JobQueue;
pub use scheduler::{Scheduler, SchedulerConfig};
