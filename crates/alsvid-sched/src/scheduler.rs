//! Scheduler implementation.
//!
//! A [`Scheduler`] owns one priority queue and one result-slot map, and
//! drains the queue with a pool of worker tasks. Collaborators — the device
//! registry, the job store, the journal — are injected at construction, so
//! there is no process-wide shared state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use alsvid_hal::{Device, DeviceRegistry, ExecutionResult, HalResult};
use rustc_hash::FxHashMap;

use crate::error::{SchedError, SchedResult};
use crate::job::{JobId, JobOutcome, JobPayload, JobRecord, JobStatus, Priority};
use crate::journal::JobJournal;
use crate::persistence::{JobRow, JobStore, JobUpdate};
use crate::queue::JobQueue;

/// Configuration for the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Number of worker tasks draining the queue.
    ///
    /// With a single worker, one job's retry backoff serializes against
    /// every other queued job; more workers keep unrelated jobs flowing
    /// while a failed one waits out its backoff.
    pub workers: usize,

    /// Base delay unit for exponential retry backoff.
    ///
    /// A job's n-th failure waits `backoff_unit * 2^(n-1)` before its
    /// record re-enters the queue.
    pub backoff_unit: Duration,

    /// How long an idle worker sleeps between queue checks when no wakeup
    /// arrives.
    pub idle_poll: Duration,

    /// Upper bound on `await_result` blocking time.
    pub await_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            backoff_unit: Duration::from_secs(1),
            idle_poll: Duration::from_millis(100),
            await_timeout: Duration::from_secs(300),
        }
    }
}

/// State shared between the scheduler handle and its workers.
struct Shared {
    config: SchedulerConfig,
    devices: Arc<DeviceRegistry>,
    store: Arc<dyn JobStore>,
    journal: Arc<dyn JobJournal>,
    queue: Mutex<JobQueue>,
    queue_notify: Notify,
    results: Mutex<FxHashMap<JobId, JobOutcome>>,
    results_notify: Notify,
}

/// Priority job scheduler with a concurrent worker pool.
///
/// Jobs are served strictly by ascending priority value, FIFO among equal
/// priorities. Execution failures retry automatically with exponential
/// backoff until the budget is exhausted; every terminal outcome is
/// durably recorded and then delivered exactly once through
/// [`await_result`](Scheduler::await_result).
pub struct Scheduler {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Create a scheduler and spawn its worker pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: SchedulerConfig,
        devices: Arc<DeviceRegistry>,
        store: Arc<dyn JobStore>,
        journal: Arc<dyn JobJournal>,
    ) -> Self {
        let worker_count = config.workers.max(1);
        let shared = Arc::new(Shared {
            config,
            devices,
            store,
            journal,
            queue: Mutex::new(JobQueue::new()),
            queue_notify: Notify::new(),
            results: Mutex::new(FxHashMap::default()),
            results_notify: Notify::new(),
        });

        let workers = (0..worker_count)
            .map(|worker_id| {
                let shared = shared.clone();
                tokio::spawn(worker_loop(shared, worker_id))
            })
            .collect();

        info!("Scheduler started with {} workers", worker_count);
        Self { shared, workers }
    }

    /// Enqueue a new job. Never blocks and always succeeds; the payload is
    /// not validated at this layer.
    pub async fn submit(
        &self,
        payload: JobPayload,
        priority: Priority,
        max_retries: u32,
    ) -> JobId {
        let record = JobRecord::new(payload, priority, max_retries);
        let id = record.id.clone();

        if let Err(e) = self.shared.store.insert(&JobRow::from_record(&record)).await {
            warn!("Failed to persist submission of job {id}: {e}");
        }
        self.shared.journal.log_submit(&id, &record.payload).await;

        {
            let mut queue = self.shared.queue.lock().await;
            queue.push(record);
        }
        self.shared.queue_notify.notify_one();

        info!("Job {id} submitted (priority {})", priority.value());
        id
    }

    /// Block until a terminal outcome exists for `job_id`, then take it.
    ///
    /// Outcomes are consumed exactly once: the first caller removes the
    /// result slot. A second call for the same id finds nothing and waits
    /// until [`SchedulerConfig::await_timeout`] elapses.
    pub async fn await_result(&self, job_id: &JobId) -> SchedResult<ExecutionResult> {
        let deadline = tokio::time::Instant::now() + self.shared.config.await_timeout;

        loop {
            // Register the waiter before checking the slot so a completion
            // landing in between cannot be missed.
            let notified = self.shared.results_notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut results = self.shared.results.lock().await;
                if let Some(outcome) = results.remove(job_id) {
                    return match outcome {
                        JobOutcome::Completed(result) => Ok(result),
                        JobOutcome::Failed(reason) => Err(SchedError::JobFailed {
                            id: job_id.to_string(),
                            reason,
                        }),
                    };
                }
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(SchedError::AwaitTimeout(job_id.to_string()));
                }
            }
        }
    }

    /// Load the persisted record of a job.
    pub async fn job(&self, job_id: &JobId) -> SchedResult<Option<JobRow>> {
        self.shared.store.get(job_id).await
    }

    /// List persisted jobs, newest first.
    pub async fn list_jobs(&self, limit: usize) -> SchedResult<Vec<JobRow>> {
        self.shared.store.list(limit).await
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for worker in &self.workers {
            worker.abort();
        }
    }
}

/// One worker: drain the queue forever, parking when it is empty.
async fn worker_loop(shared: Arc<Shared>, worker_id: usize) {
    loop {
        let record = {
            let mut queue = shared.queue.lock().await;
            queue.pop()
        };

        match record {
            Some(record) => process(&shared, record, worker_id).await,
            None => {
                let notified = shared.queue_notify.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();

                if !shared.queue.lock().await.is_empty() {
                    continue;
                }

                tokio::select! {
                    _ = &mut notified => {}
                    _ = tokio::time::sleep(shared.config.idle_poll) => {}
                }
            }
        }
    }
}

/// Run one execution attempt and route the outcome.
///
/// The worker exclusively owns `record` for the duration of the attempt; it
/// is the only party that mutates the attempt counter. Errors never escape:
/// the job is retried or finalized and the worker keeps draining.
async fn process(shared: &Arc<Shared>, mut record: JobRecord, worker_id: usize) {
    debug!("Worker {worker_id} running job {} (attempt {})", record.id, record.attempt);
    store_update(
        shared,
        &record.id,
        JobUpdate::status(JobStatus::Running).with_attempts(record.attempt),
    )
    .await;

    // Unknown device selector: a usage error, not a transient condition.
    // Fail fast instead of burning retries on a name that cannot resolve.
    let device = match shared.devices.get(&record.payload.device) {
        Ok(device) => device,
        Err(e) => {
            error!("Job {}: {e}", record.id);
            finalize_failure(shared, &record, e.to_string()).await;
            return;
        }
    };

    match execute(device.as_ref(), &record.payload).await {
        Ok((result, summary)) => {
            finalize_success(shared, &record, result, &summary).await;
        }
        Err(e) => {
            record.attempt += 1;
            if record.attempt <= record.max_retries {
                let backoff = shared
                    .config
                    .backoff_unit
                    .saturating_mul(2u32.saturating_pow(record.attempt - 1));
                warn!(
                    "Job {} attempt {} failed: {e}; retrying in {:?}",
                    record.id, record.attempt, backoff
                );
                store_update(
                    shared,
                    &record.id,
                    JobUpdate::status(JobStatus::Queued).with_attempts(record.attempt),
                )
                .await;

                // Backoff sleeps on this worker only; other workers keep
                // draining unrelated jobs.
                tokio::time::sleep(backoff).await;
                {
                    let mut queue = shared.queue.lock().await;
                    queue.push(record);
                }
                shared.queue_notify.notify_one();
            } else {
                error!(
                    "Job {} failed permanently after {} attempts: {e}",
                    record.id, record.attempt
                );
                finalize_failure(shared, &record, e.to_string()).await;
            }
        }
    }
}

/// The three-step device delegation: compile, run, monitor.
///
/// An error raised by any step is uniformly an execution failure for retry
/// purposes.
async fn execute(device: &dyn Device, payload: &JobPayload) -> HalResult<(ExecutionResult, String)> {
    let compiled = device.compile(&payload.program).await?;
    let result = device.run(&compiled).await?;
    let summary = device.monitor(&result).await?;
    Ok((result, summary))
}

/// Durably record a completion, then fill the result slot.
///
/// The store and journal are updated before the slot releases any waiter,
/// so a caller that observes the outcome can rely on the record existing.
async fn finalize_success(
    shared: &Arc<Shared>,
    record: &JobRecord,
    result: ExecutionResult,
    summary: &str,
) {
    store_update(
        shared,
        &record.id,
        JobUpdate::completed().with_attempts(record.attempt),
    )
    .await;
    shared.journal.log_complete(&record.id, summary).await;

    {
        let mut results = shared.results.lock().await;
        results.insert(record.id.clone(), JobOutcome::Completed(result));
    }
    shared.results_notify.notify_waiters();
    info!("Job {} completed", record.id);
}

/// Durably record a terminal failure, then fill the result slot.
async fn finalize_failure(shared: &Arc<Shared>, record: &JobRecord, reason: String) {
    store_update(
        shared,
        &record.id,
        JobUpdate::failed(reason.clone()).with_attempts(record.attempt),
    )
    .await;
    shared.journal.log_error(&record.id, &reason).await;

    {
        let mut results = shared.results.lock().await;
        results.insert(record.id.clone(), JobOutcome::Failed(reason));
    }
    shared.results_notify.notify_waiters();
}

/// Fire-and-forget store update; failures are logged, never propagated.
async fn store_update(shared: &Arc<Shared>, id: &JobId, update: JobUpdate) {
    if let Err(e) = shared.store.update(id, update).await {
        warn!("Persistence update failed for job {id}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::NullJournal;
    use crate::persistence::MemoryStore;
    use alsvid_hal::{CompiledCircuit, Counts, HalError};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

    /// Device that appends each executed program to a shared log.
    struct RecordingDevice {
        log: Arc<StdMutex<Vec<String>>>,
        delay: Duration,
    }

    #[async_trait]
    impl Device for RecordingDevice {
        fn name(&self) -> &str {
            "recorder"
        }

        fn max_qubits(&self) -> u32 {
            8
        }

        async fn compile(&self, source: &str) -> HalResult<CompiledCircuit> {
            Ok(CompiledCircuit::new("recorder", source))
        }

        async fn run(&self, compiled: &CompiledCircuit) -> HalResult<ExecutionResult> {
            tokio::time::sleep(self.delay).await;
            self.log
                .lock()
                .expect("log lock")
                .push(compiled.program.clone());
            Ok(ExecutionResult::new(Counts::from_pairs([("0", 1u64)]), 1))
        }
    }

    /// Device whose `run` fails a fixed number of times, then succeeds.
    struct FlakyDevice {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyDevice {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Device for FlakyDevice {
        fn name(&self) -> &str {
            "flaky"
        }

        fn max_qubits(&self) -> u32 {
            8
        }

        async fn compile(&self, source: &str) -> HalResult<CompiledCircuit> {
            Ok(CompiledCircuit::new("flaky", source))
        }

        async fn run(&self, _compiled: &CompiledCircuit) -> HalResult<ExecutionResult> {
            let call = self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            if call < self.failures {
                return Err(HalError::ExecutionFailed(format!(
                    "transient failure #{}",
                    call + 1
                )));
            }
            Ok(ExecutionResult::new(Counts::from_pairs([("0", 1u64)]), 1))
        }
    }

    /// Device whose `monitor` step always fails.
    struct BrokenMonitorDevice;

    #[async_trait]
    impl Device for BrokenMonitorDevice {
        fn name(&self) -> &str {
            "broken-monitor"
        }

        fn max_qubits(&self) -> u32 {
            8
        }

        async fn compile(&self, source: &str) -> HalResult<CompiledCircuit> {
            Ok(CompiledCircuit::new("broken-monitor", source))
        }

        async fn run(&self, _compiled: &CompiledCircuit) -> HalResult<ExecutionResult> {
            Ok(ExecutionResult::new(Counts::new(), 0))
        }

        async fn monitor(&self, _result: &ExecutionResult) -> HalResult<String> {
            Err(HalError::MonitoringFailed("probe offline".to_string()))
        }
    }

    fn test_config(workers: usize) -> SchedulerConfig {
        SchedulerConfig {
            workers,
            backoff_unit: Duration::from_millis(1),
            idle_poll: Duration::from_millis(5),
            await_timeout: Duration::from_secs(5),
        }
    }

    fn registry_with(device: Arc<dyn Device>) -> Arc<DeviceRegistry> {
        let mut registry = DeviceRegistry::new();
        registry.register(device);
        Arc::new(registry)
    }

    fn scheduler_with(
        config: SchedulerConfig,
        devices: Arc<DeviceRegistry>,
        store: Arc<dyn JobStore>,
    ) -> Scheduler {
        Scheduler::new(config, devices, store, Arc::new(NullJournal))
    }

    #[tokio::test]
    async fn test_priority_order_with_single_worker() {
        let log = Arc::new(StdMutex::new(Vec::new()));
        let device = Arc::new(RecordingDevice {
            log: log.clone(),
            delay: Duration::from_millis(20),
        });
        let scheduler = scheduler_with(
            test_config(1),
            registry_with(device),
            Arc::new(MemoryStore::new()),
        );

        let high_1 = scheduler
            .submit(JobPayload::new("high-1", "recorder"), Priority::HIGH, 0)
            .await;
        let low = scheduler
            .submit(JobPayload::new("low", "recorder"), Priority::LOW, 0)
            .await;
        let high_2 = scheduler
            .submit(JobPayload::new("high-2", "recorder"), Priority::HIGH, 0)
            .await;

        scheduler.await_result(&high_1).await.unwrap();
        scheduler.await_result(&high_2).await.unwrap();
        scheduler.await_result(&low).await.unwrap();

        let order = log.lock().unwrap().clone();
        assert_eq!(order, vec!["high-1", "high-2", "low"]);
    }

    #[tokio::test]
    async fn test_retry_succeeds_within_budget() {
        let store = Arc::new(MemoryStore::new());
        let device = Arc::new(FlakyDevice::new(2));
        let scheduler = scheduler_with(test_config(1), registry_with(device), store.clone());

        // Fails twice, succeeds on the third run; budget of 3 covers it.
        let id = scheduler
            .submit(JobPayload::new("prog", "flaky"), Priority::NORMAL, 3)
            .await;
        let result = scheduler.await_result(&id).await.unwrap();
        assert_eq!(result.shots, 1);

        let row = store.get(&id).await.unwrap().unwrap();
        assert_eq!(row.status, JobStatus::Completed);
        assert_eq!(row.attempts, 2);
        assert!(row.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted_reports_last_error() {
        let store = Arc::new(MemoryStore::new());
        let device = Arc::new(FlakyDevice::new(2));
        let scheduler = scheduler_with(test_config(1), registry_with(device), store.clone());

        // Budget of 1: the second failure is terminal.
        let id = scheduler
            .submit(JobPayload::new("prog", "flaky"), Priority::NORMAL, 1)
            .await;
        let err = scheduler.await_result(&id).await.unwrap_err();
        match err {
            SchedError::JobFailed { reason, .. } => {
                assert!(reason.contains("transient failure #2"), "got: {reason}");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }

        let row = store.get(&id).await.unwrap().unwrap();
        assert_eq!(row.status, JobStatus::Failed);
        assert_eq!(row.attempts, 2);
        assert!(row.error.as_deref().unwrap_or("").contains("#2"));
    }

    #[tokio::test]
    async fn test_await_result_consumed_exactly_once() {
        let device = Arc::new(FlakyDevice::new(0));
        let mut config = test_config(1);
        config.await_timeout = Duration::from_millis(200);
        let scheduler = scheduler_with(config, registry_with(device), Arc::new(MemoryStore::new()));

        let id = scheduler
            .submit(JobPayload::new("prog", "flaky"), Priority::NORMAL, 0)
            .await;

        assert!(scheduler.await_result(&id).await.is_ok());

        // The slot is gone; a second consumer times out.
        let err = scheduler.await_result(&id).await.unwrap_err();
        assert!(matches!(err, SchedError::AwaitTimeout(_)));
    }

    #[tokio::test]
    async fn test_await_unknown_job_blocks_until_timeout() {
        let device = Arc::new(FlakyDevice::new(0));
        let mut config = test_config(1);
        config.await_timeout = Duration::from_millis(100);
        let scheduler = scheduler_with(config, registry_with(device), Arc::new(MemoryStore::new()));

        let start = std::time::Instant::now();
        let err = scheduler.await_result(&JobId::new()).await.unwrap_err();
        assert!(matches!(err, SchedError::AwaitTimeout(_)));
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_unknown_device_fails_fast_without_retries() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = scheduler_with(
            test_config(1),
            Arc::new(DeviceRegistry::new()),
            store.clone(),
        );

        let id = scheduler
            .submit(JobPayload::new("prog", "missing"), Priority::NORMAL, 5)
            .await;
        let err = scheduler.await_result(&id).await.unwrap_err();
        match err {
            SchedError::JobFailed { reason, .. } => {
                assert!(reason.contains("No device registered"), "got: {reason}");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }

        // No retries were burned on the unresolvable name.
        let row = store.get(&id).await.unwrap().unwrap();
        assert_eq!(row.status, JobStatus::Failed);
        assert_eq!(row.attempts, 0);
    }

    #[tokio::test]
    async fn test_monitor_failure_counts_as_execution_failure() {
        let device = Arc::new(BrokenMonitorDevice);
        let scheduler = scheduler_with(
            test_config(1),
            registry_with(device),
            Arc::new(MemoryStore::new()),
        );

        let id = scheduler
            .submit(JobPayload::new("prog", "broken-monitor"), Priority::NORMAL, 0)
            .await;
        let err = scheduler.await_result(&id).await.unwrap_err();
        match err {
            SchedError::JobFailed { reason, .. } => {
                assert!(reason.contains("Monitoring failed"), "got: {reason}");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_backoff_delays_retry() {
        let device = Arc::new(FlakyDevice::new(1));
        let mut config = test_config(1);
        config.backoff_unit = Duration::from_millis(40);
        let scheduler = scheduler_with(config, registry_with(device), Arc::new(MemoryStore::new()));

        let start = std::time::Instant::now();
        let id = scheduler
            .submit(JobPayload::new("prog", "flaky"), Priority::NORMAL, 1)
            .await;
        scheduler.await_result(&id).await.unwrap();

        // One failure → one backoff of 40ms before the successful attempt.
        assert!(start.elapsed() >= Duration::from_millis(35));
    }

    #[tokio::test]
    async fn test_concurrent_submitters() {
        let device = Arc::new(FlakyDevice::new(0));
        let scheduler = Arc::new(scheduler_with(
            test_config(2),
            registry_with(device),
            Arc::new(MemoryStore::new()),
        ));

        let mut handles = Vec::new();
        for i in 0..8 {
            let scheduler = scheduler.clone();
            handles.push(tokio::spawn(async move {
                let id = scheduler
                    .submit(
                        JobPayload::new(format!("prog-{i}"), "flaky"),
                        Priority::NORMAL,
                        0,
                    )
                    .await;
                scheduler.await_result(&id).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(scheduler.list_jobs(20).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_job_lookup() {
        let device = Arc::new(FlakyDevice::new(0));
        let scheduler = scheduler_with(
            test_config(1),
            registry_with(device),
            Arc::new(MemoryStore::new()),
        );

        let id = scheduler
            .submit(JobPayload::new("prog", "flaky"), Priority::HIGH, 0)
            .await;
        scheduler.await_result(&id).await.unwrap();

        let row = scheduler.job(&id).await.unwrap().unwrap();
        assert_eq!(row.priority, Priority::HIGH.value());
        assert_eq!(row.device, "flaky");

        assert!(scheduler.job(&JobId::new()).await.unwrap().is_none());
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.workers, 2);
        assert_eq!(config.backoff_unit, Duration::from_secs(1));
    }
}
