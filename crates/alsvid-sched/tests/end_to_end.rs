//! End-to-end flow: build IR, optimize, submit, await the result.

use std::sync::Arc;

use async_trait::async_trait;

use alsvid_compile::optimize;
use alsvid_hal::{
    CompiledCircuit, Counts, Device, DeviceRegistry, ExecutionResult, HalError, HalResult,
};
use alsvid_ir::Circuit;
use alsvid_sched::{
    JobPayload, JobStatus, MemoryStore, NullJournal, Priority, Scheduler, SchedulerConfig,
};

/// Toy device: parses the submitted circuit JSON and reports one
/// deterministic all-zeros outcome per requested shot.
struct TableTopDevice;

#[async_trait]
impl Device for TableTopDevice {
    fn name(&self) -> &str {
        "tabletop"
    }

    fn max_qubits(&self) -> u32 {
        16
    }

    async fn compile(&self, source: &str) -> HalResult<CompiledCircuit> {
        let circuit = Circuit::from_json(source)
            .map_err(|e| HalError::CompilationFailed(e.to_string()))?;
        if circuit.num_qubits() > self.max_qubits() {
            return Err(HalError::CircuitTooLarge {
                device: self.name().to_string(),
                qubits: circuit.num_qubits(),
                max_qubits: self.max_qubits(),
            });
        }
        Ok(CompiledCircuit::new(self.name(), source))
    }

    async fn run(&self, compiled: &CompiledCircuit) -> HalResult<ExecutionResult> {
        let circuit = Circuit::from_json(&compiled.program)
            .map_err(|e| HalError::ExecutionFailed(e.to_string()))?;
        let shots = circuit.shots.unwrap_or(1024);
        let zeros = "0".repeat(circuit.num_qubits() as usize);
        Ok(ExecutionResult::new(
            Counts::from_pairs([(zeros, u64::from(shots))]),
            shots,
        ))
    }
}

fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        workers: 2,
        backoff_unit: std::time::Duration::from_millis(1),
        idle_poll: std::time::Duration::from_millis(5),
        await_timeout: std::time::Duration::from_secs(5),
    }
}

#[tokio::test]
async fn optimized_circuit_runs_to_completion() {
    // Circuit with removable structure on sparse wires.
    let mut circuit = Circuit::new("e2e", 8).unwrap();
    circuit.h(5).unwrap().h(5).unwrap();
    circuit.rz(3, 0.5).unwrap();
    circuit.cx(3, 6).unwrap();
    circuit.rz(3, 0.25).unwrap();
    circuit.measure(3).unwrap().measure(6).unwrap();
    circuit.shots = Some(256);

    optimize(&mut circuit).unwrap();
    assert_eq!(circuit.num_qubits(), 2);
    assert_eq!(circuit.gate_count(), 4);

    let metrics = circuit.metrics();
    let program = serde_json::to_string(&circuit).unwrap();

    let mut registry = DeviceRegistry::new();
    registry.register(Arc::new(TableTopDevice));
    let store = Arc::new(MemoryStore::new());

    let scheduler = Scheduler::new(
        fast_config(),
        Arc::new(registry),
        store.clone(),
        Arc::new(NullJournal),
    );

    let job_id = scheduler
        .submit(
            JobPayload::new(program, "tabletop").with_metrics(metrics),
            Priority::NORMAL,
            2,
        )
        .await;

    let result = scheduler.await_result(&job_id).await.unwrap();
    assert_eq!(result.shots, 256);
    assert_eq!(result.counts.get("00"), 256);

    // The terminal outcome was durably recorded with the submit metrics.
    let row = scheduler.job(&job_id).await.unwrap().unwrap();
    assert_eq!(row.status, JobStatus::Completed);
    assert_eq!(row.gate_count, Some(4));
    assert_eq!(row.qubits, Some(2));
    assert!(row.completed_at.is_some());
}

#[tokio::test]
async fn malformed_program_exhausts_retries() {
    let mut registry = DeviceRegistry::new();
    registry.register(Arc::new(TableTopDevice));

    let scheduler = Scheduler::new(
        fast_config(),
        Arc::new(registry),
        Arc::new(MemoryStore::new()),
        Arc::new(NullJournal),
    );

    // Not valid circuit JSON: fails in the device's compile step every time.
    let job_id = scheduler
        .submit(JobPayload::new("not json", "tabletop"), Priority::HIGH, 1)
        .await;

    let err = scheduler.await_result(&job_id).await.unwrap_err();
    assert!(err.to_string().contains("Compilation failed"), "got: {err}");
}
