//! Multi-shot runner and result aggregation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use qsv_ir::Circuit;

use crate::classical::ClassicalRegister;
use crate::config::SimConfig;
use crate::counts::Counts;
use crate::error::{SimError, SimResult};
use crate::executor::Executor;
use crate::statevector::Statevector;

/// Shots between deadline checks inside a worker.
const DEADLINE_CHECK_INTERVAL: u64 = 64;

/// A contiguous block of shots run by one worker with its own RNG stream.
#[derive(Debug, Clone, Copy)]
struct ShotChunk {
    first_shot: u64,
    len: u64,
    seed: u64,
}

/// Statevector simulator.
///
/// An explicit instance per caller; nothing is shared between simulators.
/// With a seed in the config, runs are reproducible for a given worker
/// count: shots are split into fixed contiguous chunks and each chunk draws
/// from its own `StdRng`, seeded from the master seed.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    /// Create a simulator from a (validated) configuration.
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Default configuration with a fixed master seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SimConfig::seeded(seed))
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run `circuit` for `shots` shots and tally the classical outcomes.
    ///
    /// The circuit is validated before any shot runs. A faulted shot aborts
    /// the whole run with [`SimError::ShotFailed`]; a run that exceeds the
    /// configured timeout fails with [`SimError::Timeout`]. In both cases no
    /// partial counts are returned.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
    pub fn run(&self, circuit: &Circuit, shots: u64) -> SimResult<Counts> {
        let start = Instant::now();
        self.check_circuit(circuit)?;

        if shots == 0 {
            return Ok(Counts::new());
        }

        let chunks = self.plan(shots);
        let deadline = self.config.timeout().map(|t| start + t);
        let progress = AtomicU64::new(0);
        debug!(
            shots,
            workers = chunks.len(),
            instructions = circuit.instructions().len(),
            "Starting simulation"
        );

        let work = |chunk: &ShotChunk| run_chunk(circuit, chunk, deadline, &progress);
        let partials = if chunks.len() > 1 {
            chunks.par_iter().map(work).collect::<SimResult<Vec<Counts>>>()
        } else {
            chunks.iter().map(work).collect::<SimResult<Vec<Counts>>>()
        }
        .map_err(|e| with_progress(e, shots, start, &progress))?;

        let elapsed = start.elapsed();
        if let Some(timeout) = self.config.timeout() {
            if elapsed > timeout {
                return Err(timeout_error(shots, shots, elapsed));
            }
        }

        let counts = partials.into_iter().fold(Counts::new(), |mut acc, part| {
            acc.merge(part);
            acc
        });
        debug!(
            outcomes = counts.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Simulation completed"
        );
        Ok(counts)
    }

    /// Run the circuit once and return the register and classical bits as
    /// they stand after the last instruction.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn final_state(&self, circuit: &Circuit) -> SimResult<(Statevector, ClassicalRegister)> {
        self.check_circuit(circuit)?;

        let mut rng = self.master_rng();
        let mut exec = Executor::new(circuit)?;
        if let Err(source) = exec.execute_all(&mut rng) {
            return Err(SimError::ShotFailed {
                shot: 0,
                instruction: exec.position(),
                source: Box::new(source),
            });
        }
        Ok(exec.into_parts())
    }

    fn check_circuit(&self, circuit: &Circuit) -> SimResult<()> {
        circuit.validate()?;
        if circuit.num_qubits() > self.config.max_qubits as usize {
            return Err(SimError::CircuitTooLarge {
                num_qubits: circuit.num_qubits(),
                max_qubits: self.config.max_qubits,
            });
        }
        Ok(())
    }

    fn master_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Number of workers for `shots`, never more than one per
    /// `min_shots_per_worker` shots.
    fn worker_count(&self, shots: u64) -> u64 {
        if !self.config.parallel {
            return 1;
        }
        let workers = self
            .config
            .workers
            .unwrap_or_else(rayon::current_num_threads)
            .max(1) as u64;
        let by_size = (shots / u64::from(self.config.min_shots_per_worker.max(1))).max(1);
        workers.min(by_size)
    }

    /// Split `shots` into contiguous chunks and assign each a seed from the
    /// master stream.
    fn plan(&self, shots: u64) -> Vec<ShotChunk> {
        let workers = self.worker_count(shots);
        let base = shots / workers;
        let extra = shots % workers;
        let mut master = self.master_rng();

        let mut first_shot = 0;
        (0..workers)
            .map(|i| {
                let len = base + u64::from(i < extra);
                let chunk = ShotChunk {
                    first_shot,
                    len,
                    seed: master.r#gen(),
                };
                first_shot += len;
                chunk
            })
            .collect()
    }
}

/// Fill in run-wide progress on a timeout raised inside a worker.
fn with_progress(err: SimError, shots: u64, start: Instant, progress: &AtomicU64) -> SimError {
    match err {
        SimError::Timeout { .. } => {
            timeout_error(progress.load(Ordering::Relaxed), shots, start.elapsed())
        }
        other => other,
    }
}

fn timeout_error(completed: u64, requested: u64, elapsed: Duration) -> SimError {
    SimError::Timeout {
        completed,
        requested,
        elapsed_ms: elapsed.as_millis() as u64,
    }
}

fn run_chunk(
    circuit: &Circuit,
    chunk: &ShotChunk,
    deadline: Option<Instant>,
    progress: &AtomicU64,
) -> SimResult<Counts> {
    let mut exec = Executor::new(circuit)?;
    drive_chunk(chunk, deadline, progress, |rng| {
        match exec.reset().and_then(|()| exec.execute_all(rng)) {
            Ok(()) => Ok(exec.clbits().to_bitstring()),
            Err(source) => Err((exec.position(), source)),
        }
    })
}

/// Run the shots of `chunk` through `shot` and tally the bitstrings.
///
/// `shot` returns the outcome bitstring, or the faulting instruction index
/// with its error; the fault is reported against the run-wide shot index.
fn drive_chunk<F>(
    chunk: &ShotChunk,
    deadline: Option<Instant>,
    progress: &AtomicU64,
    mut shot: F,
) -> SimResult<Counts>
where
    F: FnMut(&mut StdRng) -> Result<String, (usize, SimError)>,
{
    let mut rng = StdRng::seed_from_u64(chunk.seed);
    let mut counts = Counts::new();
    let mut unreported = 0;

    for offset in 0..chunk.len {
        if offset % DEADLINE_CHECK_INTERVAL == 0 {
            progress.fetch_add(unreported, Ordering::Relaxed);
            unreported = 0;
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(timeout_error(0, 0, Duration::ZERO));
                }
            }
        }

        let index = chunk.first_shot + offset;
        match shot(&mut rng) {
            Ok(bitstring) => counts.insert(bitstring, 1),
            Err((instruction, source)) => {
                return Err(SimError::ShotFailed {
                    shot: index,
                    instruction,
                    source: Box::new(source),
                });
            }
        }
        unreported += 1;

        if index > 0 && index % 1000 == 0 {
            debug!("Completed shot {}", index);
        }
    }

    progress.fetch_add(unreported, Ordering::Relaxed);
    Ok(counts)
}
