//! Error types for the sim crate.

use qsv_ir::{ClbitId, IrError, QubitId};
use thiserror::Error;

/// Errors produced while preparing or running a simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit or initial state rejected at construction/validation time.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),

    /// The selected outcome has (numerically) zero probability. Indicates a
    /// corrupted register; never retried.
    #[error("Degenerate measurement on {qubit}: outcome probability {probability:e}")]
    DegenerateMeasurement {
        /// The measured qubit.
        qubit: QubitId,
        /// Probability of the sampled outcome.
        probability: f64,
    },

    /// A qubit index does not exist in the register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register width.
        num_qubits: usize,
    },

    /// A classical bit index does not exist in the classical store.
    #[error("Classical bit {clbit} out of range for {num_clbits} classical bits")]
    ClbitOutOfRange {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Classical store width.
        num_clbits: usize,
    },

    /// Circuit is wider than the simulator accepts.
    #[error("Circuit has {num_qubits} qubits but simulator only supports {max_qubits}")]
    CircuitTooLarge {
        /// Circuit width.
        num_qubits: usize,
        /// Configured limit.
        max_qubits: u32,
    },

    /// A shot aborted; the run is discarded.
    #[error("Shot {shot} failed at instruction {instruction}: {source}")]
    ShotFailed {
        /// Zero-based shot index.
        shot: u64,
        /// Index of the instruction that faulted.
        instruction: usize,
        /// Underlying fault.
        #[source]
        source: Box<SimError>,
    },

    /// The run exceeded its time budget; partial counts were discarded.
    #[error("Run timed out after {elapsed_ms} ms ({completed} of {requested} shots completed)")]
    Timeout {
        /// Shots finished before the deadline.
        completed: u64,
        /// Shots requested.
        requested: u64,
        /// Wall-clock time spent.
        elapsed_ms: u64,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
