//! qsv Circuit Intermediate Representation
//!
//! This crate provides the data structures the `qsv-sim` statevector
//! simulator executes: qubit and classical bit indices, gates with their
//! unitary matrices, the instruction variants, and a validating circuit
//! builder.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]. Classical
//!   indices are declared independently of qubit indices.
//! - **Gates**: [`StandardGate`] for built-in gates and [`CustomGate`] for
//!   user-supplied 2×2 / 4×4 unitaries, both exposing a [`GateMatrix`]
//! - **Instructions**: [`Instruction`] is one of gate application,
//!   measurement, or classically conditioned gate application
//! - **Initial states**: [`InitialState`] for caller-supplied amplitude vectors
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Teleportation
//!
//! ```rust
//! use qsv_ir::{Circuit, InitialState, QubitId};
//!
//! let input = InitialState::from_real([0.3, 0.6], [QubitId(0)]).unwrap();
//! let circuit = Circuit::teleportation(input).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.num_measurements(), 3);
//! ```
//!
//! # Example: Out-of-range operands are rejected at construction
//!
//! ```rust
//! use qsv_ir::{Circuit, IrError, QubitId};
//!
//! let mut circuit = Circuit::with_size("bad", 2, 0);
//! let err = circuit.cx(QubitId(0), QubitId(5)).unwrap_err();
//! assert!(matches!(err, IrError::QubitNotFound { .. }));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | Clifford+T gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CY`, `CZ`, `CP` | 2 | Controlled-Y, controlled-Z, controlled phase |
//! | `Swap` | 2 | SWAP gate |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod state;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, GateMatrix, StandardGate, UNITARY_TOLERANCE};
pub use instruction::Instruction;
pub use qubit::{ClbitId, QubitId};
pub use state::InitialState;
