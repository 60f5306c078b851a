//! `qsv-sim` — statevector simulator core.
//!
//! Executes a [`qsv_ir::Circuit`] against an explicit complex amplitude
//! register and aggregates repeated shots into [`Counts`]:
//!
//! - **[`Statevector`]**: the 2^n amplitude register (qubit `q` is bit `q`
//!   of the basis index)
//! - **Gate engine**: [`Statevector::apply_gate`], in-place application of
//!   1- and 2-qubit unitaries
//! - **[`measure`]**: Born-rule sampling, collapse, and classical write-back
//! - **[`Executor`]**: one shot, instruction by instruction, with classically
//!   conditioned gates
//! - **[`Simulator`]**: multi-shot runs, parallel across `rayon` workers with
//!   one RNG stream per worker
//!
//! # Quick start
//!
//! ```rust
//! use qsv_ir::{Circuit, ClbitId, InitialState, QubitId};
//! use qsv_sim::Simulator;
//!
//! let input = InitialState::from_real([0.3, 0.6], [QubitId(0)]).unwrap();
//! let circuit = Circuit::teleportation(input).unwrap();
//!
//! let counts = Simulator::with_seed(42).run(&circuit, 2000).unwrap();
//! assert_eq!(counts.total_shots(), 2000);
//!
//! // c2 carries the teleported qubit: P(1) = 0.36 / 0.45 = 0.8
//! let c2 = counts.marginal(ClbitId(2));
//! let p1 = c2.get("1") as f64 / 2000.0;
//! assert!((p1 - 0.8).abs() < 0.05);
//! ```

pub mod classical;
pub mod config;
pub mod counts;
mod engine;
pub mod error;
pub mod executor;
pub mod measurement;
pub mod simulator;
pub mod statevector;

pub use classical::ClassicalRegister;
pub use config::{ConfigError, SimConfig};
pub use counts::Counts;
pub use error::{SimError, SimResult};
pub use executor::{ExecState, Executor};
pub use measurement::{DEGENERATE_PROBABILITY, measure};
pub use simulator::Simulator;
pub use statevector::{NORM_TOLERANCE, Statevector};
