//! Circuit executor: drives one shot instruction by instruction.

use rand::Rng;
use tracing::trace;

use qsv_ir::{Circuit, Instruction};

use crate::classical::ClassicalRegister;
use crate::config::MAX_SUPPORTED_QUBITS;
use crate::error::{SimError, SimResult};
use crate::measurement::measure;
use crate::statevector::Statevector;

/// Position of an [`Executor`] in its instruction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// The instruction at this index runs next.
    Ready(usize),
    /// Every instruction has run.
    Done,
}

/// Executes a circuit against a private register and classical store.
///
/// The circuit is borrowed read-only, so many executors (one per worker) can
/// share it. The register and classical bits are reused from shot to shot via
/// [`Executor::reset`].
#[derive(Debug, Clone)]
pub struct Executor<'c> {
    circuit: &'c Circuit,
    state: Statevector,
    clbits: ClassicalRegister,
    pc: usize,
}

impl<'c> Executor<'c> {
    /// Validate `circuit` and prepare its input state.
    ///
    /// Circuits wider than [`MAX_SUPPORTED_QUBITS`] are rejected with
    /// [`SimError::CircuitTooLarge`] before any memory is allocated.
    pub fn new(circuit: &'c Circuit) -> SimResult<Self> {
        circuit.validate()?;
        if circuit.num_qubits() > MAX_SUPPORTED_QUBITS as usize {
            return Err(SimError::CircuitTooLarge {
                num_qubits: circuit.num_qubits(),
                max_qubits: MAX_SUPPORTED_QUBITS,
            });
        }
        let mut executor = Self {
            circuit,
            state: Statevector::new(circuit.num_qubits()),
            clbits: ClassicalRegister::new(circuit.num_clbits()),
            pc: 0,
        };
        executor.reset()?;
        Ok(executor)
    }

    /// Return to the circuit's input state: all-zero register, cleared
    /// classical bits, then the declared initial state if there is one.
    pub fn reset(&mut self) -> SimResult<()> {
        self.state.reset();
        self.clbits.clear();
        self.pc = 0;
        if let Some(initial) = self.circuit.initial_state() {
            self.state.initialize(initial)?;
        }
        Ok(())
    }

    /// Current position.
    pub fn exec_state(&self) -> ExecState {
        if self.pc >= self.circuit.instructions().len() {
            ExecState::Done
        } else {
            ExecState::Ready(self.pc)
        }
    }

    /// Index of the next instruction. After a failed [`step`](Self::step) this
    /// is the instruction that faulted.
    pub fn position(&self) -> usize {
        self.pc
    }

    /// Execute the next instruction.
    ///
    /// On error the position is not advanced.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SimResult<ExecState> {
        let Some(instruction) = self.circuit.instructions().get(self.pc) else {
            return Ok(ExecState::Done);
        };

        match instruction {
            Instruction::Gate { gate, qubits } => {
                self.state.apply_gate(gate, qubits)?;
            }
            Instruction::Measure { qubit, clbit } => {
                measure(&mut self.state, *qubit, &mut self.clbits, *clbit, rng)?;
            }
            Instruction::Conditional {
                gate,
                qubits,
                clbit,
                value,
            } => {
                if self.clbits.get(*clbit)? == *value {
                    self.state.apply_gate(gate, qubits)?;
                } else {
                    trace!(pc = self.pc, %clbit, "condition not met, skipping");
                }
            }
        }

        self.pc += 1;
        Ok(self.exec_state())
    }

    /// Run every remaining instruction in order.
    pub fn execute_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SimResult<()> {
        while self.step(rng)? != ExecState::Done {}
        Ok(())
    }

    /// Reset, run the whole circuit, and return the classical outcome.
    pub fn run_shot<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SimResult<&ClassicalRegister> {
        self.reset()?;
        self.execute_all(rng)?;
        Ok(&self.clbits)
    }

    /// The circuit being executed.
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// The register.
    pub fn state(&self) -> &Statevector {
        &self.state
    }

    /// The classical bits.
    pub fn clbits(&self) -> &ClassicalRegister {
        &self.clbits
    }

    /// Give up the register and classical bits.
    pub fn into_parts(self) -> (Statevector, ClassicalRegister) {
        (self.state, self.clbits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsv_ir::{ClbitId, InitialState, QubitId, StandardGate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_state_machine_walks_every_instruction() {
        let circuit = Circuit::bell().unwrap();
        let n = circuit.instructions().len();
        let mut rng = StdRng::seed_from_u64(7);
        let mut exec = Executor::new(&circuit).unwrap();

        assert_eq!(exec.exec_state(), ExecState::Ready(0));
        for i in 1..n {
            assert_eq!(exec.step(&mut rng).unwrap(), ExecState::Ready(i));
        }
        assert_eq!(exec.step(&mut rng).unwrap(), ExecState::Done);
        // Stepping past the end is a no-op.
        assert_eq!(exec.step(&mut rng).unwrap(), ExecState::Done);
    }

    #[test]
    fn test_bell_shots_are_correlated() {
        let circuit = Circuit::bell().unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut exec = Executor::new(&circuit).unwrap();
        for _ in 0..200 {
            let bits = exec.run_shot(&mut rng).unwrap().to_bitstring();
            assert!(bits == "00" || bits == "11", "unexpected {bits}");
        }
    }

    #[test]
    fn test_conditional_applies_only_on_match() {
        let mut circuit = Circuit::with_size("cond", 2, 1);
        circuit
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .c_if(ClbitId(0), true, StandardGate::X, [QubitId(1)])
            .unwrap()
            .c_if(ClbitId(0), false, StandardGate::Z, [QubitId(1)])
            .unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let mut exec = Executor::new(&circuit).unwrap();
        exec.execute_all(&mut rng).unwrap();
        assert!((exec.state().amplitude(0b11).re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_applies_initial_state() {
        let state = InitialState::from_real([0.0, 1.0], [QubitId(1)]).unwrap();
        let mut circuit = Circuit::with_size("init", 2, 0);
        circuit.initialize(state).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let mut rng = StdRng::seed_from_u64(10);
        let mut exec = Executor::new(&circuit).unwrap();
        assert!((exec.state().amplitude(0b10).re - 1.0).abs() < 1e-12);

        exec.execute_all(&mut rng).unwrap();
        exec.reset().unwrap();
        assert_eq!(exec.exec_state(), ExecState::Ready(0));
        assert!((exec.state().amplitude(0b10).re - 1.0).abs() < 1e-12);
        assert!(exec.state().amplitude(0b11).norm() < 1e-12);
    }

    #[test]
    fn test_reset_clears_classical_bits() {
        let mut circuit = Circuit::with_size("one", 1, 1);
        circuit
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut exec = Executor::new(&circuit).unwrap();
        exec.execute_all(&mut rng).unwrap();
        assert!(exec.clbits().get(ClbitId(0)).unwrap());
        exec.reset().unwrap();
        assert!(!exec.clbits().get(ClbitId(0)).unwrap());
    }

    #[test]
    fn test_invalid_circuit_rejected_before_running() {
        let json = r#"{
            "name": "bad",
            "num_qubits": 1,
            "num_clbits": 0,
            "instructions": [
                {"op": "gate", "gate": {"kind": {"Standard": "H"}}, "qubits": [4]}
            ]
        }"#;
        let circuit: Circuit = serde_json::from_str(json).unwrap();
        let err = Executor::new(&circuit).unwrap_err();
        assert!(matches!(err, SimError::Ir(_)));
    }

    #[test]
    fn test_into_parts() {
        let mut circuit = Circuit::with_size("x", 1, 0);
        circuit
            .apply(Instruction::single_qubit_gate(StandardGate::X, QubitId(0)))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let mut exec = Executor::new(&circuit).unwrap();
        exec.execute_all(&mut rng).unwrap();
        let (state, clbits) = exec.into_parts();
        assert!((state.amplitude(1).re - 1.0).abs() < 1e-12);
        assert!(clbits.is_empty());
    }

    #[test]
    fn test_rejects_register_wider_than_supported() {
        let circuit: Circuit = serde_json::from_str(
            r#"{"name": "wide", "num_qubits": 64, "num_clbits": 0, "instructions": []}"#,
        )
        .unwrap();
        assert!(circuit.validate().is_ok());
        assert!(matches!(
            Executor::new(&circuit),
            Err(SimError::CircuitTooLarge {
                num_qubits: 64,
                max_qubits: MAX_SUPPORTED_QUBITS
            })
        ));
    }
}
