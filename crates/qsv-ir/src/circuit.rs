//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};
use crate::state::InitialState;

/// A quantum circuit: declared register sizes, an optional initial state and
/// an ordered instruction sequence.
///
/// Every operand is checked against the declared sizes when the instruction is
/// appended, so a circuit built through this API is always executable.
/// Circuits obtained by deserialization should be passed through
/// [`Circuit::validate`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Declared qubit count.
    num_qubits: u32,
    /// Declared classical bit count.
    num_clbits: u32,
    /// Optional caller-supplied input state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_state: Option<InitialState>,
    /// The instruction sequence, in execution order.
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with no qubits or classical bits.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0, 0)
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            initial_state: None,
            instructions: vec![],
        }
    }

    // =========================================================================
    // Initial state
    // =========================================================================

    /// Set the input state for a subset of qubits. The rest start in |0⟩.
    ///
    /// Replaces any previously declared initial state.
    pub fn initialize(&mut self, state: InitialState) -> IrResult<&mut Self> {
        for &q in state.qubits() {
            self.check_qubit(q, Some("initialize"))?;
        }
        self.initial_state = Some(state);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::SX, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CY, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::CP(theta),
            control,
            target,
        ))
    }

    // =========================================================================
    // Generic operations
    // =========================================================================

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Apply `gate` only when classical bit `clbit` holds `value`.
    pub fn c_if(
        &mut self,
        clbit: ClbitId,
        value: bool,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::conditional(gate, qubits, clbit, value))
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure qubit `i` into classical bit `i` for every qubit that has a
    /// matching classical slot.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        for i in 0..self.num_qubits.min(self.num_clbits) {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    /// Validate and append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check_instruction(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check every instruction and the initial state against the declared
    /// register sizes. Use this on circuits that did not come through the
    /// builder, e.g. parsed from JSON.
    pub fn validate(&self) -> IrResult<()> {
        if let Some(state) = &self.initial_state {
            for &q in state.qubits() {
                self.check_qubit(q, Some("initialize"))?;
            }
        }
        for instruction in &self.instructions {
            self.check_instruction(instruction)?;
        }
        Ok(())
    }

    fn check_instruction(&self, instruction: &Instruction) -> IrResult<()> {
        let name = instruction.name();
        if let Some(gate) = instruction.as_gate() {
            match &gate.kind {
                GateKind::Custom(custom) => custom.check()?,
                GateKind::Standard(standard) => {
                    if standard.angle().is_some_and(|theta| !theta.is_finite()) {
                        return Err(IrError::NonUnitary {
                            gate_name: name.to_string(),
                            reason: "angle is not finite".into(),
                        });
                    }
                }
            }
            let expected = gate.num_qubits();
            let got = instruction.qubits().len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: name.to_string(),
                    expected,
                    got,
                });
            }
        }

        let qubits = instruction.qubits();
        for (i, &q) in qubits.iter().enumerate() {
            self.check_qubit(q, Some(name))?;
            if qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: Some(name.to_string()),
                });
            }
        }

        if let Some(clbit) = instruction.clbit() {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    num_clbits: self.num_clbits,
                    gate_name: Some(name.to_string()),
                });
            }
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: QubitId, gate_name: Option<&str>) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitNotFound {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: gate_name.map(str::to_string),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Get the declared initial state, if any.
    pub fn initial_state(&self) -> Option<&InitialState> {
        self.initial_state.as_ref()
    }

    /// Get the instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Number of measurement instructions.
    pub fn num_measurements(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_measure()).count()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;

        Ok(circuit)
    }

    /// Teleport `state` (a single-qubit state on q0) onto q2, without reading
    /// out q2.
    ///
    /// q1/q2 form the Bell pair, c0/c1 receive the Bell measurement of q0/q1,
    /// and the X and Z corrections on q2 are conditioned on c1 and c0.
    pub fn teleportation_unmeasured(state: InitialState) -> IrResult<Self> {
        let (q0, q1, q2) = (QubitId(0), QubitId(1), QubitId(2));
        let (c0, c1) = (ClbitId(0), ClbitId(1));

        if state.qubits() != [q0] {
            return Err(IrError::InvalidState {
                reason: format!(
                    "teleportation input must address exactly q0, got {:?}",
                    state.qubits()
                ),
            });
        }

        let mut circuit = Self::with_size("teleportation", 3, 3);
        circuit
            .initialize(state)?
            .h(q1)?
            .cx(q1, q2)?
            .cx(q0, q1)?
            .h(q0)?
            .measure(q0, c0)?
            .measure(q1, c1)?
            .c_if(c1, true, StandardGate::CX, [q1, q2])?
            .c_if(c0, true, StandardGate::CZ, [q0, q2])?;

        Ok(circuit)
    }

    /// Full teleportation protocol: [`Circuit::teleportation_unmeasured`]
    /// followed by measuring q2 into c2.
    pub fn teleportation(state: InitialState) -> IrResult<Self> {
        let mut circuit = Self::teleportation_unmeasured(state)?;
        circuit.measure(QubitId(2), ClbitId(2))?;
        Ok(circuit)
    }
}
