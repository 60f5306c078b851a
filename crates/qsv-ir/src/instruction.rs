//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// One step of a circuit.
///
/// The circuit is a plain ordered sequence of these; classical feed-forward is
/// expressed by [`Instruction::Conditional`] rather than by branching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Apply a unitary to the listed qubits.
    Gate {
        /// The gate to apply.
        gate: Gate,
        /// Operands, control first for controlled gates.
        qubits: Vec<QubitId>,
    },
    /// Measure a qubit in the computational basis into a classical bit.
    Measure {
        /// Qubit to measure.
        qubit: QubitId,
        /// Classical slot receiving the outcome.
        clbit: ClbitId,
    },
    /// Apply a gate only if a classical bit currently holds `value`.
    Conditional {
        /// The gate to apply.
        gate: Gate,
        /// Operands, control first for controlled gates.
        qubits: Vec<QubitId>,
        /// Classical slot to test.
        clbit: ClbitId,
        /// Required value of the slot.
        value: bool,
    },
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::Gate {
            gate: gate.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self::Measure { qubit, clbit }
    }

    /// Create a classically conditioned gate instruction.
    pub fn conditional(
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
        clbit: ClbitId,
        value: bool,
    ) -> Self {
        Self::Conditional {
            gate: gate.into(),
            qubits: qubits.into_iter().collect(),
            clbit,
            value,
        }
    }

    /// Qubits this instruction touches.
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Instruction::Gate { qubits, .. } | Instruction::Conditional { qubits, .. } => qubits,
            Instruction::Measure { qubit, .. } => std::slice::from_ref(qubit),
        }
    }

    /// Classical bit this instruction reads or writes, if any.
    pub fn clbit(&self) -> Option<ClbitId> {
        match self {
            Instruction::Gate { .. } => None,
            Instruction::Measure { clbit, .. } | Instruction::Conditional { clbit, .. } => {
                Some(*clbit)
            }
        }
    }

    /// Get the gate if this instruction applies one.
    pub fn as_gate(&self) -> Option<&Gate> {
        match self {
            Instruction::Gate { gate, .. } | Instruction::Conditional { gate, .. } => Some(gate),
            Instruction::Measure { .. } => None,
        }
    }

    /// Check if this is an unconditional gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self, Instruction::Gate { .. })
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self, Instruction::Measure { .. })
    }

    /// Check if this is a classically conditioned gate.
    pub fn is_conditional(&self) -> bool {
        matches!(self, Instruction::Conditional { .. })
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match self {
            Instruction::Gate { gate, .. } | Instruction::Conditional { gate, .. } => gate.name(),
            Instruction::Measure { .. } => "measure",
        }
    }
}
