//! Quantum gate types and their unitary matrices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::error::{IrError, IrResult};

/// Tolerance used when checking that a matrix is unitary.
pub const UNITARY_TOLERANCE: f64 = 1e-9;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Controlled phase gate.
    CP(f64),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CP(_) => "cp",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::Swap
            | StandardGate::CP(_) => 2,
            _ => 1,
        }
    }

    /// Rotation or phase angle, for parameterized gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta)
            | StandardGate::Ry(theta)
            | StandardGate::Rz(theta)
            | StandardGate::P(theta)
            | StandardGate::CP(theta) => Some(*theta),
            _ => None,
        }
    }

    /// The dense unitary of this gate.
    ///
    /// Two-qubit matrices index the basis as `b0 | (b1 << 1)`, where `b0` is
    /// the value of the first operand (the control) and `b1` the second.
    pub fn matrix(&self) -> GateMatrix {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        match self {
            StandardGate::I => GateMatrix::Single([[ONE, ZERO], [ZERO, ONE]]),
            StandardGate::X => GateMatrix::Single([[ZERO, ONE], [ONE, ZERO]]),
            StandardGate::Y => GateMatrix::Single([[ZERO, -I], [I, ZERO]]),
            StandardGate::Z => GateMatrix::Single([[ONE, ZERO], [ZERO, -ONE]]),
            StandardGate::H => GateMatrix::Single([[h, h], [h, -h]]),
            StandardGate::S => phase_matrix(std::f64::consts::FRAC_PI_2),
            StandardGate::Sdg => phase_matrix(-std::f64::consts::FRAC_PI_2),
            StandardGate::T => phase_matrix(FRAC_PI_4),
            StandardGate::Tdg => phase_matrix(-FRAC_PI_4),
            StandardGate::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                GateMatrix::Single([[a, b], [b, a]])
            }
            StandardGate::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
                GateMatrix::Single([[c, neg_i_s], [neg_i_s, c]])
            }
            StandardGate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                GateMatrix::Single([[c, -s], [s, c]])
            }
            StandardGate::Rz(theta) => GateMatrix::Single([
                [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
                [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
            ]),
            StandardGate::P(theta) => phase_matrix(*theta),
            StandardGate::CX => GateMatrix::Two([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
            ]),
            StandardGate::CY => GateMatrix::Two([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ZERO, -I],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, I, ZERO, ZERO],
            ]),
            StandardGate::CZ => GateMatrix::Two([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ZERO, ZERO, -ONE],
            ]),
            StandardGate::Swap => GateMatrix::Two([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
            ]),
            StandardGate::CP(theta) => GateMatrix::Two([
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ZERO, ZERO, Complex64::from_polar(1.0, *theta)],
            ]),
        }
    }
}

fn phase_matrix(theta: f64) -> GateMatrix {
    GateMatrix::Single([[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]])
}

/// A dense gate unitary, either 2×2 or 4×4, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateMatrix {
    /// Single-qubit operator.
    Single([[Complex64; 2]; 2]),
    /// Two-qubit operator.
    Two([[Complex64; 4]; 4]),
}

impl GateMatrix {
    /// Number of qubits this operator acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateMatrix::Single(_) => 1,
            GateMatrix::Two(_) => 2,
        }
    }

    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        1 << self.num_qubits()
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        match self {
            GateMatrix::Single(m) => m[row][col],
            GateMatrix::Two(m) => m[row][col],
        }
    }

    /// Check `U · U† = I` entry-wise within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let dim = self.dim();
        for r in 0..dim {
            for c in 0..dim {
                let dot: Complex64 = (0..dim)
                    .map(|k| self.entry(r, k) * self.entry(c, k).conj())
                    .sum();
                let expected = if r == c { ONE } else { ZERO };
                if (dot - expected).norm() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    fn is_finite(&self) -> bool {
        let dim = self.dim();
        (0..dim).all(|r| (0..dim).all(|c| self.entry(r, c).is_finite()))
    }
}

/// A user-defined gate given by an explicit unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The unitary operator.
    pub matrix: GateMatrix,
}

impl CustomGate {
    /// Create a custom gate, rejecting matrices that are not unitary.
    pub fn new(name: impl Into<String>, matrix: GateMatrix) -> IrResult<Self> {
        let gate = Self {
            name: name.into(),
            matrix,
        };
        gate.check()?;
        Ok(gate)
    }

    /// Validate the matrix. Deserialized gates bypass [`CustomGate::new`],
    /// so circuit validation calls this again.
    pub fn check(&self) -> IrResult<()> {
        if !self.matrix.is_finite() {
            return Err(IrError::NonUnitary {
                gate_name: self.name.clone(),
                reason: "matrix contains non-finite entries".into(),
            });
        }
        if !self.matrix.is_unitary(UNITARY_TOLERANCE) {
            return Err(IrError::NonUnitary {
                gate_name: self.name.clone(),
                reason: "U·U† differs from the identity".into(),
            });
        }
        Ok(())
    }

    /// The number of qubits it operates on.
    pub fn num_qubits(&self) -> u32 {
        self.matrix.num_qubits()
    }
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom user-defined gate.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits(),
        }
    }
}

/// An immutable gate, shared read-only by every shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// The dense unitary of this gate.
    pub fn matrix(&self) -> GateMatrix {
        match &self.kind {
            GateKind::Standard(g) => g.matrix(),
            GateKind::Custom(g) => g.matrix.clone(),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}
