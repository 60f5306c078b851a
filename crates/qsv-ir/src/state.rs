//! Caller-supplied initial states.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// A normalized amplitude vector addressed to a subset of qubits.
///
/// The remaining qubits of the register start in |0⟩. Amplitude `k` belongs
/// to the basis state whose bit `j` is the value of `qubits[j]`.
///
/// Deserialized states go through the same validation as
/// [`InitialState::new`], so an `InitialState` is always normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInitialState")]
pub struct InitialState {
    amplitudes: Vec<Complex64>,
    qubits: Vec<QubitId>,
}

#[derive(Deserialize)]
struct RawInitialState {
    amplitudes: Vec<Complex64>,
    qubits: Vec<QubitId>,
}

impl TryFrom<RawInitialState> for InitialState {
    type Error = IrError;

    fn try_from(raw: RawInitialState) -> IrResult<Self> {
        Self::new(raw.amplitudes, raw.qubits)
    }
}

impl InitialState {
    /// Validate and normalize an initial state.
    ///
    /// Fails if the qubit subset is empty or repeats a qubit, if the vector
    /// length is not `2^|qubits|`, if any amplitude is non-finite, or if the
    /// vector has zero norm.
    pub fn new(
        amplitudes: impl IntoIterator<Item = Complex64>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let amplitudes: Vec<Complex64> = amplitudes.into_iter().collect();
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        Self::check(&amplitudes, &qubits)?;

        // Divide by the largest component first so Σ|a|² neither overflows
        // nor drops into the subnormal range.
        let scale = amplitudes
            .iter()
            .map(|a| a.re.abs().max(a.im.abs()))
            .fold(0.0, f64::max);
        if scale == 0.0 {
            return Err(zero_norm());
        }
        let scaled: Vec<Complex64> = amplitudes.iter().map(|&a| a / scale).collect();
        let norm = scaled.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        if !norm.is_finite() || norm == 0.0 {
            return Err(zero_norm());
        }
        let amplitudes = scaled.into_iter().map(|a| a / norm).collect();
        Ok(Self { amplitudes, qubits })
    }

    /// Real-valued convenience constructor, e.g. `from_real([0.3, 0.6], [QubitId(0)])`.
    pub fn from_real(
        amplitudes: impl IntoIterator<Item = f64>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        Self::new(
            amplitudes.into_iter().map(|re| Complex64::new(re, 0.0)),
            qubits,
        )
    }

    fn check(amplitudes: &[Complex64], qubits: &[QubitId]) -> IrResult<()> {
        if qubits.is_empty() {
            return Err(IrError::InvalidState {
                reason: "qubit subset is empty".into(),
            });
        }
        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some("initialize".into()),
                });
            }
        }
        let expected = u32::try_from(qubits.len())
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .unwrap_or(0);
        if amplitudes.len() != expected {
            return Err(IrError::InvalidState {
                reason: format!(
                    "{} amplitudes supplied for {} qubits (expected {})",
                    amplitudes.len(),
                    qubits.len(),
                    expected
                ),
            });
        }
        if amplitudes.iter().any(|a| !a.is_finite()) {
            return Err(IrError::InvalidState {
                reason: "amplitudes must be finite".into(),
            });
        }
        Ok(())
    }

    /// The normalized amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// The qubit subset, in amplitude bit order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }
}

fn zero_norm() -> IrError {
    IrError::InvalidState {
        reason: "state vector has zero norm".into(),
    }
}
