//! Measurement engine: sampling, collapse, and classical write-back.

use rand::Rng;
use tracing::trace;

use qsv_ir::{ClbitId, QubitId};

use crate::classical::ClassicalRegister;
use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// An outcome whose probability falls below this cannot be renormalized
/// meaningfully; sampling it means the register is corrupt.
pub const DEGENERATE_PROBABILITY: f64 = 1e-30;

/// Measure `qubit` in the computational basis and store the outcome in
/// `clbit`.
///
/// Draws `r` uniformly from `[0, 1)` and reads 0 iff `r < p0`. Amplitudes
/// inconsistent with the outcome are zeroed and the rest renormalized. Both
/// indices are checked before anything is mutated, so either the register
/// collapses and the bit is written, or neither happens.
pub fn measure<R: Rng + ?Sized>(
    state: &mut Statevector,
    qubit: QubitId,
    clbits: &mut ClassicalRegister,
    clbit: ClbitId,
    rng: &mut R,
) -> SimResult<bool> {
    clbits.get(clbit)?;
    let mask = 1 << state.check_qubit(qubit)?;

    let (weight_zero, weight_one) = split_weights(state, mask);
    let p0 = weight_zero / (weight_zero + weight_one);
    let r: f64 = rng.r#gen();
    let outcome = r >= p0;

    let (probability, weight) = if outcome {
        (1.0 - p0, weight_one)
    } else {
        (p0, weight_zero)
    };
    if !(probability >= DEGENERATE_PROBABILITY) {
        return Err(SimError::DegenerateMeasurement { qubit, probability });
    }

    collapse(state, mask, outcome, weight);
    clbits.set(clbit, outcome)?;

    trace!(%qubit, %clbit, outcome, p0, "measured");
    Ok(outcome)
}

/// Unnormalized weight of the 0 and 1 branches of the qubit selected by `mask`.
fn split_weights(state: &Statevector, mask: usize) -> (f64, f64) {
    state
        .amplitudes()
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(w0, w1), (i, a)| {
            if i & mask == 0 {
                (w0 + a.norm_sqr(), w1)
            } else {
                (w0, w1 + a.norm_sqr())
            }
        })
}

fn collapse(state: &mut Statevector, mask: usize, outcome: bool, weight: f64) {
    let scale = 1.0 / weight.sqrt();
    for (i, amp) in state.amplitudes_mut().iter_mut().enumerate() {
        if (i & mask != 0) == outcome {
            *amp *= scale;
        } else {
            *amp = num_complex::Complex64::new(0.0, 0.0);
        }
    }
    state.debug_assert_normalized("measure");
}
