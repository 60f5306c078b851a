//! The complex amplitude register.

use num_complex::Complex64;
use std::fmt;

use qsv_ir::{InitialState, IrError, QubitId};

use crate::error::{SimError, SimResult};

/// Tolerance on `Σ|a|² == 1` after every completed operation.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// A statevector representing a quantum state.
///
/// Basis index `i` holds the amplitude of the state in which qubit `q` has
/// the value of bit `q` of `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// # Panics
    ///
    /// Panics if `2^num_qubits` does not fit in `usize`.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Build a register from a full amplitude vector, normalizing it.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
            return Err(IrError::InvalidState {
                reason: format!("length {} is not a power of two", amplitudes.len()),
            }
            .into());
        }
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        let qubits = (0..num_qubits as u32).map(QubitId);
        let state = InitialState::new(amplitudes, qubits)?;
        Ok(Self {
            amplitudes: state.amplitudes().to_vec(),
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space, `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Return to |0...0⟩ without reallocating.
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Overwrite the register with `state` on its qubit subset, tensored with
    /// |0⟩ on every other qubit.
    ///
    /// The register is untouched if any addressed qubit is out of range.
    pub fn initialize(&mut self, state: &InitialState) -> SimResult<()> {
        let positions: Vec<usize> = state
            .qubits()
            .iter()
            .map(|&q| self.check_qubit(q))
            .collect::<SimResult<_>>()?;

        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        for (k, &amp) in state.amplitudes().iter().enumerate() {
            let index = positions
                .iter()
                .enumerate()
                .filter(|&(j, _)| (k >> j) & 1 == 1)
                .fold(0usize, |acc, (_, &pos)| acc | (1 << pos));
            self.amplitudes[index] = amp;
        }
        self.debug_assert_normalized("initialize");
        Ok(())
    }

    /// The amplitude vector.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    /// Probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Total probability `Σ|a|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Whether the total probability is 1 within [`NORM_TOLERANCE`].
    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    /// Marginal probability that `qubit` reads 0.
    pub fn probability_zero(&self, qubit: QubitId) -> SimResult<f64> {
        let mask = 1 << self.check_qubit(qubit)?;
        Ok(self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum())
    }

    /// Bloch vector `(x, y, z)` of the reduced state of one qubit.
    ///
    /// Pure, unentangled qubits lie on the unit sphere; entangled ones fall
    /// inside it.
    pub fn bloch_vector(&self, qubit: QubitId) -> SimResult<[f64; 3]> {
        let mask = 1 << self.check_qubit(qubit)?;
        let mut rho_00 = 0.0;
        let mut rho_11 = 0.0;
        let mut rho_01 = Complex64::new(0.0, 0.0);
        for i in 0..self.dim() {
            if i & mask == 0 {
                let a0 = self.amplitudes[i];
                let a1 = self.amplitudes[i | mask];
                rho_00 += a0.norm_sqr();
                rho_11 += a1.norm_sqr();
                rho_01 += a0 * a1.conj();
            }
        }
        Ok([2.0 * rho_01.re, -2.0 * rho_01.im, rho_00 - rho_11])
    }

    /// Ket label of a basis index, highest qubit first.
    pub fn basis_label(&self, index: usize) -> String {
        format!("{:0width$b}", index, width = self.num_qubits.max(1))
    }

    pub(crate) fn check_qubit(&self, qubit: QubitId) -> SimResult<usize> {
        let index = qubit.index();
        if index >= self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(index)
    }

    /// Norm drift is an internal consistency failure, never a user error.
    #[inline]
    pub(crate) fn debug_assert_normalized(&self, operation: &str) {
        debug_assert!(
            self.is_normalized(),
            "{operation} broke normalization: Σ|a|² = {}",
            self.norm_sqr()
        );
    }
}

impl fmt::Display for Statevector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statevector ({} qubits):", self.num_qubits)?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > 1e-12 {
                writeln!(
                    f,
                    "  |{}⟩  {:+.4}{:+.4}i  (p = {:.4})",
                    self.basis_label(i),
                    amp.re,
                    amp.im,
                    prob
                )?;
            }
        }
        Ok(())
    }
}
