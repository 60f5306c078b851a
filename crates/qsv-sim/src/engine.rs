//! Gate engine: in-place application of 1- and 2-qubit unitaries.
//!
//! Every gate goes through [`Statevector::apply_gate`]. Permutation and sign
//! gates (X, Z, CX, CZ, SWAP) have dedicated kernels; everything else is a
//! dense contraction of the gate matrix with the amplitudes addressed by its
//! operands.

use num_complex::Complex64;

use qsv_ir::{Gate, GateKind, GateMatrix, IrError, QubitId, StandardGate};

use crate::error::SimResult;
use crate::statevector::Statevector;

impl Statevector {
    /// Apply `gate` to `qubits`, control first for controlled gates.
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[QubitId]) -> SimResult<()> {
        let expected = gate.num_qubits();
        if qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got: qubits.len() as u32,
            }
            .into());
        }
        let targets: Vec<usize> = qubits
            .iter()
            .map(|&q| self.check_qubit(q))
            .collect::<SimResult<_>>()?;
        if targets.len() == 2 && targets[0] == targets[1] {
            return Err(IrError::DuplicateQubit {
                qubit: qubits[1],
                gate_name: Some(gate.name().to_string()),
            }
            .into());
        }

        match &gate.kind {
            GateKind::Standard(StandardGate::I) => {}
            GateKind::Standard(StandardGate::X) => self.apply_x(targets[0]),
            GateKind::Standard(StandardGate::Z) => self.apply_z(targets[0]),
            GateKind::Standard(StandardGate::CX) => self.apply_cx(targets[0], targets[1]),
            GateKind::Standard(StandardGate::CZ) => self.apply_cz(targets[0], targets[1]),
            GateKind::Standard(StandardGate::Swap) => self.apply_swap(targets[0], targets[1]),
            _ => match gate.matrix() {
                GateMatrix::Single(m) => self.apply_single_qubit_matrix(&m, targets[0]),
                GateMatrix::Two(m) => self.apply_two_qubit_matrix(&m, targets[0], targets[1]),
            },
        }

        self.debug_assert_normalized(gate.name());
        Ok(())
    }

    // =========================================================================
    // Dense kernels
    // =========================================================================

    fn apply_single_qubit_matrix(&mut self, m: &[[Complex64; 2]; 2], qubit: usize) {
        let mask = 1 << qubit;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = m[0][0] * a + m[0][1] * b;
                amps[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    /// `first` supplies bit 0 of the matrix sub-index, `second` bit 1.
    fn apply_two_qubit_matrix(&mut self, m: &[[Complex64; 4]; 4], first: usize, second: usize) {
        let m0 = 1 << first;
        let m1 = 1 << second;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & (m0 | m1) == 0 {
                let idx = [i, i | m0, i | m1, i | m0 | m1];
                let v = idx.map(|k| amps[k]);
                for (r, &k) in idx.iter().enumerate() {
                    amps[k] = m[r][0] * v[0] + m[r][1] * v[1] + m[r][2] * v[2] + m[r][3] * v[3];
                }
            }
        }
    }

    // =========================================================================
    // Permutation and sign kernels
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & mask == 0 {
                amps.swap(i, i | mask);
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes_mut().iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    /// Swap the target pair wherever the control is 1.
    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                amps.swap(i, i | tgt_mask);
            }
        }
    }

    /// Negate wherever both qubits are 1.
    fn apply_cz(&mut self, control: usize, target: usize) {
        let mask = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes_mut().iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                amps.swap(i, j);
            }
        }
    }
}
