//! Classical bit store.

use qsv_ir::ClbitId;

use crate::error::{SimError, SimResult};

/// Fixed-width store of classical bits written by measurements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    bits: Vec<bool>,
}

impl ClassicalRegister {
    /// Create `num_clbits` bits, all 0.
    pub fn new(num_clbits: usize) -> Self {
        Self {
            bits: vec![false; num_clbits],
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the store has no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Read a bit.
    pub fn get(&self, clbit: ClbitId) -> SimResult<bool> {
        self.bits
            .get(clbit.index())
            .copied()
            .ok_or(SimError::ClbitOutOfRange {
                clbit,
                num_clbits: self.bits.len(),
            })
    }

    pub(crate) fn set(&mut self, clbit: ClbitId, value: bool) -> SimResult<()> {
        let num_clbits = self.bits.len();
        let slot = self
            .bits
            .get_mut(clbit.index())
            .ok_or(SimError::ClbitOutOfRange { clbit, num_clbits })?;
        *slot = value;
        Ok(())
    }

    /// Set every bit to 0.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// The bits in index order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Fixed-width bit string, highest classical index first.
    pub fn to_bitstring(&self) -> String {
        self.bits
            .iter()
            .rev()
            .map(|&b| if b { '1' } else { '0' })
            .collect()
    }
}
