use crate::error::{QuantumError, Result};
use crate::index::IndexMap;
use crate::operator::Operator;
use crate::register::Register;
use crate::Amplitude;
use num_complex::Complex;
use rayon::prelude::*;

// Output slots handed to one rayon task at a time.
const MIN_SLOTS_PER_TASK: usize = 256;

impl Operator {
    /// Applies the operator to the qubits of `register` listed in `targets`,
    /// leaving every other qubit as a spectator.
    ///
    /// Bit `i` of the operator's row and column indices addresses
    /// `targets[i]`. Targets must be distinct qubits of the register and
    /// there must be exactly [`Operator::width`] of them.
    pub fn apply(&self, register: &mut Register, targets: &[usize]) -> Result<()> {
        if targets.len() != self.width() {
            return Err(QuantumError::WidthMismatch {
                operator: self.width(),
                targets: targets.len(),
            });
        }
        let map = IndexMap::new(register.width, targets)?;
        tracing::debug!(width = register.width, ?targets, "applying operator");

        let input = &register.amplitudes;
        let mut output = vec![Complex::new(0.0, 0.0); input.len()];
        output
            .par_iter_mut()
            .with_min_len(MIN_SLOTS_PER_TASK)
            .enumerate()
            .for_each(|(full, slot)| {
                let (spectator, row) = map.split(full);
                *slot = (0..self.dim())
                    .map(|col| self.get(row, col) * input[map.full_index(spectator, col)])
                    .sum::<Amplitude>();
            });

        register.amplitudes = output;
        Ok(())
    }

    /// Applies the operator to the contiguous qubits
    /// `start..start + width`.
    pub fn apply_range(&self, register: &mut Register, start: usize) -> Result<()> {
        let end = start
            .checked_add(self.width())
            .ok_or_else(|| QuantumError::out_of_range(start, register.width))?;
        let targets: Vec<usize> = (start..end).collect();
        self.apply(register, &targets)
    }

    /// Applies the operator to the whole register, whose width must match.
    pub fn apply_reg(&self, register: &mut Register) -> Result<()> {
        if self.width() != register.width {
            return Err(QuantumError::WidthMismatch {
                operator: self.width(),
                targets: register.width,
            });
        }
        self.apply_range(register, 0)
    }
}
