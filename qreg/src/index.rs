//! Basis-index arithmetic shared by every register operation.
//!
//! Qubit 0 is the most significant of the `width` bits of a basis label.
//! [`qubit_mask`] is the only place that convention is spelled out.

use crate::error::{QuantumError, Result, TargetFault};

/// The bit of a basis label that holds the value of `qubit`.
#[inline]
pub fn qubit_mask(width: usize, qubit: usize) -> usize {
    1 << (width - 1 - qubit)
}

/// Reject qubit indices that are not in `[0, width)`.
pub(crate) fn check_qubit(width: usize, qubit: usize) -> Result<()> {
    if qubit >= width {
        return Err(QuantumError::out_of_range(qubit, width));
    }
    Ok(())
}

/// Maps `(spectator index, target index)` pairs onto full basis labels for a
/// fixed register width and ordered target list.
///
/// Bit `i` of the target index is the value of `targets[i]`. The remaining
/// (spectator) qubits take the bits of the spectator index in increasing
/// qubit order, lowest bit first. For a fixed map this is a bijection between
/// `[0, 2^(n-k)) x [0, 2^k)` and `[0, 2^n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
    width: usize,
    target_masks: Vec<usize>,
    spectator_masks: Vec<usize>,
}

impl IndexMap {
    pub fn new(width: usize, targets: &[usize]) -> Result<Self> {
        let mut assigned = vec![false; width];
        let mut target_masks = Vec::with_capacity(targets.len());
        for &target in targets {
            check_qubit(width, target)?;
            if assigned[target] {
                return Err(QuantumError::InvalidTarget {
                    target,
                    fault: TargetFault::Duplicate,
                });
            }
            assigned[target] = true;
            target_masks.push(qubit_mask(width, target));
        }

        let spectator_masks = (0..width)
            .filter(|&qubit| !assigned[qubit])
            .map(|qubit| qubit_mask(width, qubit))
            .collect();

        Ok(Self {
            width,
            target_masks,
            spectator_masks,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of distinct target indices, `2^k`.
    pub fn target_dim(&self) -> usize {
        1 << self.target_masks.len()
    }

    /// Number of distinct spectator indices, `2^(n-k)`.
    pub fn spectator_dim(&self) -> usize {
        1 << self.spectator_masks.len()
    }

    pub fn full_index(&self, spectator: usize, target: usize) -> usize {
        scatter(&self.target_masks, target) | scatter(&self.spectator_masks, spectator)
    }

    /// Inverse of [`IndexMap::full_index`].
    pub fn split(&self, full: usize) -> (usize, usize) {
        (
            gather(&self.spectator_masks, full),
            gather(&self.target_masks, full),
        )
    }
}

fn scatter(masks: &[usize], bits: usize) -> usize {
    masks
        .iter()
        .enumerate()
        .filter(|&(i, _)| (bits >> i) & 1 == 1)
        .fold(0, |index, (_, mask)| index | mask)
}

fn gather(masks: &[usize], full: usize) -> usize {
    masks
        .iter()
        .enumerate()
        .filter(|&(_, &mask)| full & mask != 0)
        .fold(0, |bits, (i, _)| bits | (1 << i))
}
