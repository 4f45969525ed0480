use crate::error::{QuantumError, Result};
use crate::index::{check_qubit, qubit_mask};
use crate::operator::check_width;
use crate::{Amplitude, EPSILON};
use num_complex::Complex;
use std::f64::consts::FRAC_1_SQRT_2;

/// A register of `width` qubits stored as its full vector of `2^width`
/// complex amplitudes.
///
/// Qubit 0 is the most significant bit of a basis label, so for `width = 3`
/// the label `0b011` is the state `|011⟩` with qubit 0 in `|0⟩`.
#[derive(Clone, Debug, PartialEq)]
pub struct Register {
    pub(crate) width: usize,
    pub(crate) amplitudes: Vec<Amplitude>,
}

impl Register {
    /// A register in the basis state described by `values`; see
    /// [`Register::set`].
    pub fn new(width: usize, values: &[usize]) -> Result<Self> {
        check_width(width)?;
        let mut register = Self {
            width,
            amplitudes: Vec::new(),
        };
        register.set(values)?;
        Ok(register)
    }

    /// A register holding the given amplitudes. The length must be a power of
    /// two no smaller than 2 and the total probability must be 1.
    pub fn from_amplitudes(amplitudes: Vec<Amplitude>) -> Result<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QuantumError::InvalidDimension(len));
        }
        let width = len.trailing_zeros() as usize;
        check_width(width)?;

        let register = Self { width, amplitudes };
        let total = register.total_probability();
        if (total - 1.0).abs() > EPSILON {
            return Err(QuantumError::NotNormalized(total));
        }
        Ok(register)
    }

    fn qubit(amplitudes: [Amplitude; 2]) -> Self {
        Self {
            width: 1,
            amplitudes: amplitudes.to_vec(),
        }
    }

    /// `|0⟩`, the +1 eigenvector of Pauli Z.
    pub fn ket_zero() -> Self {
        Self::qubit([Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)])
    }

    /// `|1⟩`, the -1 eigenvector of Pauli Z.
    pub fn ket_one() -> Self {
        Self::qubit([Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)])
    }

    /// `|+⟩`, the +1 eigenvector of Pauli X.
    pub fn ket_plus() -> Self {
        Self::qubit([
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(FRAC_1_SQRT_2, 0.0),
        ])
    }

    /// `|-⟩`, the -1 eigenvector of Pauli X.
    pub fn ket_minus() -> Self {
        Self::qubit([
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(-FRAC_1_SQRT_2, 0.0),
        ])
    }

    /// `|+i⟩`, the +1 eigenvector of Pauli Y.
    pub fn ket_plus_i() -> Self {
        Self::qubit([
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(0.0, FRAC_1_SQRT_2),
        ])
    }

    /// `|-i⟩`, the -1 eigenvector of Pauli Y.
    pub fn ket_minus_i() -> Self {
        Self::qubit([
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(0.0, -FRAC_1_SQRT_2),
        ])
    }

    /// The qubit at polar angle `theta` and azimuth `phi` on the Bloch sphere:
    /// `cos(θ/2)|0⟩ + e^{iφ} sin(θ/2)|1⟩`.
    pub fn from_bloch(theta: f64, phi: f64) -> Self {
        let half = theta / 2.0;
        Self::qubit([
            Complex::new(half.cos(), 0.0),
            Complex::from_polar(half.sin(), phi),
        ])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of basis states, `2^width`.
    pub fn dim(&self) -> usize {
        1 << self.width
    }

    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amplitudes
    }

    /// Sum of the probabilities of every basis state. Stays within
    /// [`EPSILON`] of 1 for any register built through this crate.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Resets the register to a single basis state.
    ///
    /// No values selects `|0...0⟩`. A single value is the integer label of
    /// the state. Exactly `width` values are read as the binary digits of
    /// the label, most significant first.
    pub fn set(&mut self, values: &[usize]) -> Result<()> {
        let label = self.basis_label(values)?;
        let mut amplitudes = vec![Complex::new(0.0, 0.0); self.dim()];
        amplitudes[label] = Complex::new(1.0, 0.0);
        self.amplitudes = amplitudes;
        Ok(())
    }

    pub(crate) fn basis_label(&self, values: &[usize]) -> Result<usize> {
        let invalid = || QuantumError::InvalidBasisLabel {
            values: values.to_vec(),
            width: self.width,
        };
        match values {
            [] => Ok(0),
            [label] if *label < self.dim() => Ok(*label),
            [_] => Err(invalid()),
            bits if bits.len() == self.width => bits.iter().try_fold(0, |label, &bit| {
                if bit > 1 {
                    return Err(invalid());
                }
                Ok((label << 1) | bit)
            }),
            _ => Err(invalid()),
        }
    }

    /// Probability of observing the basis state `label`.
    pub fn state_prob(&self, label: usize) -> Result<f64> {
        self.amplitudes
            .get(label)
            .map(|amplitude| amplitude.norm_sqr())
            .ok_or_else(|| QuantumError::InvalidBasisLabel {
                values: vec![label],
                width: self.width,
            })
    }

    /// Probabilities of reading 0 and 1 from qubit `bit`, in that order.
    pub fn bprob(&self, bit: usize) -> Result<[f64; 2]> {
        check_qubit(self.width, bit)?;
        let mask = qubit_mask(self.width, bit);
        let mut probs = [0.0; 2];
        for (label, amplitude) in self.amplitudes.iter().enumerate() {
            probs[usize::from(label & mask != 0)] += amplitude.norm_sqr();
        }
        Ok(probs)
    }
}
