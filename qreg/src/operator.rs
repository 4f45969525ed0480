use crate::error::{QuantumError, Result};
use crate::{Amplitude, EPSILON, MAX_WIDTH};
use num_complex::Complex;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

type ElementFn = dyn Fn(usize, usize) -> Amplitude + Send + Sync;

/// Where an operator's matrix elements come from.
#[derive(Clone)]
enum Elements {
    /// Row-major `dim x dim` matrix.
    Dense(Arc<[Amplitude]>),
    Generated(Arc<ElementFn>),
    /// `images[col]` is the row holding the single 1 of column `col`.
    Permutation(Arc<[usize]>),
    /// Hermitian conjugate of another operator.
    Dagger(Arc<Operator>),
}

/// A linear map on the `2^width`-dimensional space of `width` qubits.
///
/// Operators are immutable and cheap to clone; the same operator can be
/// applied to any number of registers and target lists.
#[derive(Clone)]
pub struct Operator {
    width: usize,
    elements: Elements,
}

impl Operator {
    /// Builds a validated operator from a flat row-major matrix of `4^k`
    /// elements.
    pub fn from_matrix(elements: Vec<Amplitude>) -> Result<Self> {
        let width = width_of_flat(elements.len())?;
        Self::validated(Self {
            width,
            elements: Elements::Dense(elements.into()),
        })
    }

    /// Same as [`Operator::from_matrix`] for real-valued matrices.
    pub fn from_real_matrix(elements: &[f64]) -> Result<Self> {
        Self::from_matrix(elements.iter().map(|&re| Complex::new(re, 0.0)).collect())
    }

    /// Builds a validated operator whose element `(row, col)` is `f(row, col)`.
    pub fn from_fn<F>(width: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> Amplitude + Send + Sync + 'static,
    {
        Self::validated(Self::from_fn_unchecked(width, f)?)
    }

    /// Like [`Operator::from_fn`] without the unitarity check. The width is
    /// still range-checked.
    ///
    /// Meant for operators that are unitary by construction. Nothing stops a
    /// caller from building a non-unitary map this way, and applying one
    /// breaks the normalization of the register it touches.
    pub fn from_fn_unchecked<F>(width: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> Amplitude + Send + Sync + 'static,
    {
        check_width(width)?;
        Ok(Self {
            width,
            elements: Elements::Generated(Arc::new(f)),
        })
    }

    /// Builds the permutation matrix of a classical reversible function:
    /// column `x` has its single 1 in row `f(x)`.
    pub fn from_classical_fn<F>(width: usize, f: F) -> Result<Self>
    where
        F: Fn(usize) -> usize,
    {
        check_width(width)?;
        let images: Arc<[usize]> = (0..1usize << width).map(f).collect();
        Self::validated(Self {
            width,
            elements: Elements::Permutation(images),
        })
    }

    pub(crate) fn from_matrix_unchecked(width: usize, elements: Vec<Amplitude>) -> Self {
        debug_assert_eq!(elements.len(), 1 << (2 * width));
        Self {
            width,
            elements: Elements::Dense(elements.into()),
        }
    }

    fn validated(operator: Self) -> Result<Self> {
        operator.check_unitary()?;
        Ok(operator)
    }

    /// Number of qubits the operator acts on.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Dimension of the space the operator acts on, `2^width`.
    pub fn dim(&self) -> usize {
        1 << self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Amplitude {
        match &self.elements {
            Elements::Dense(matrix) => matrix[row * self.dim() + col],
            Elements::Generated(f) => f(row, col),
            Elements::Permutation(images) => {
                if images[col] == row {
                    Complex::new(1.0, 0.0)
                } else {
                    Complex::new(0.0, 0.0)
                }
            }
            Elements::Dagger(inner) => inner.get(col, row).conj(),
        }
    }

    /// The Hermitian conjugate U†. For a unitary operator this is its inverse.
    pub fn dagger(&self) -> Operator {
        if let Elements::Dagger(inner) = &self.elements {
            return inner.as_ref().clone();
        }
        Operator {
            width: self.width,
            elements: Elements::Dagger(Arc::new(self.clone())),
        }
    }

    pub fn is_unitary(&self) -> bool {
        self.check_unitary().is_ok()
    }

    /// Checks `U†U = I` element by element, one parallel task per element of
    /// the product.
    fn check_unitary(&self) -> Result<()> {
        let dim = self.dim();
        let failure = (0..dim * dim).into_par_iter().find_map_any(|flat| {
            let (row, col) = (flat / dim, flat % dim);
            let product: Amplitude = (0..dim)
                .map(|i| self.get(i, row).conj() * self.get(i, col))
                .sum();
            let expected = if row == col {
                Complex::new(1.0, 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
            let deviation = (expected - product).norm();
            if deviation < EPSILON {
                None
            } else {
                Some((row, col, deviation))
            }
        });

        match failure {
            None => Ok(()),
            Some((row, col, deviation)) => {
                tracing::debug!(width = self.width, row, col, deviation, "operator rejected");
                Err(QuantumError::NonUnitaryOperator {
                    row,
                    col,
                    deviation,
                })
            }
        }
    }
}

pub(crate) fn check_width(width: usize) -> Result<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(QuantumError::InvalidWidth(width));
    }
    Ok(())
}

fn width_of_flat(len: usize) -> Result<usize> {
    // 4^k has a single set bit at an even position.
    let zeros = len.trailing_zeros() as usize;
    if len < 4 || !len.is_power_of_two() || zeros % 2 != 0 {
        return Err(QuantumError::InvalidDimension(len));
    }
    let width = zeros / 2;
    check_width(width)?;
    Ok(width)
}

/// Formats an amplitude as `+0.500000-0.500000i`.
pub(crate) fn format_amplitude(amplitude: Amplitude) -> String {
    format!("{:+.6}{:+.6}i", amplitude.re, amplitude.im)
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = self.dim();
        let cells: Vec<Vec<String>> = (0..dim)
            .map(|row| (0..dim).map(|col| format_amplitude(self.get(row, col))).collect())
            .collect();
        let widths: Vec<usize> = (0..dim)
            .map(|col| {
                let widest = cells.iter().map(|r| r[col].len()).max().unwrap_or(0);
                if col == 0 { widest } else { widest + 1 }
            })
            .collect();

        for row in &cells {
            for (cell, &width) in row.iter().zip(&widths) {
                write!(f, "{cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.elements {
            Elements::Dense(_) => "dense",
            Elements::Generated(_) => "generated",
            Elements::Permutation(_) => "permutation",
            Elements::Dagger(_) => "dagger",
        };
        f.debug_struct("Operator")
            .field("width", &self.width)
            .field("elements", &kind)
            .finish()
    }
}
