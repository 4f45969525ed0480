//! Standard gates built from closed-form matrices.

use crate::error::Result;
use crate::operator::{Operator, check_width};
use crate::register::Register;
use num_complex::Complex;
use std::f64::consts::SQRT_2;

fn one_qubit(matrix: [[Complex<f64>; 2]; 2]) -> Operator {
    Operator::from_matrix_unchecked(1, matrix.concat())
}

/// Pauli X, the NOT gate.
pub fn pauli_x() -> Operator {
    one_qubit([
        [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    ])
}

pub fn pauli_y() -> Operator {
    one_qubit([
        [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
        [Complex::new(0.0, 1.0), Complex::new(0.0, 0.0)],
    ])
}

pub fn pauli_z() -> Operator {
    one_qubit([
        [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
        [Complex::new(0.0, 0.0), Complex::new(-1.0, 0.0)],
    ])
}

/// Rx(θ) = cos(θ/2) I - i sin(θ/2) X
pub fn rotation_x(theta: f64) -> Operator {
    let (sin, cos) = (theta / 2.0).sin_cos();
    one_qubit([
        [Complex::new(cos, 0.0), Complex::new(0.0, -sin)],
        [Complex::new(0.0, -sin), Complex::new(cos, 0.0)],
    ])
}

/// Ry(θ) = cos(θ/2) I - i sin(θ/2) Y, a real matrix.
pub fn rotation_y(theta: f64) -> Operator {
    let (sin, cos) = (theta / 2.0).sin_cos();
    one_qubit([
        [Complex::new(cos, 0.0), Complex::new(-sin, 0.0)],
        [Complex::new(sin, 0.0), Complex::new(cos, 0.0)],
    ])
}

/// Rz(θ) = diag(e^{-iθ/2}, e^{iθ/2})
pub fn rotation_z(theta: f64) -> Operator {
    let half = theta / 2.0;
    one_qubit([
        [Complex::from_polar(1.0, -half), Complex::new(0.0, 0.0)],
        [Complex::new(0.0, 0.0), Complex::from_polar(1.0, half)],
    ])
}

/// The Hadamard transform on `width` qubits: element `(row, col)` is
/// `(-1)^popcount(row & col) / sqrt(2^width)`.
pub fn hadamard(width: usize) -> Result<Operator> {
    check_width(width)?;
    // sqrt(2^w) = 2^(w/2) * sqrt(2)^(w mod 2), exact for even widths.
    let mut norm = (1usize << (width / 2)) as f64;
    if width % 2 == 1 {
        norm *= SQRT_2;
    }
    let positive = Complex::new(norm.recip(), 0.0);
    Operator::from_fn_unchecked(width, move |row, col| {
        if (row & col).count_ones() % 2 == 1 {
            -positive
        } else {
            positive
        }
    })
}

/// Grover's diffusion operator on `width` qubits, `2/2^w - δ(row, col)`.
pub fn diffusion(width: usize) -> Result<Operator> {
    check_width(width)?;
    let off_diagonal = 2.0 / (1usize << width) as f64;
    Operator::from_fn(width, move |row, col| {
        if row == col {
            Complex::new(off_diagonal - 1.0, 0.0)
        } else {
            Complex::new(off_diagonal, 0.0)
        }
    })
}

/// Hadamard on a single qubit.
pub fn hadamard_on(register: &mut Register, target: usize) -> Result<()> {
    hadamard(1)?.apply(register, &[target])
}

/// Hadamard on the qubits `start..end`.
pub fn hadamard_range(register: &mut Register, start: usize, end: usize) -> Result<()> {
    hadamard(end.saturating_sub(start))?.apply_range(register, start)
}

/// Hadamard on every qubit of the register.
pub fn hadamard_reg(register: &mut Register) -> Result<()> {
    hadamard_range(register, 0, register.width())
}

/// Diffusion on a single qubit.
pub fn diffusion_on(register: &mut Register, target: usize) -> Result<()> {
    diffusion(1)?.apply(register, &[target])
}

/// Diffusion on the qubits `start..end`.
pub fn diffusion_range(register: &mut Register, start: usize, end: usize) -> Result<()> {
    diffusion(end.saturating_sub(start))?.apply_range(register, start)
}

/// Diffusion on every qubit of the register.
pub fn diffusion_reg(register: &mut Register) -> Result<()> {
    diffusion_range(register, 0, register.width())
}
