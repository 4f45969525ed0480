pub mod apply;
pub mod diagnostics;
pub mod error;
pub mod gates;
pub mod index;
pub mod measurement;
pub mod operator;
pub mod register;

use num_complex::Complex;

/// Complex coefficient of one basis state.
pub type Amplitude = Complex<f64>;

/// Tolerance for unitarity checks and normalization.
pub const EPSILON: f64 = 1e-10;

/// Widest register or gate accepted. A dense vector of 2^30 amplitudes is
/// already 16 GiB.
pub const MAX_WIDTH: usize = 30;

pub use diagnostics::{StateEntry, emit_dump};
pub use error::{QuantumError, Result, TargetFault};
pub use index::IndexMap;
pub use operator::Operator;
pub use register::Register;
