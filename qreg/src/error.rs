use std::fmt;

/// Precondition violations reported by registers and operators.
///
/// None of these describe a recoverable runtime state: the operation that
/// returns one has not touched the amplitude vector.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    #[error("Invalid target qubit {target}: {fault}")]
    InvalidTarget { target: usize, fault: TargetFault },
    #[error("Invalid basis label {values:?} for a {width}-qubit register")]
    InvalidBasisLabel { values: Vec<usize>, width: usize },
    #[error("Bit value {0} should be either 0 or 1")]
    InvalidBitValue(u8),
    #[error("Operator is not unitary: (U\u{2020}U)[{row}][{col}] is off by {deviation:e}")]
    NonUnitaryOperator {
        row: usize,
        col: usize,
        deviation: f64,
    },
    #[error("Operator acts on {operator} qubits but {targets} targets were given")]
    WidthMismatch { operator: usize, targets: usize },
    #[error("A flat matrix of {0} elements is not 4^k for any k >= 1")]
    InvalidDimension(usize),
    #[error("Width {0} is outside the supported range 1..={max}", max = crate::MAX_WIDTH)]
    InvalidWidth(usize),
    #[error("Amplitudes are not normalized: total probability is {0}")]
    NotNormalized(f64),
}

/// Why a qubit index was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFault {
    OutOfRange { width: usize },
    Duplicate,
}

impl fmt::Display for TargetFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFault::OutOfRange { width } => {
                write!(f, "not a qubit of a {width}-qubit register")
            }
            TargetFault::Duplicate => write!(f, "listed more than once"),
        }
    }
}

impl QuantumError {
    pub(crate) fn out_of_range(target: usize, width: usize) -> Self {
        QuantumError::InvalidTarget {
            target,
            fault: TargetFault::OutOfRange { width },
        }
    }
}

pub type Result<T> = std::result::Result<T, QuantumError>;
