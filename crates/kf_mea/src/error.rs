use std::fmt;

use ndarray::Array2;

/// Parameter errors for the decision engines and scorers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeaError {
    /// The probability matrix is not square.
    NotSquare { rows: usize, cols: usize },
    /// Two matrices that must describe the same sequence differ in shape.
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl fmt::Display for MeaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeaError::NotSquare { rows, cols } => {
                write!(f, "Probability matrix must be square, got {}x{}", rows, cols)
            }
            MeaError::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "Matrix shapes disagree: expected {}x{}, found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
        }
    }
}

impl std::error::Error for MeaError {}

/// Side length of a square matrix, or the corresponding error.
pub(crate) fn ensure_square(m: &Array2<f64>) -> Result<usize, MeaError> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(MeaError::NotSquare { rows, cols });
    }
    Ok(rows)
}
