use std::fmt;

use ndarray::Array2;

/// Parameter errors for the pseudoknot resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnotError {
    /// The probability matrix is not square.
    NotSquare { rows: usize, cols: usize },
}

impl fmt::Display for KnotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnotError::NotSquare { rows, cols } => {
                write!(f, "Probability matrix must be square, got {}x{}", rows, cols)
            }
        }
    }
}

impl std::error::Error for KnotError {}

/// Side length of a square matrix, or the corresponding error.
pub(crate) fn ensure_square(m: &Array2<f64>) -> Result<usize, KnotError> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(KnotError::NotSquare { rows, cols });
    }
    Ok(rows)
}
