use thiserror::Error;

/// An error type for vector operations.
///
/// Both variants are recoverable: the operation that reports them leaves
/// every involved vector untouched.
#[derive(Error, Debug, PartialEq)]
pub enum VectorError {
    /// Index exceeds the vector bounds.
    ///
    /// Raised by indexed access when `index >= len`, including any index on
    /// an empty vector. Indices are never clamped or wrapped.
    #[error("Index {index} out of range for vector of length {len}")]
    OutOfRange {
        /// The invalid index that was attempted
        index: usize,
        /// The length of the vector being indexed
        len: usize,
    },

    /// Operand lengths differ in an elementwise operation.
    #[error("Shape mismatch: elementwise operation on vectors of length {lhs} and {rhs}")]
    ShapeMismatch {
        /// Length of the left-hand operand
        lhs: usize,
        /// Length of the right-hand operand
        rhs: usize,
    },
}

impl VectorError {
    /// Creates an OutOfRange error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    /// Creates a ShapeMismatch error.
    pub fn shape_mismatch(lhs: usize, rhs: usize) -> Self {
        Self::ShapeMismatch { lhs, rhs }
    }

    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::OutOfRange { .. } => "Verify indices are within bounds (0 <= index < len)",
            Self::ShapeMismatch { .. } => {
                "Elementwise operations require both vectors to have the same length"
            }
        }
    }
}
