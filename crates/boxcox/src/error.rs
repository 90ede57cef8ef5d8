//! Error types for the hydronorm-boxcox crate.

/// Error type for all fallible operations in the hydronorm-boxcox crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoxCoxError {
    /// Returned when the exponent is not finite and positive.
    #[error("exponent must be finite and > 0, got {exponent}")]
    InvalidExponent {
        /// The rejected exponent.
        exponent: f64,
    },

    /// Returned when data and variance arrays differ in shape.
    #[error("shape mismatch: data has shape {data:?}, variance has shape {variance:?}")]
    ShapeMismatch {
        /// Shape of the data array.
        data: Vec<usize>,
        /// Shape of the variance array.
        variance: Vec<usize>,
    },
}
