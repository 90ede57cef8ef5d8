//! Error types for the hydronorm-gamma crate.

use hydronorm_stats::InvalidMonth;

/// Error type for all fallible operations in the hydronorm-gamma crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GammaError {
    /// Returned when a month value is outside 1..=12.
    #[error(transparent)]
    InvalidMonth(#[from] InvalidMonth),

    /// Returned when the months slice does not match the time axis.
    #[error("length mismatch: time axis has {expected} steps, months has {got}")]
    LengthMismatch {
        /// Length of the time axis.
        expected: usize,
        /// Length of the months slice.
        got: usize,
    },

    /// Returned when the parameter table and the data disagree on units.
    #[error("unit count mismatch: table has {table} units, data has {data}")]
    UnitCountMismatch {
        /// Number of units (stations or cells) in the table.
        table: usize,
        /// Number of units in the data.
        data: usize,
    },

    /// Returned when shape and scale arrays have unusable dimensions.
    #[error("invalid parameter table shape: shape array {shape:?}, scale array {scale:?}")]
    TableShape {
        /// Dimensions of the shape-parameter array.
        shape: Vec<usize>,
        /// Dimensions of the scale-parameter array.
        scale: Vec<usize>,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a gamma distribution cannot be constructed.
    ///
    /// The `message` field is a `String` because statrs errors are not
    /// `Clone`.
    #[error("gamma construction failed (shape={shape}, scale={scale}): {message}")]
    GammaConstruction {
        /// Shape parameter that caused the failure.
        shape: f64,
        /// Scale parameter that caused the failure.
        scale: f64,
        /// Description of the failure.
        message: String,
    },
}
