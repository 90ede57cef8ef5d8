//! Error types for the hydronorm-ecdf crate.

use hydronorm_stats::InvalidMonth;

/// Error type for all fallible operations in the hydronorm-ecdf crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EcdfError {
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

    /// Returned when per-station tables do not cover the data's stations.
    #[error("station count mismatch: tables cover {tables} stations, data has {data}")]
    StationCountMismatch {
        /// Number of stations with tables.
        tables: usize,
        /// Number of stations (or grid cells) in the data.
        data: usize,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when an externally supplied table violates its invariants.
    #[error("invalid empirical CDF table: {reason}")]
    InvalidTable {
        /// Description of the problem.
        reason: String,
    },
}
