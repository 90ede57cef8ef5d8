//! Error types for the hydronorm-stats crate.

/// Returned when a month value is outside 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid month: {month} (must be 1..=12)")]
pub struct InvalidMonth {
    /// The invalid month value.
    pub month: u8,
}
