//! Error types for dice codes.

/// Errors raised while parsing a dice code.
///
/// Range errors carry the offending value and the limit, so a caller can
/// tell "zero dice" from "too many dice".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    /// The code does not match `[R#]TdS[*M][+-B]`.
    #[error("invalid dice code: {0}")]
    Syntax(String),

    /// Repeat count outside `1..=max`.
    #[error("{value} repeats is not in range of [1, {max}]")]
    RepeatsOutOfRange {
        /// The requested repeat count.
        value: u64,
        /// The configured maximum.
        max: u32,
    },

    /// Throw count outside `1..=max`.
    #[error("{value} throws is not in range of [1, {max}]")]
    ThrowsOutOfRange {
        /// The requested throw count.
        value: u64,
        /// The configured maximum.
        max: u32,
    },

    /// Side count outside `1..=max`.
    #[error("{value} sides is not in range of [1, {max}]")]
    SidesOutOfRange {
        /// The requested side count.
        value: u64,
        /// The configured maximum.
        max: u32,
    },

    /// Multiplier above `max`.
    #[error("multiplier {value} is not in range of [0, {max}]")]
    MultiplierOutOfRange {
        /// The requested multiplier.
        value: u64,
        /// The configured maximum.
        max: u32,
    },

    /// Bonus magnitude above `max`.
    #[error("bonus {value} is not in range of [-{max}, {max}]")]
    BonusOutOfRange {
        /// The requested bonus, saturated to `i64`.
        value: i64,
        /// The configured maximum magnitude.
        max: u32,
    },
}

impl DiceError {
    /// True when a range error was caused by a zero.
    pub fn is_zero(&self) -> bool {
        matches!(
            self,
            Self::RepeatsOutOfRange { value: 0, .. }
                | Self::ThrowsOutOfRange { value: 0, .. }
                | Self::SidesOutOfRange { value: 0, .. }
        )
    }
}

/// Convenience result type for dice operations.
pub type DiceResult<T> = Result<T, DiceError>;
