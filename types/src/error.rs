use thiserror::Error;

/// Failure converting a human-decimal amount string into base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a decimal number: {0:?}")]
    Malformed(String),

    #[error("amount has more than {max} fractional digits")]
    TooManyDecimals { max: usize },

    #[error("amount does not fit in 256 bits")]
    Overflow,
}
