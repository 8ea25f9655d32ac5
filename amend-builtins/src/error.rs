use amend_types::ValueKind;
use thiserror::Error;

/// Construction-time errors for the built-in amendments.
///
/// These surface before any pipeline runs: a misconfigured amendment is a
/// caller error, distinct from both amendment failures (bad input data,
/// returned as outcomes) and implementation failures (hard `ApplyError`s).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("bound endpoints disagree in kind: {min} vs {max}")]
    MixedBoundKinds { min: ValueKind, max: ValueKind },

    #[error("bound endpoint kind `{0}` has no ordering")]
    UnorderedBoundKind(ValueKind),

    #[error("bound endpoint is not a finite number")]
    NonFiniteBound,

    #[error("bounds are inverted: minimum exceeds maximum")]
    InvertedBounds,

    #[error("at least one bound endpoint is required")]
    MissingBounds,

    #[error("length window is inverted: minimum {min} exceeds maximum {max}")]
    InvertedLengths { min: usize, max: usize },

    #[error("length multiples must be natural numbers")]
    ZeroMultiple,

    #[error("least common multiple of the length multiples overflows")]
    MultipleOverflow,

    #[error("rounding to {0} decimals exceeds f64 precision")]
    ExcessiveDecimals(u32),
}
