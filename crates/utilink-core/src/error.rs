use thiserror::Error;

/// Validation and contract errors exposed by `utilink-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("account id cannot be empty")]
    EmptyAccountId,
    #[error("account id length {len} exceeds max {max}")]
    AccountIdTooLong { len: usize, max: usize },
    #[error("account id contains invalid character '{ch}' at index {index}")]
    AccountIdInvalidChar { ch: char, index: usize },

    #[error("unknown phone type key '{value}'")]
    UnknownPhoneKind { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("timestamp {millis}ms is outside the representable range")]
    TimestampOutOfRange { millis: i64 },

    #[error("address field '{field}' must not be empty")]
    EmptyAddressField { field: &'static str },
}

/// Wire-decode failures for the upstream system's string-typed primitives.
///
/// Always fatal for the current decode; never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed numeric value '{value}'")]
    MalformedNumeric { value: String },
    #[error("malformed date value '{value}'")]
    MalformedDate { value: String },
}

/// Address-parsing validation failures.
///
/// Fatal for the current normalization call; the source address must be
/// treated as unparsable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid po box: {reason}")]
    InvalidPoBox { reason: &'static str },
    #[error("invalid house number: {reason}")]
    InvalidHouseNumber { reason: &'static str },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
