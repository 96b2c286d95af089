//! Value converters for the upstream system's wire primitives.
//!
//! The upstream serializes identifier and amount fields as quoted strings
//! (`"0042"` stays a string, `"10.50"` keeps its written scale) and dates as
//! `/Date(<epoch-millis>)/` literals. The functions here are pure; the serde
//! adapter modules ([`quoted_i64`], [`quoted_decimal`], [`epoch_date`],
//! [`epoch_date_opt`]) let wire DTOs declare such fields directly with
//! `#[serde(with = "...")]`.

use crate::error::CodecError;
use crate::timestamp::UtcDateTime;

/// A numeric value as the upstream wire carries it.
///
/// Decimals remember the scale they were written with so that
/// `encode(decode(x)) == x` holds for values such as `"10.50"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotedNumber {
    Integer(i64),
    Decimal { mantissa: i128, scale: u32 },
}

impl QuotedNumber {
    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(value),
            Self::Decimal { .. } => None,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Decimal { mantissa, scale } => mantissa as f64 / 10f64.powi(scale as i32),
        }
    }

    /// Canonical wire text without the surrounding quotes.
    pub fn to_wire_string(self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Decimal { mantissa, scale } => {
                let negative = mantissa < 0;
                let digits = mantissa.unsigned_abs().to_string();
                let scale = scale as usize;
                let padded = if digits.len() <= scale {
                    format!("{}{digits}", "0".repeat(scale - digits.len() + 1))
                } else {
                    digits
                };
                let (int_part, frac_part) = padded.split_at(padded.len() - scale);
                if negative {
                    format!("-{int_part}.{frac_part}")
                } else {
                    format!("{int_part}.{frac_part}")
                }
            }
        }
    }
}

/// Decode a possibly-quoted numeric string.
///
/// Strips one pair of surrounding double quotes if present, then parses as
/// an integer or a scale-preserving decimal.
pub fn decode_quoted_number(raw: &str) -> Result<QuotedNumber, CodecError> {
    parse_number(strip_quotes(raw.trim())).ok_or_else(|| CodecError::MalformedNumeric {
        value: raw.to_owned(),
    })
}

/// Encode a numeric value in the quoted form the upstream requires for
/// identifier fields.
pub fn encode_quoted_number(value: QuotedNumber) -> String {
    format!("\"{}\"", value.to_wire_string())
}

/// Decode the `/Date(<integer-milliseconds>)/` literal.
///
/// Empty input decodes to `None` (absent date).
pub fn decode_epoch_date(raw: &str) -> Result<Option<UtcDateTime>, CodecError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let malformed = || CodecError::MalformedDate {
        value: raw.to_owned(),
    };

    let millis = trimmed
        .strip_prefix("/Date(")
        .and_then(|rest| rest.strip_suffix(")/"))
        .filter(|body| is_integer_literal(body))
        .and_then(|body| body.parse::<i64>().ok())
        .ok_or_else(malformed)?;

    UtcDateTime::from_epoch_millis(millis)
        .map(Some)
        .map_err(|_| malformed())
}

/// Encode a timestamp as the upstream epoch-millisecond date literal.
pub fn encode_epoch_date(value: UtcDateTime) -> String {
    format!("/Date({})/", value.epoch_millis())
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

fn parse_number(value: &str) -> Option<QuotedNumber> {
    if let Some((int_part, frac_part)) = value.split_once('.') {
        let (negative, int_digits) = match int_part.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, int_part),
        };
        if int_digits.is_empty()
            || frac_part.is_empty()
            || !int_digits.bytes().all(|byte| byte.is_ascii_digit())
            || !frac_part.bytes().all(|byte| byte.is_ascii_digit())
        {
            return None;
        }

        let mut mantissa: i128 = 0;
        for byte in int_digits.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)?
                .checked_add(i128::from(byte - b'0'))?;
        }
        if negative {
            mantissa = -mantissa;
        }

        Some(QuotedNumber::Decimal {
            mantissa,
            scale: frac_part.len() as u32,
        })
    } else if is_integer_literal(value) {
        value.parse::<i64>().ok().map(QuotedNumber::Integer)
    } else {
        None
    }
}

/// `#[serde(with = "quoted_i64")]` — an `i64` carried as a quoted string.
pub mod quoted_i64 {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_quoted_number, QuotedNumber};

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match decode_quoted_number(&raw) {
            Ok(QuotedNumber::Integer(value)) => Ok(value),
            Ok(QuotedNumber::Decimal { .. }) => Err(D::Error::custom(format!(
                "expected integer, found decimal '{raw}'"
            ))),
            Err(error) => Err(D::Error::custom(error)),
        }
    }
}

/// `#[serde(with = "quoted_decimal")]` — a [`QuotedNumber`] carried as a
/// quoted string, scale preserved.
pub mod quoted_decimal {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_quoted_number, QuotedNumber};

    pub fn serialize<S>(value: &QuotedNumber, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_wire_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<QuotedNumber, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        decode_quoted_number(&raw).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "epoch_date")]` — a required `/Date(ms)/` field.
pub mod epoch_date {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_epoch_date, encode_epoch_date};
    use crate::timestamp::UtcDateTime;

    pub fn serialize<S>(value: &UtcDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_epoch_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<UtcDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        decode_epoch_date(&raw)
            .map_err(D::Error::custom)?
            .ok_or_else(|| D::Error::custom("date must not be empty"))
    }
}

/// `#[serde(with = "epoch_date_opt")]` — an optional `/Date(ms)/` field;
/// the upstream encodes absence as an empty string.
pub mod epoch_date_opt {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_epoch_date, encode_epoch_date};
    use crate::timestamp::UtcDateTime;

    pub fn serialize<S>(value: &Option<UtcDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&encode_epoch_date(*ts)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<UtcDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        decode_epoch_date(&raw).map_err(D::Error::custom)
    }
}
