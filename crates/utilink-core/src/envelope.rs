//! Generic decode of the upstream response wrappers.
//!
//! The upstream wraps every successful payload under a `"d"` member — a
//! single object for entity reads, `{"results": [...]}` for list reads —
//! and failures under a top-level `"error"` member. Decoding never fails on
//! a populated `error`; callers classify via [`Envelope::into_result`] /
//! [`ResultsEnvelope::into_results`]. Fields we do not model (`__metadata`,
//! navigation stubs) are ignored so additive upstream schema changes cannot
//! break the decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Localized error message as the upstream carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "lang", default)]
    pub language: String,
    #[serde(rename = "value")]
    pub value: String,
}

/// One entry of the nested error-detail list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "code", default)]
    pub code: String,
    #[serde(rename = "message", default)]
    pub message: String,
    #[serde(rename = "propertyref", default)]
    pub property_ref: String,
    #[serde(rename = "severity", default)]
    pub severity: String,
}

/// The upstream's nested diagnostic block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerError {
    /// Opaque application block; passed through for logging only.
    #[serde(rename = "application", default, skip_serializing_if = "Option::is_none")]
    pub application: Option<serde_json::Value>,
    #[serde(rename = "transactionid", default)]
    pub transaction_id: String,
    #[serde(rename = "timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "errordetails", default)]
    pub error_details: Vec<ErrorDetail>,
}

/// Error payload of a failed upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(rename = "code", default)]
    pub code: String,
    #[serde(rename = "message")]
    pub message: ErrorMessage,
    #[serde(rename = "innererror", default, skip_serializing_if = "Option::is_none")]
    pub inner_error: Option<InnerError>,
}

impl ErrorResult {
    /// The human-readable message text.
    pub fn message_text(&self) -> &str {
        &self.message.value
    }
}

/// Why an envelope did not yield a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeFault {
    /// The upstream reported a structured error.
    Upstream(ErrorResult),
    /// Neither `result` nor `error` was populated — a contract violation,
    /// fatal and never retried.
    MissingPayload,
}

/// Single-result response wrapper: exactly one of `result`/`error` is
/// populated in a well-formed response.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<ErrorResult>,
}

impl<T> Envelope<T> {
    pub fn of(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: ErrorResult) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    /// Classify the response. A populated `error` wins over any payload;
    /// neither populated is a contract violation.
    pub fn into_result(self) -> Result<T, EnvelopeFault> {
        if let Some(error) = self.error {
            return Err(EnvelopeFault::Upstream(error));
        }
        self.result.ok_or(EnvelopeFault::MissingPayload)
    }
}

/// List-shaped response wrapper. Upstream ordering is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsEnvelope<T> {
    pub results: Vec<T>,
    pub error: Option<ErrorResult>,
    payload_present: bool,
}

impl<T> ResultsEnvelope<T> {
    pub fn of(results: Vec<T>) -> Self {
        Self {
            results,
            error: None,
            payload_present: true,
        }
    }

    pub fn failed(error: ErrorResult) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error),
            payload_present: false,
        }
    }

    /// Classify the response; an empty list under `d` is a valid payload.
    pub fn into_results(self) -> Result<Vec<T>, EnvelopeFault> {
        if let Some(error) = self.error {
            return Err(EnvelopeFault::Upstream(error));
        }
        if !self.payload_present {
            return Err(EnvelopeFault::MissingPayload);
        }
        Ok(self.results)
    }
}

#[derive(Deserialize)]
struct RawEnvelope<T> {
    #[serde(rename = "d", default = "none")]
    result: Option<T>,
    #[serde(rename = "error", default)]
    error: Option<ErrorResult>,
}

#[derive(Deserialize)]
struct RawResultsBody<T> {
    #[serde(rename = "results", default = "empty")]
    results: Vec<T>,
}

fn none<T>() -> Option<T> {
    None
}

fn empty<T>() -> Vec<T> {
    Vec::new()
}

/// Decode a single-result response body.
pub fn decode_envelope<T>(raw: &str) -> Result<Envelope<T>, serde_json::Error>
where
    T: DeserializeOwned,
{
    let parsed: RawEnvelope<T> = serde_json::from_str(raw)?;
    Ok(Envelope {
        result: parsed.result,
        error: parsed.error,
    })
}

/// Decode a list-shaped response body.
pub fn decode_results_envelope<T>(raw: &str) -> Result<ResultsEnvelope<T>, serde_json::Error>
where
    T: DeserializeOwned,
{
    let parsed: RawEnvelope<RawResultsBody<T>> = serde_json::from_str(raw)?;
    let payload_present = parsed.result.is_some();
    Ok(ResultsEnvelope {
        results: parsed.result.map(|body| body.results).unwrap_or_default(),
        error: parsed.error,
        payload_present,
    })
}
