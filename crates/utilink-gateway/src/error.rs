use std::fmt::{Display, Formatter};

use utilink_core::envelope::{EnvelopeFault, ErrorResult};

/// Gateway-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Caller-supplied input failed validation or normalization.
    InvalidRequest,
    /// The credential exchange failed or returned an unparsable body.
    CredentialExchange,
    /// Connection, timeout, or non-success status without a structured
    /// upstream error. Not distinguished further by design.
    Transport,
    /// The response body could not be decoded.
    Decode,
    /// The upstream reported a structured error.
    Upstream,
    /// The response carried neither a result nor an error.
    ContractViolation,
}

/// Structured gateway error carrying the originating operation and, for
/// upstream failures, the upstream code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    operation: &'static str,
    message: String,
    upstream_code: Option<String>,
    retryable: bool,
}

impl GatewayError {
    pub fn invalid_request(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::InvalidRequest,
            operation,
            message: message.into(),
            upstream_code: None,
            retryable: false,
        }
    }

    pub fn credential_exchange(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::CredentialExchange,
            operation,
            message: message.into(),
            upstream_code: None,
            retryable: false,
        }
    }

    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Transport,
            operation,
            message: message.into(),
            upstream_code: None,
            retryable: true,
        }
    }

    pub fn decode(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Decode,
            operation,
            message: message.into(),
            upstream_code: None,
            retryable: false,
        }
    }

    pub fn upstream(operation: &'static str, error: &ErrorResult) -> Self {
        Self {
            kind: GatewayErrorKind::Upstream,
            operation,
            message: error.message_text().to_owned(),
            upstream_code: Some(error.code.clone()),
            retryable: false,
        }
    }

    pub fn contract_violation(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::ContractViolation,
            operation,
            message: message.into(),
            upstream_code: None,
            retryable: false,
        }
    }

    pub fn from_fault(operation: &'static str, fault: EnvelopeFault) -> Self {
        match fault {
            EnvelopeFault::Upstream(error) => Self::upstream(operation, &error),
            EnvelopeFault::MissingPayload => Self::contract_violation(
                operation,
                "response carried neither a result nor an error",
            ),
        }
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Upstream error code, when the upstream reported one.
    pub fn upstream_code(&self) -> Option<&str> {
        self.upstream_code.as_deref()
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            GatewayErrorKind::InvalidRequest => "gateway.invalid_request",
            GatewayErrorKind::CredentialExchange => "gateway.credential_exchange",
            GatewayErrorKind::Transport => "gateway.transport",
            GatewayErrorKind::Decode => "gateway.decode",
            GatewayErrorKind::Upstream => "gateway.upstream",
            GatewayErrorKind::ContractViolation => "gateway.contract_violation",
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.upstream_code {
            Some(code) => write!(
                f,
                "{}: upstream {code}: {} ({})",
                self.operation,
                self.message,
                self.code()
            ),
            None => write!(f, "{}: {} ({})", self.operation, self.message, self.code()),
        }
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
mod tests {
    use super::*;
    use utilink_core::envelope::ErrorMessage;

    #[test]
    fn upstream_error_carries_code_and_message() {
        let error = GatewayError::upstream(
            "get_mailing_address",
            &ErrorResult {
                code: String::from("ZCM/102"),
                message: ErrorMessage {
                    language: String::from("en"),
                    value: String::from("Account not found"),
                },
                inner_error: None,
            },
        );

        assert_eq!(error.kind(), GatewayErrorKind::Upstream);
        assert_eq!(error.upstream_code(), Some("ZCM/102"));
        assert_eq!(error.code(), "gateway.upstream");
        assert!(error.to_string().contains("get_mailing_address"));
        assert!(error.to_string().contains("ZCM/102"));
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(GatewayError::transport("op", "connection refused").retryable());
        assert!(!GatewayError::decode("op", "bad json").retryable());
        assert!(!GatewayError::credential_exchange("op", "exchange failed").retryable());
    }
}
