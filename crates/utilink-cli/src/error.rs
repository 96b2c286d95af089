use thiserror::Error;

use utilink_gateway::GatewayErrorKind;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] utilink_core::ValidationError),

    #[error(transparent)]
    Gateway(#[from] utilink_gateway::GatewayError),

    #[error(transparent)]
    Store(#[from] utilink_store::StoreError),

    #[error("no bearer token: pass --token or set UTILINK_TOKEN")]
    MissingToken,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::MissingToken => 3,
            Self::Gateway(error) => match error.kind() {
                GatewayErrorKind::InvalidRequest => 2,
                GatewayErrorKind::Upstream => 4,
                GatewayErrorKind::CredentialExchange => 6,
                GatewayErrorKind::Transport => 7,
                GatewayErrorKind::Decode | GatewayErrorKind::ContractViolation => 8,
            },
            Self::Store(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
