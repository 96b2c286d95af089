mod address;
mod contacts;
mod identifiers;
mod moves;
mod payment;

use std::sync::Arc;

use serde_json::Value;

use utilink_gateway::{GatewayConfig, MemoryCredentialCache, ReqwestHttpClient, ResourceGateway};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let gateway = build_gateway(cli);

    match &cli.command {
        Command::Address { command } => address::run(&gateway, cli, command).await,
        Command::Emails { account } => contacts::emails(&gateway, cli, account).await,
        Command::Phones { account } => contacts::phones(&gateway, cli, account).await,
        Command::Identifiers { account } => identifiers::identifiers(&gateway, cli, account).await,
        Command::Relationships { account } => {
            identifiers::relationships(&gateway, cli, account).await
        }
        Command::PaymentArrangement { command } => payment::run(&gateway, cli, command).await,
        Command::MoveIn {
            account,
            premise,
            product,
            date,
        } => moves::move_in(&gateway, cli, account, premise, product.as_deref(), date).await,
        Command::MoveOut {
            account,
            contract,
            date,
        } => moves::move_out(&gateway, cli, account, contract, date).await,
    }
}

fn build_gateway(cli: &Cli) -> ResourceGateway {
    let config = GatewayConfig::new(&cli.standard_base, &cli.secure_base, &cli.auth_base)
        .with_timeout_ms(cli.timeout_ms);
    ResourceGateway::new(
        config,
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(MemoryCredentialCache::with_default_ttl()),
    )
}

pub(crate) fn bearer_token(cli: &Cli) -> Result<String, CliError> {
    if let Some(token) = &cli.token {
        if !token.trim().is_empty() {
            return Ok(token.clone());
        }
    }

    match std::env::var("UTILINK_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(CliError::MissingToken),
    }
}
