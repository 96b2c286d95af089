use serde_json::{json, Value};

use utilink_core::{AccountId, UtcDateTime};
use utilink_gateway::ResourceGateway;

use crate::cli::Cli;
use crate::error::CliError;

use super::bearer_token;

pub async fn identifiers(
    gateway: &ResourceGateway,
    cli: &Cli,
    account: &str,
) -> Result<Value, CliError> {
    let account = AccountId::parse(account)?;
    let token = bearer_token(cli)?;

    let identifiers = gateway.account_identifiers(&token, &account).await?;
    Ok(Value::Array(
        identifiers
            .into_iter()
            .map(|identifier| {
                json!({
                    "kind": identifier.kind,
                    "number": identifier.number,
                    "institute": identifier.institute,
                    "valid_from": rfc3339(identifier.valid_from),
                    "valid_to": rfc3339(identifier.valid_to),
                })
            })
            .collect(),
    ))
}

pub async fn relationships(
    gateway: &ResourceGateway,
    cli: &Cli,
    account: &str,
) -> Result<Value, CliError> {
    let account = AccountId::parse(account)?;
    let token = bearer_token(cli)?;

    let relationships = gateway.account_relationships(&token, &account).await?;
    Ok(Value::Array(
        relationships
            .into_iter()
            .map(|relationship| {
                json!({
                    "related_account": relationship.related_account,
                    "kind": relationship.kind,
                    "default": relationship.default,
                })
            })
            .collect(),
    ))
}

fn rfc3339(value: Option<UtcDateTime>) -> Value {
    match value {
        Some(ts) => Value::String(ts.format_rfc3339()),
        None => Value::Null,
    }
}
