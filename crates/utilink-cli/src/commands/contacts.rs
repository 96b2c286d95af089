use serde_json::{json, Value};

use utilink_core::AccountId;
use utilink_gateway::ResourceGateway;

use crate::cli::Cli;
use crate::error::CliError;

use super::bearer_token;

pub async fn emails(
    gateway: &ResourceGateway,
    cli: &Cli,
    account: &str,
) -> Result<Value, CliError> {
    let account = AccountId::parse(account)?;
    let token = bearer_token(cli)?;

    let contacts = gateway.email_contacts(&token, &account).await?;
    Ok(Value::Array(
        contacts
            .into_iter()
            .map(|contact| {
                json!({
                    "address_id": contact.address_id,
                    "sequence_no": contact.sequence_no,
                    "email": contact.email,
                    "standard": contact.standard,
                })
            })
            .collect(),
    ))
}

pub async fn phones(
    gateway: &ResourceGateway,
    cli: &Cli,
    account: &str,
) -> Result<Value, CliError> {
    let account = AccountId::parse(account)?;
    let token = bearer_token(cli)?;

    let contacts = gateway.phone_contacts(&token, &account).await?;
    Ok(Value::Array(
        contacts
            .into_iter()
            .map(|contact| {
                json!({
                    "address_id": contact.address_id,
                    "sequence_no": contact.sequence_no,
                    "number": contact.number,
                    "extension": contact.extension,
                    "kind": contact.kind.as_key(),
                    "standard": contact.standard,
                })
            })
            .collect(),
    ))
}
