use serde_json::{json, Value};

use utilink_core::{AccountId, StructuredAddress};
use utilink_gateway::ResourceGateway;
use utilink_store::RecordStore;

use crate::cli::{AddressCommand, Cli};
use crate::error::CliError;

use super::bearer_token;

pub async fn run(
    gateway: &ResourceGateway,
    cli: &Cli,
    command: &AddressCommand,
) -> Result<Value, CliError> {
    match command {
        AddressCommand::Get { account } => {
            let account = AccountId::parse(account)?;
            let token = bearer_token(cli)?;

            let mailing = gateway.mailing_address(&token, &account).await?;

            // Write through to the local cache of record.
            let store = RecordStore::open_default()?;
            store.put_address(&account, &mailing.address_id, &mailing.address)?;

            Ok(json!({
                "account_id": account.as_str(),
                "address_id": mailing.address_id,
                "address": serde_json::to_value(&mailing.address)?,
            }))
        }
        AddressCommand::Cached { account } => {
            let account = AccountId::parse(account)?;
            let store = RecordStore::open_default()?;

            match store.get_address(&account)? {
                Some(address) => Ok(json!({
                    "cached": true,
                    "address": serde_json::to_value(&address)?,
                })),
                None => Ok(json!({ "cached": false })),
            }
        }
        AddressCommand::Update {
            account,
            address_id,
            address,
        } => {
            let account = AccountId::parse(account)?;
            let token = bearer_token(cli)?;
            let structured = StructuredAddress::new(
                &address.line1,
                address.line2.clone(),
                &address.city,
                address.region.clone(),
                &address.postal_code,
                &address.country,
            )?;

            gateway
                .update_account_address(&token, &account, address_id, &structured)
                .await?;

            let store = RecordStore::open_default()?;
            store.put_address(&account, address_id, &structured)?;

            Ok(json!({ "updated": true, "address_id": address_id }))
        }
    }
}
