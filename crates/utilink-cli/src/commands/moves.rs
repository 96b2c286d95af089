use serde_json::{json, Value};

use utilink_core::{AccountId, UtcDateTime};
use utilink_gateway::{MoveInOrder, MoveOutOrder, ResourceGateway};

use crate::cli::Cli;
use crate::error::CliError;

use super::bearer_token;

pub async fn move_in(
    gateway: &ResourceGateway,
    cli: &Cli,
    account: &str,
    premise: &str,
    product: Option<&str>,
    date: &str,
) -> Result<Value, CliError> {
    let account = AccountId::parse(account)?;
    let token = bearer_token(cli)?;
    let move_in_date = UtcDateTime::parse(date)?;

    let item = gateway
        .create_move_in(
            &token,
            &account,
            &MoveInOrder {
                premise_id: premise.to_owned(),
                product_id: product.map(str::to_owned),
                move_in_date,
            },
        )
        .await?;

    Ok(json!({
        "contract_id": item.contract_id,
        "premise_id": item.premise_id,
        "move_in_date": item.move_in_date.map(|ts| ts.format_rfc3339()),
    }))
}

pub async fn move_out(
    gateway: &ResourceGateway,
    cli: &Cli,
    account: &str,
    contract: &str,
    date: &str,
) -> Result<Value, CliError> {
    let account = AccountId::parse(account)?;
    let token = bearer_token(cli)?;
    let move_out_date = UtcDateTime::parse(date)?;

    gateway
        .create_move_out(
            &token,
            &account,
            &MoveOutOrder {
                contract_id: contract.to_owned(),
                move_out_date,
            },
        )
        .await?;

    Ok(json!({ "moved_out": true, "contract_id": contract }))
}
