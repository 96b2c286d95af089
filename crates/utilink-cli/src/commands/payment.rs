use serde_json::{json, Value};

use utilink_core::{AccountId, UtcDateTime};
use utilink_gateway::{NewPaymentArrangement, PaymentArrangement, ResourceGateway};

use crate::cli::{Cli, PaymentCommand};
use crate::error::CliError;

use super::bearer_token;

pub async fn run(
    gateway: &ResourceGateway,
    cli: &Cli,
    command: &PaymentCommand,
) -> Result<Value, CliError> {
    match command {
        PaymentCommand::Get { account } => {
            let account = AccountId::parse(account)?;
            let token = bearer_token(cli)?;

            let arrangement = gateway.payment_arrangement(&token, &account).await?;
            Ok(render(&arrangement))
        }
        PaymentCommand::Create {
            account,
            installments,
            first_due,
        } => {
            let account = AccountId::parse(account)?;
            let token = bearer_token(cli)?;
            let first_due = UtcDateTime::parse(first_due)?;

            let created = gateway
                .create_payment_arrangement(
                    &token,
                    &account,
                    &NewPaymentArrangement {
                        installments: *installments,
                        first_due,
                    },
                )
                .await?;
            Ok(render(&created))
        }
    }
}

fn render(arrangement: &PaymentArrangement) -> Value {
    json!({
        "id": arrangement.id,
        "installments": arrangement.installments,
        "installment_amount": arrangement.installment_amount.to_wire_string(),
        "first_due": arrangement.first_due.format_rfc3339(),
    })
}
