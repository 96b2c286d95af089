//! Move-in / move-out contract item operations over the secure
//! `ContractItems` resource.

use serde::{Deserialize, Serialize};

use utilink_core::codec::{epoch_date, epoch_date_opt};
use utilink_core::{AccountId, UtcDateTime};

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::key_segment;

const OP_MOVE_IN: &str = "create_move_in";
const OP_MOVE_OUT: &str = "create_move_out";

#[derive(Debug, Clone, Serialize)]
struct MoveInCreateRecord {
    #[serde(rename = "AccountID")]
    account_id: String,
    #[serde(rename = "PremiseID")]
    premise_id: String,
    #[serde(rename = "ProductID")]
    product_id: String,
    #[serde(rename = "MoveInDate", with = "epoch_date")]
    move_in_date: UtcDateTime,
}

#[derive(Debug, Clone, Serialize)]
struct MoveOutRecord {
    #[serde(rename = "AccountID")]
    account_id: String,
    #[serde(rename = "ContractID")]
    contract_id: String,
    #[serde(rename = "MoveOutDate", with = "epoch_date")]
    move_out_date: UtcDateTime,
}

#[derive(Debug, Clone, Deserialize)]
struct ContractItemRecord {
    #[serde(rename = "ContractID", default)]
    contract_id: String,
    #[serde(rename = "PremiseID", default)]
    premise_id: String,
    #[serde(rename = "MoveInDate", default, with = "epoch_date_opt")]
    move_in_date: Option<UtcDateTime>,
    #[serde(rename = "MoveOutDate", default, with = "epoch_date_opt")]
    move_out_date: Option<UtcDateTime>,
}

/// A supply contract item as the upstream reports it after a move order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractItem {
    pub contract_id: String,
    pub premise_id: String,
    pub move_in_date: Option<UtcDateTime>,
    pub move_out_date: Option<UtcDateTime>,
}

impl From<ContractItemRecord> for ContractItem {
    fn from(record: ContractItemRecord) -> Self {
        Self {
            contract_id: record.contract_id,
            premise_id: record.premise_id,
            move_in_date: record.move_in_date,
            move_out_date: record.move_out_date,
        }
    }
}

/// Request to start supply at a premise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInOrder {
    pub premise_id: String,
    pub product_id: Option<String>,
    pub move_in_date: UtcDateTime,
}

/// Request to end supply on a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutOrder {
    pub contract_id: String,
    pub move_out_date: UtcDateTime,
}

impl ResourceGateway {
    /// Create a move-in contract item at a premise.
    pub async fn create_move_in(
        &self,
        token: &str,
        account: &AccountId,
        order: &MoveInOrder,
    ) -> Result<ContractItem, GatewayError> {
        if order.premise_id.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                OP_MOVE_IN,
                "premise id must not be empty",
            ));
        }

        let record = MoveInCreateRecord {
            account_id: account.as_str().to_owned(),
            premise_id: order.premise_id.trim().to_owned(),
            product_id: order.product_id.clone().unwrap_or_default(),
            move_in_date: order.move_in_date,
        };
        let body = serde_json::to_string(&record).map_err(|error| {
            GatewayError::invalid_request(OP_MOVE_IN, format!("failed to encode request: {error}"))
        })?;

        let created: ContractItemRecord = self
            .invoke(
                CallerIdentity::Bearer(token),
                Operation::post(
                    OP_MOVE_IN,
                    UpstreamBase::Secure,
                    String::from("ContractItems"),
                    body,
                ),
            )
            .await?;
        Ok(created.into())
    }

    /// Record a move-out date on an existing contract item.
    pub async fn create_move_out(
        &self,
        token: &str,
        account: &AccountId,
        order: &MoveOutOrder,
    ) -> Result<(), GatewayError> {
        if order.contract_id.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                OP_MOVE_OUT,
                "contract id must not be empty",
            ));
        }

        let record = MoveOutRecord {
            account_id: account.as_str().to_owned(),
            contract_id: order.contract_id.trim().to_owned(),
            move_out_date: order.move_out_date,
        };
        let body = serde_json::to_string(&record).map_err(|error| {
            GatewayError::invalid_request(OP_MOVE_OUT, format!("failed to encode request: {error}"))
        })?;

        let path = format!(
            "ContractItems(ContractID='{}')",
            key_segment(order.contract_id.trim())
        );
        self.invoke_no_content(
            CallerIdentity::Bearer(token),
            Operation::put(OP_MOVE_OUT, UpstreamBase::Secure, path, body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_in_record_encodes_epoch_date() {
        let record = MoveInCreateRecord {
            account_id: String::from("200001234"),
            premise_id: String::from("PR-5"),
            product_id: String::new(),
            move_in_date: UtcDateTime::from_epoch_millis(1_700_000_000_000).expect("in range"),
        };

        let encoded = serde_json::to_value(&record).expect("must encode");
        assert_eq!(encoded["MoveInDate"], "/Date(1700000000000)/");
        assert_eq!(encoded["PremiseID"], "PR-5");
    }

    #[test]
    fn contract_item_record_decodes_optional_dates() {
        let raw = r#"{"ContractID": "CT-9", "PremiseID": "PR-5",
                      "MoveInDate": "/Date(1700000000000)/", "MoveOutDate": ""}"#;
        let record: ContractItemRecord = serde_json::from_str(raw).expect("must decode");
        let item = ContractItem::from(record);

        assert_eq!(item.contract_id, "CT-9");
        assert!(item.move_in_date.is_some());
        assert_eq!(item.move_out_date, None);
    }
}
