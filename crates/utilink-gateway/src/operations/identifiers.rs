//! Account identification documents over the `AccountIdentifications`
//! resource.

use serde::Deserialize;

use utilink_core::codec::epoch_date_opt;
use utilink_core::{AccountId, UtcDateTime};

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::key_segment;

const OP_LIST: &str = "get_account_identifiers";

#[derive(Debug, Clone, Deserialize)]
struct IdentifierRecord {
    #[serde(rename = "IdentifierType", default)]
    identifier_type: String,
    #[serde(rename = "IdentifierNo", default)]
    identifier_no: String,
    #[serde(rename = "InstituteName", default)]
    institute_name: String,
    #[serde(rename = "ValidFromDate", default, with = "epoch_date_opt")]
    valid_from: Option<UtcDateTime>,
    #[serde(rename = "ValidToDate", default, with = "epoch_date_opt")]
    valid_to: Option<UtcDateTime>,
}

/// An identification document registered for the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentifier {
    pub kind: String,
    pub number: String,
    pub institute: Option<String>,
    pub valid_from: Option<UtcDateTime>,
    pub valid_to: Option<UtcDateTime>,
}

impl From<IdentifierRecord> for AccountIdentifier {
    fn from(record: IdentifierRecord) -> Self {
        let institute = record.institute_name.trim();
        Self {
            kind: record.identifier_type,
            number: record.identifier_no,
            institute: if institute.is_empty() {
                None
            } else {
                Some(institute.to_owned())
            },
            valid_from: record.valid_from,
            valid_to: record.valid_to,
        }
    }
}

impl ResourceGateway {
    /// List the account's identification documents in upstream order.
    pub async fn account_identifiers(
        &self,
        token: &str,
        account: &AccountId,
    ) -> Result<Vec<AccountIdentifier>, GatewayError> {
        let path = format!(
            "Accounts('{}')/AccountIdentifications",
            key_segment(account.as_str())
        );
        let records: Vec<IdentifierRecord> = self
            .invoke_many(
                CallerIdentity::Bearer(token),
                Operation::get(OP_LIST, UpstreamBase::Standard, path),
            )
            .await?;

        Ok(records.into_iter().map(AccountIdentifier::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_record_decodes_epoch_dates() {
        let raw = r#"{"IdentifierType": "DRV_LIC",
                      "IdentifierNo": "WDL123456", "InstituteName": "WA DOL",
                      "ValidFromDate": "/Date(1500000000000)/", "ValidToDate": ""}"#;
        let record: IdentifierRecord = serde_json::from_str(raw).expect("must decode");
        let identifier = AccountIdentifier::from(record);

        assert_eq!(identifier.kind, "DRV_LIC");
        assert_eq!(identifier.number, "WDL123456");
        assert_eq!(identifier.institute.as_deref(), Some("WA DOL"));
        assert_eq!(
            identifier.valid_from.expect("present").epoch_millis(),
            1_500_000_000_000
        );
        assert_eq!(identifier.valid_to, None);
    }
}
