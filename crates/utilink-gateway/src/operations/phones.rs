//! Phone contact operations over the `AccountAddressDependentPhones`
//! resource.

use serde::{Deserialize, Serialize};

use utilink_core::{AccountId, PhoneKind};

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::{flag, flag_set, key_segment};

const OP_LIST: &str = "get_phone_contacts";
const OP_UPDATE: &str = "update_phone_contact";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PhoneRecord {
    #[serde(rename = "AccountID", default)]
    account_id: String,
    #[serde(rename = "AddressID", default)]
    address_id: String,
    #[serde(rename = "SequenceNo", default)]
    sequence_no: String,
    #[serde(rename = "PhoneNo", default)]
    phone_no: String,
    #[serde(rename = "Extension", default)]
    extension: String,
    #[serde(rename = "PhoneType", default)]
    phone_type: String,
    #[serde(rename = "StandardFlag", default)]
    standard_flag: String,
}

/// A phone contact attached to an account address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneContact {
    pub address_id: String,
    pub sequence_no: String,
    pub number: String,
    pub extension: Option<String>,
    pub kind: PhoneKind,
    pub standard: bool,
}

impl PhoneContact {
    fn from_record(record: PhoneRecord) -> Result<Self, GatewayError> {
        let kind = PhoneKind::from_upstream_code(&record.phone_type)
            .map_err(|error| GatewayError::decode(OP_LIST, error.to_string()))?;
        let extension = record.extension.trim();
        Ok(Self {
            address_id: record.address_id,
            sequence_no: record.sequence_no,
            number: record.phone_no,
            extension: if extension.is_empty() {
                None
            } else {
                Some(extension.to_owned())
            },
            kind,
            standard: flag_set(&record.standard_flag),
        })
    }
}

impl ResourceGateway {
    /// List the account's phone contacts in upstream order.
    pub async fn phone_contacts(
        &self,
        token: &str,
        account: &AccountId,
    ) -> Result<Vec<PhoneContact>, GatewayError> {
        let path = format!(
            "Accounts('{}')/AccountAddressDependentPhones",
            key_segment(account.as_str())
        );
        let records: Vec<PhoneRecord> = self
            .invoke_many(
                CallerIdentity::Bearer(token),
                Operation::get(OP_LIST, UpstreamBase::Standard, path),
            )
            .await?;

        records.into_iter().map(PhoneContact::from_record).collect()
    }

    /// Replace one phone contact (PUT with the compound entity key).
    pub async fn update_phone_contact(
        &self,
        token: &str,
        account: &AccountId,
        contact: &PhoneContact,
    ) -> Result<(), GatewayError> {
        let number = contact.number.trim();
        if number.is_empty() {
            return Err(GatewayError::invalid_request(
                OP_UPDATE,
                "phone number must not be empty",
            ));
        }
        if contact.address_id.trim().is_empty() || contact.sequence_no.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                OP_UPDATE,
                "address id and sequence number are required",
            ));
        }

        let record = PhoneRecord {
            account_id: account.as_str().to_owned(),
            address_id: contact.address_id.clone(),
            sequence_no: contact.sequence_no.clone(),
            phone_no: number.to_owned(),
            extension: contact.extension.clone().unwrap_or_default(),
            phone_type: contact.kind.upstream_code().to_owned(),
            standard_flag: flag(contact.standard),
        };
        let body = serde_json::to_string(&record).map_err(|error| {
            GatewayError::invalid_request(OP_UPDATE, format!("failed to encode request: {error}"))
        })?;

        let path = format!(
            "AccountAddressDependentPhones(AccountID='{}',AddressID='{}',SequenceNo='{}')",
            key_segment(account.as_str()),
            key_segment(&contact.address_id),
            key_segment(&contact.sequence_no)
        );
        self.invoke_no_content(
            CallerIdentity::Bearer(token),
            Operation::put(OP_UPDATE, UpstreamBase::Standard, path, body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_record_decodes_via_the_static_type_table() {
        let raw = r#"{"AccountID": "1", "AddressID": "9001", "SequenceNo": "001",
                      "PhoneNo": "4255550147", "Extension": "", "PhoneType": "3",
                      "StandardFlag": "X"}"#;
        let record: PhoneRecord = serde_json::from_str(raw).expect("must decode");
        let contact = PhoneContact::from_record(record).expect("known phone type");

        assert_eq!(contact.kind, PhoneKind::Mobile);
        assert_eq!(contact.number, "4255550147");
        assert_eq!(contact.extension, None);
        assert!(contact.standard);
    }

    #[test]
    fn unknown_phone_type_is_a_decode_error() {
        let record: PhoneRecord =
            serde_json::from_str(r#"{"PhoneNo": "1", "PhoneType": "9"}"#).expect("decode");
        let error = PhoneContact::from_record(record).expect_err("unknown type");
        assert_eq!(error.code(), "gateway.decode");
    }
}
