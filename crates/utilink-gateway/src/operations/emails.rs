//! Email contact operations over the `AccountAddressDependentEmails`
//! resource.

use serde::{Deserialize, Serialize};

use utilink_core::AccountId;

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::{flag, flag_set, key_segment};

const OP_LIST: &str = "get_email_contacts";
const OP_UPDATE: &str = "update_email_contact";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct EmailRecord {
    #[serde(rename = "AccountID", default)]
    account_id: String,
    #[serde(rename = "AddressID", default)]
    address_id: String,
    #[serde(rename = "SequenceNo", default)]
    sequence_no: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "StandardFlag", default)]
    standard_flag: String,
}

/// An email contact attached to an account address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContact {
    pub address_id: String,
    pub sequence_no: String,
    pub email: String,
    pub standard: bool,
}

impl From<EmailRecord> for EmailContact {
    fn from(record: EmailRecord) -> Self {
        Self {
            address_id: record.address_id,
            sequence_no: record.sequence_no,
            email: record.email,
            standard: flag_set(&record.standard_flag),
        }
    }
}

impl ResourceGateway {
    /// List the account's email contacts in upstream order.
    pub async fn email_contacts(
        &self,
        token: &str,
        account: &AccountId,
    ) -> Result<Vec<EmailContact>, GatewayError> {
        let path = format!(
            "Accounts('{}')/AccountAddressDependentEmails",
            key_segment(account.as_str())
        );
        let records: Vec<EmailRecord> = self
            .invoke_many(
                CallerIdentity::Bearer(token),
                Operation::get(OP_LIST, UpstreamBase::Standard, path),
            )
            .await?;

        Ok(records.into_iter().map(EmailContact::from).collect())
    }

    /// Replace one email contact (PUT with the compound entity key).
    pub async fn update_email_contact(
        &self,
        token: &str,
        account: &AccountId,
        contact: &EmailContact,
    ) -> Result<(), GatewayError> {
        let email = contact.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(GatewayError::invalid_request(
                OP_UPDATE,
                format!("'{email}' is not a valid email address"),
            ));
        }
        if contact.address_id.trim().is_empty() || contact.sequence_no.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                OP_UPDATE,
                "address id and sequence number are required",
            ));
        }

        let record = EmailRecord {
            account_id: account.as_str().to_owned(),
            address_id: contact.address_id.clone(),
            sequence_no: contact.sequence_no.clone(),
            email: email.to_owned(),
            standard_flag: flag(contact.standard),
        };
        let body = serde_json::to_string(&record).map_err(|error| {
            GatewayError::invalid_request(OP_UPDATE, format!("failed to encode request: {error}"))
        })?;

        let path = format!(
            "AccountAddressDependentEmails(AccountID='{}',AddressID='{}',SequenceNo='{}')",
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
    fn email_record_decodes_standard_flag() {
        let raw = r#"{"AccountID": "1", "AddressID": "9001", "SequenceNo": "001",
                      "Email": "pat@example.com", "StandardFlag": "X"}"#;
        let record: EmailRecord = serde_json::from_str(raw).expect("must decode");
        let contact = EmailContact::from(record);

        assert_eq!(contact.email, "pat@example.com");
        assert!(contact.standard);
    }

    #[test]
    fn non_standard_contact_has_empty_flag() {
        let record: EmailRecord =
            serde_json::from_str(r#"{"Email": "a@b.c", "StandardFlag": ""}"#).expect("decode");
        assert!(!EmailContact::from(record).standard);
    }
}
