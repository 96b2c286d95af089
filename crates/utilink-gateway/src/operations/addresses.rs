//! Mailing-address operations over the `Accounts` / `AccountAddresses`
//! resources.

use serde::{Deserialize, Serialize};

use utilink_core::address;
use utilink_core::{AccountId, StructuredAddress, UpstreamAddressFields};

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::key_segment;

const OP_GET: &str = "get_mailing_address";
const OP_CREATE: &str = "create_account_address";
const OP_UPDATE: &str = "update_account_address";

/// Wire record for the `AccountAddresses` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAddressRecord {
    #[serde(rename = "AccountID", default)]
    pub account_id: String,
    #[serde(rename = "AddressID", default)]
    pub address_id: String,
    #[serde(rename = "POBox", default)]
    pub po_box: String,
    #[serde(rename = "Street", default)]
    pub street: String,
    #[serde(rename = "HouseNo", default)]
    pub house_number: String,
    #[serde(rename = "HouseNo2", default)]
    pub house_number2: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "PostalCode", default)]
    pub postal_code: String,
    #[serde(rename = "POBoxPostalCode", default)]
    pub po_box_postal_code: String,
    #[serde(rename = "Region", default)]
    pub region: String,
    #[serde(rename = "CountryID", default)]
    pub country_id: String,
}

impl AccountAddressRecord {
    fn from_fields(account: &AccountId, address_id: &str, fields: UpstreamAddressFields) -> Self {
        Self {
            account_id: account.as_str().to_owned(),
            address_id: address_id.to_owned(),
            po_box: fields.po_box,
            street: fields.street,
            house_number: fields.house_number,
            house_number2: fields.house_number2,
            city: fields.city,
            postal_code: fields.postal_code,
            po_box_postal_code: fields.po_box_postal_code,
            region: fields.region,
            country_id: fields.country_id,
        }
    }

    fn into_fields(self) -> (String, String, UpstreamAddressFields) {
        let fields = UpstreamAddressFields {
            po_box: self.po_box,
            street: self.street,
            house_number: self.house_number,
            house_number2: self.house_number2,
            city: self.city,
            postal_code: self.postal_code,
            po_box_postal_code: self.po_box_postal_code,
            region: self.region,
            country_id: self.country_id,
        };
        (self.account_id, self.address_id, fields)
    }
}

/// Account entity with its standard address expanded.
#[derive(Debug, Deserialize)]
struct AccountRecord {
    #[serde(rename = "AccountID", default)]
    account_id: String,
    #[serde(rename = "StandardAccountAddress", default)]
    standard_address: Option<AccountAddressRecord>,
}

/// An account's mailing address together with its upstream identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingAddress {
    pub account_id: String,
    pub address_id: String,
    pub address: StructuredAddress,
}

impl From<AccountAddressRecord> for MailingAddress {
    fn from(record: AccountAddressRecord) -> Self {
        let (account_id, address_id, fields) = record.into_fields();
        Self {
            account_id,
            address_id,
            address: address::from_upstream(&fields),
        }
    }
}

impl ResourceGateway {
    /// Fetch the account's standard mailing address.
    pub async fn mailing_address(
        &self,
        token: &str,
        account: &AccountId,
    ) -> Result<MailingAddress, GatewayError> {
        let path = format!(
            "Accounts('{}')?$expand=StandardAccountAddress",
            key_segment(account.as_str())
        );
        let record: AccountRecord = self
            .invoke(
                CallerIdentity::Bearer(token),
                Operation::get(OP_GET, UpstreamBase::Standard, path),
            )
            .await?;

        let address = record.standard_address.ok_or_else(|| {
            GatewayError::contract_violation(OP_GET, "account has no standard address")
        })?;
        let mut mailing = MailingAddress::from(address);
        if mailing.account_id.is_empty() {
            mailing.account_id = record.account_id;
        }
        Ok(mailing)
    }

    /// Create a new address for the account; the street line is normalized
    /// into the upstream's flat fields.
    pub async fn create_account_address(
        &self,
        token: &str,
        account: &AccountId,
        address: &StructuredAddress,
    ) -> Result<MailingAddress, GatewayError> {
        let fields = address::to_upstream(address)
            .map_err(|error| GatewayError::invalid_request(OP_CREATE, error.to_string()))?;
        let record = AccountAddressRecord::from_fields(account, "", fields);
        let body = encode_body(OP_CREATE, &record)?;

        let created: AccountAddressRecord = self
            .invoke(
                CallerIdentity::Bearer(token),
                Operation::post(
                    OP_CREATE,
                    UpstreamBase::Standard,
                    String::from("AccountAddresses"),
                    body,
                ),
            )
            .await?;
        Ok(created.into())
    }

    /// Replace an existing address (PUT with the compound entity key).
    pub async fn update_account_address(
        &self,
        token: &str,
        account: &AccountId,
        address_id: &str,
        address: &StructuredAddress,
    ) -> Result<(), GatewayError> {
        if address_id.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                OP_UPDATE,
                "address id must not be empty",
            ));
        }

        let fields = address::to_upstream(address)
            .map_err(|error| GatewayError::invalid_request(OP_UPDATE, error.to_string()))?;
        let record = AccountAddressRecord::from_fields(account, address_id, fields);
        let body = encode_body(OP_UPDATE, &record)?;

        let path = format!(
            "AccountAddresses(AccountID='{}',AddressID='{}')",
            key_segment(account.as_str()),
            key_segment(address_id)
        );
        self.invoke_no_content(
            CallerIdentity::Bearer(token),
            Operation::put(OP_UPDATE, UpstreamBase::Standard, path, body),
        )
        .await
    }
}

fn encode_body(
    operation: &'static str,
    record: &AccountAddressRecord,
) -> Result<String, GatewayError> {
    serde_json::to_string(record).map_err(|error| {
        GatewayError::invalid_request(operation, format!("failed to encode request: {error}"))
    })
}
