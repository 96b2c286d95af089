//! Business-partner creation over the secure `BusinessPartners` resource.
//!
//! Enrollment runs before the caller holds a bearer token, so this
//! operation accepts any [`CallerIdentity`] — including the
//! business-partner-number form that exchanges credentials without a JWT.

use serde::{Deserialize, Serialize};

use utilink_core::address;
use utilink_core::StructuredAddress;

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

const OP_CREATE: &str = "create_business_partner";

#[derive(Debug, Clone, Serialize)]
struct BusinessPartnerCreateRecord {
    #[serde(rename = "FirstName")]
    first_name: String,
    #[serde(rename = "LastName")]
    last_name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "PhoneNo")]
    phone_no: String,
    #[serde(rename = "POBox")]
    po_box: String,
    #[serde(rename = "Street")]
    street: String,
    #[serde(rename = "HouseNo")]
    house_number: String,
    #[serde(rename = "HouseNo2")]
    house_number2: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "PostalCode")]
    postal_code: String,
    #[serde(rename = "POBoxPostalCode")]
    po_box_postal_code: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "CountryID")]
    country_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BusinessPartnerRecord {
    #[serde(rename = "PartnerID", default)]
    partner_id: String,
    #[serde(rename = "AccountID", default)]
    account_id: String,
}

/// Draft of a business partner to enroll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusinessPartner {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: StructuredAddress,
}

/// Identifiers assigned by the upstream on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPartnerIds {
    pub partner_id: String,
    pub account_id: String,
}

impl ResourceGateway {
    /// Enroll a new business partner with their mailing address.
    pub async fn create_business_partner(
        &self,
        identity: CallerIdentity<'_>,
        partner: &NewBusinessPartner,
    ) -> Result<BusinessPartnerIds, GatewayError> {
        for (field, value) in [
            ("first name", partner.first_name.as_str()),
            ("last name", partner.last_name.as_str()),
            ("email", partner.email.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(GatewayError::invalid_request(
                    OP_CREATE,
                    format!("{field} must not be empty"),
                ));
            }
        }

        let fields = address::to_upstream(&partner.address)
            .map_err(|error| GatewayError::invalid_request(OP_CREATE, error.to_string()))?;
        let record = BusinessPartnerCreateRecord {
            first_name: partner.first_name.trim().to_owned(),
            last_name: partner.last_name.trim().to_owned(),
            email: partner.email.trim().to_owned(),
            phone_no: partner.phone.clone().unwrap_or_default(),
            po_box: fields.po_box,
            street: fields.street,
            house_number: fields.house_number,
            house_number2: fields.house_number2,
            city: fields.city,
            postal_code: fields.postal_code,
            po_box_postal_code: fields.po_box_postal_code,
            region: fields.region,
            country_id: fields.country_id,
        };
        let body = serde_json::to_string(&record).map_err(|error| {
            GatewayError::invalid_request(OP_CREATE, format!("failed to encode request: {error}"))
        })?;

        let created: BusinessPartnerRecord = self
            .invoke(
                identity,
                Operation::post(
                    OP_CREATE,
                    UpstreamBase::Secure,
                    String::from("BusinessPartners"),
                    body,
                ),
            )
            .await?;

        if created.partner_id.is_empty() {
            return Err(GatewayError::contract_violation(
                OP_CREATE,
                "upstream returned no partner id",
            ));
        }
        Ok(BusinessPartnerIds {
            partner_id: created.partner_id,
            account_id: created.account_id,
        })
    }
}
