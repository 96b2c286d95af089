//! Payment arrangement operations over the secure `PaymentArrangements`
//! resource.
//!
//! Installment amounts arrive as quoted decimals and due dates as epoch
//! literals; the codec adapters keep those shapes on the wire.

use serde::{Deserialize, Serialize};

use utilink_core::codec::{epoch_date, quoted_decimal, quoted_i64};
use utilink_core::{AccountId, QuotedNumber, UtcDateTime};

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::key_segment;

const OP_GET: &str = "get_payment_arrangement";
const OP_CREATE: &str = "create_payment_arrangement";

#[derive(Debug, Clone, Deserialize)]
struct PaymentArrangementRecord {
    #[serde(rename = "PaymentArrangementID", default)]
    id: String,
    #[serde(rename = "InstallmentsCount", with = "quoted_i64")]
    installments: i64,
    #[serde(rename = "InstallmentAmount", with = "quoted_decimal")]
    installment_amount: QuotedNumber,
    #[serde(rename = "FirstDueDate", with = "epoch_date")]
    first_due: UtcDateTime,
}

#[derive(Debug, Clone, Serialize)]
struct PaymentArrangementCreateRecord {
    #[serde(rename = "AccountID")]
    account_id: String,
    #[serde(rename = "InstallmentsCount", with = "quoted_i64")]
    installments: i64,
    #[serde(rename = "FirstDueDate", with = "epoch_date")]
    first_due: UtcDateTime,
}

/// An active payment arrangement on a contract account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentArrangement {
    pub id: String,
    pub installments: i64,
    pub installment_amount: QuotedNumber,
    pub first_due: UtcDateTime,
}

impl From<PaymentArrangementRecord> for PaymentArrangement {
    fn from(record: PaymentArrangementRecord) -> Self {
        Self {
            id: record.id,
            installments: record.installments,
            installment_amount: record.installment_amount,
            first_due: record.first_due,
        }
    }
}

/// Request to spread an open balance over installments; the upstream
/// computes the installment amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentArrangement {
    pub installments: i64,
    pub first_due: UtcDateTime,
}

impl ResourceGateway {
    /// Fetch the account's current payment arrangement.
    pub async fn payment_arrangement(
        &self,
        token: &str,
        account: &AccountId,
    ) -> Result<PaymentArrangement, GatewayError> {
        let path = format!(
            "PaymentArrangements(AccountID='{}')",
            key_segment(account.as_str())
        );
        let record: PaymentArrangementRecord = self
            .invoke(
                CallerIdentity::Bearer(token),
                Operation::get(OP_GET, UpstreamBase::Secure, path),
            )
            .await?;
        Ok(record.into())
    }

    /// Create a payment arrangement for the account's open balance.
    pub async fn create_payment_arrangement(
        &self,
        token: &str,
        account: &AccountId,
        arrangement: &NewPaymentArrangement,
    ) -> Result<PaymentArrangement, GatewayError> {
        if arrangement.installments <= 0 {
            return Err(GatewayError::invalid_request(
                OP_CREATE,
                "installments count must be greater than zero",
            ));
        }

        let record = PaymentArrangementCreateRecord {
            account_id: account.as_str().to_owned(),
            installments: arrangement.installments,
            first_due: arrangement.first_due,
        };
        let body = serde_json::to_string(&record).map_err(|error| {
            GatewayError::invalid_request(OP_CREATE, format!("failed to encode request: {error}"))
        })?;

        let created: PaymentArrangementRecord = self
            .invoke(
                CallerIdentity::Bearer(token),
                Operation::post(
                    OP_CREATE,
                    UpstreamBase::Secure,
                    String::from("PaymentArrangements"),
                    body,
                ),
            )
            .await?;
        Ok(created.into())
    }
}
