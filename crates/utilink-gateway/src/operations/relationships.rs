//! Account relationship lookups over the `AccountRelationships` resource.

use serde::Deserialize;

use utilink_core::AccountId;

use crate::broker::CallerIdentity;
use crate::config::UpstreamBase;
use crate::error::GatewayError;
use crate::gateway::{Operation, ResourceGateway};

use super::{flag_set, key_segment};

const OP_LIST: &str = "get_account_relationships";

#[derive(Debug, Clone, Deserialize)]
struct RelationshipRecord {
    #[serde(rename = "RelatedAccountID", default)]
    related_account_id: String,
    #[serde(rename = "RelationshipType", default)]
    relationship_type: String,
    #[serde(rename = "DefaultFlag", default)]
    default_flag: String,
}

/// A relationship between two business partners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRelationship {
    pub related_account: String,
    pub kind: String,
    pub default: bool,
}

impl From<RelationshipRecord> for AccountRelationship {
    fn from(record: RelationshipRecord) -> Self {
        Self {
            related_account: record.related_account_id,
            kind: record.relationship_type,
            default: flag_set(&record.default_flag),
        }
    }
}

impl ResourceGateway {
    /// List the account's relationships in upstream order.
    pub async fn account_relationships(
        &self,
        token: &str,
        account: &AccountId,
    ) -> Result<Vec<AccountRelationship>, GatewayError> {
        let path = format!(
            "Accounts('{}')/AccountRelationships",
            key_segment(account.as_str())
        );
        let records: Vec<RelationshipRecord> = self
            .invoke_many(
                CallerIdentity::Bearer(token),
                Operation::get(OP_LIST, UpstreamBase::Standard, path),
            )
            .await?;

        Ok(records.into_iter().map(AccountRelationship::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_record_decodes() {
        let raw = r#"{"RelatedAccountID": "200009999",
                      "RelationshipType": "SPOUSE", "DefaultFlag": "X"}"#;
        let record: RelationshipRecord = serde_json::from_str(raw).expect("must decode");
        let relationship = AccountRelationship::from(record);

        assert_eq!(relationship.related_account, "200009999");
        assert_eq!(relationship.kind, "SPOUSE");
        assert!(relationship.default);
    }
}
