use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_ACCOUNT_ID_LEN: usize = 12;

/// Validated upstream business-partner / contract-account number.
///
/// Interpolated into OData key segments, so the character set is restricted
/// to ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAccountId);
        }

        let len = trimmed.chars().count();
        if len > MAX_ACCOUNT_ID_LEN {
            return Err(ValidationError::AccountIdTooLong {
                len,
                max: MAX_ACCOUNT_ID_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_digit() {
                return Err(ValidationError::AccountIdInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

/// Structured postal address on our side of the wire.
///
/// `line1`, `city`, `postal_code`, and `country` are required once an
/// address has been normalized; after normalization `line1` carries either
/// a PO Box token or a house-number token, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl StructuredAddress {
    /// Build a validated address; required fields must be non-empty.
    pub fn new(
        line1: impl Into<String>,
        line2: Option<String>,
        city: impl Into<String>,
        region: Option<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let address = Self {
            line1: line1.into(),
            line2,
            city: city.into(),
            region,
            postal_code: postal_code.into(),
            country: country.into(),
        };
        address.validate()?;
        Ok(address)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("line1", self.line1.as_str()),
            ("city", self.city.as_str()),
            ("postal_code", self.postal_code.as_str()),
            ("country", self.country.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyAddressField { field });
            }
        }
        Ok(())
    }
}

/// Flat address record mirroring the upstream schema.
///
/// Derived by the address normalizer; never stored independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamAddressFields {
    pub po_box: String,
    pub street: String,
    pub house_number: String,
    pub house_number2: String,
    pub city: String,
    pub postal_code: String,
    pub po_box_postal_code: String,
    pub region: String,
    pub country_id: String,
}

/// Phone contact classification.
///
/// The mapping to the upstream's type keys is an explicit static table;
/// unknown keys are rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneKind {
    Home,
    Work,
    Mobile,
    Fax,
}

impl PhoneKind {
    pub fn from_key(key: &str) -> Result<Self, ValidationError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "work" => Ok(Self::Work),
            "mobile" | "cell" => Ok(Self::Mobile),
            "fax" => Ok(Self::Fax),
            _ => Err(ValidationError::UnknownPhoneKind {
                value: key.to_owned(),
            }),
        }
    }

    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Work => "work",
            Self::Mobile => "mobile",
            Self::Fax => "fax",
        }
    }

    /// Upstream wire code for this phone type.
    pub const fn upstream_code(self) -> &'static str {
        match self {
            Self::Home => "1",
            Self::Work => "2",
            Self::Mobile => "3",
            Self::Fax => "4",
        }
    }

    pub fn from_upstream_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim() {
            "1" => Ok(Self::Home),
            "2" => Ok(Self::Work),
            "3" => Ok(Self::Mobile),
            "4" => Ok(Self::Fax),
            _ => Err(ValidationError::UnknownPhoneKind {
                value: code.to_owned(),
            }),
        }
    }
}

impl Display for PhoneKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_account_id() {
        let id = AccountId::parse(" 200001234 ").expect("must parse");
        assert_eq!(id.as_str(), "200001234");
    }

    #[test]
    fn rejects_empty_account_id() {
        let err = AccountId::parse("  ").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyAccountId));
    }

    #[test]
    fn rejects_non_digit_account_id() {
        let err = AccountId::parse("12AB34").expect_err("must fail");
        assert!(matches!(err, ValidationError::AccountIdInvalidChar { ch: 'A', index: 2 }));
    }

    #[test]
    fn rejects_overlong_account_id() {
        let err = AccountId::parse("1234567890123").expect_err("must fail");
        assert!(matches!(err, ValidationError::AccountIdTooLong { len: 13, max: 12 }));
    }

    #[test]
    fn address_requires_core_fields() {
        let err = StructuredAddress::new("10502 SE 166TH ST", None, "", None, "98055", "US")
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyAddressField { field: "city" }));
    }

    #[test]
    fn phone_kind_mapping_is_total_over_known_keys() {
        for (key, kind) in [
            ("home", PhoneKind::Home),
            ("work", PhoneKind::Work),
            ("mobile", PhoneKind::Mobile),
            ("cell", PhoneKind::Mobile),
            ("fax", PhoneKind::Fax),
        ] {
            assert_eq!(PhoneKind::from_key(key).expect("known key"), kind);
        }
    }

    #[test]
    fn phone_kind_rejects_unknown_key() {
        let err = PhoneKind::from_key("pager").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnknownPhoneKind { .. }));
    }

    #[test]
    fn phone_kind_upstream_codes_round_trip() {
        for kind in [PhoneKind::Home, PhoneKind::Work, PhoneKind::Mobile, PhoneKind::Fax] {
            assert_eq!(
                PhoneKind::from_upstream_code(kind.upstream_code()).expect("known code"),
                kind
            );
        }
    }
}
