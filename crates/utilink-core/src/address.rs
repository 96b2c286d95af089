//! Bidirectional conversion between [`StructuredAddress`] and the upstream
//! system's flat address fields.
//!
//! The heuristic side is a pure three-stage pipeline over the free-form
//! street line: extract a PO Box, else extract a house number, then take the
//! remainder as the street. A PO Box always wins over street/house-number
//! text when both appear on the same or companion line.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{StructuredAddress, UpstreamAddressFields};
use crate::error::AddressError;

/// Longest token accepted as a PO Box number or house number.
const MAX_TOKEN_LEN: usize = 10;

/// Minimum digits a PO Box number must carry.
const MIN_PO_BOX_DIGITS: usize = 1;

/// "P.O. Box N" family: up to two prefix letters, each with optional
/// periods/spaces, then the box literal and the trailing token.
static PO_BOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[a-z][.\s]*){0,2}box[.\s#]*([a-z0-9]*)").expect("po box pattern is valid")
});

/// House number with a trailing "1/2" fraction, e.g. "123 1/2 MAIN ST".
static HOUSE_NUMBER_HALF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z]+ 1/2)(?:\s+(.*))?$").expect("half fraction pattern is valid")
});

/// House number with a trailing "1/4" fraction.
static HOUSE_NUMBER_QUARTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z]+ 1/4)(?:\s+(.*))?$").expect("quarter fraction pattern is valid")
});

/// Plain house number: a leading run of digits/letters followed by a space.
static HOUSE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Za-z]+)\s+(.*)$").expect("house number pattern is valid")
});

/// Result of [`extract_po_box`]: the box number (empty when the lines carry
/// none) and both lines with the matched substring removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoBoxExtraction {
    pub number: String,
    pub line1: String,
    pub line2: String,
}

/// Result of [`extract_house_number`]: the number (empty when the line has
/// no discernible house number) and the rest of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseNumberExtraction {
    pub number: String,
    pub remainder: String,
}

/// Find a PO Box token in either address line.
///
/// Policy: no match in either line yields an empty number; a matched token
/// longer than [`MAX_TOKEN_LEN`] alphanumeric characters fails with "too
/// many characters"; a matched token without the minimum digits fails with
/// "too few characters". On success the matched substring is removed from
/// the line it was found in.
pub fn extract_po_box(line1: &str, line2: &str) -> Result<PoBoxExtraction, AddressError> {
    if let Some(found) = find_po_box(line1)? {
        return Ok(PoBoxExtraction {
            number: found.0,
            line1: found.1,
            line2: line2.trim().to_owned(),
        });
    }

    if let Some(found) = find_po_box(line2)? {
        return Ok(PoBoxExtraction {
            number: found.0,
            line1: line1.trim().to_owned(),
            line2: found.1,
        });
    }

    Ok(PoBoxExtraction {
        number: String::new(),
        line1: line1.trim().to_owned(),
        line2: line2.trim().to_owned(),
    })
}

fn find_po_box(line: &str) -> Result<Option<(String, String)>, AddressError> {
    let Some(captures) = PO_BOX_RE.captures(line) else {
        return Ok(None);
    };

    let token = captures
        .get(1)
        .map(|group| group.as_str())
        .unwrap_or_default()
        .trim()
        .to_owned();
    if token.len() > MAX_TOKEN_LEN {
        return Err(AddressError::InvalidPoBox {
            reason: "too many characters",
        });
    }
    if token.chars().filter(char::is_ascii_digit).count() < MIN_PO_BOX_DIGITS {
        return Err(AddressError::InvalidPoBox {
            reason: "too few characters",
        });
    }

    let matched = captures.get(0).expect("match group 0 always present");
    let mut remainder = String::with_capacity(line.len() - matched.len());
    remainder.push_str(&line[..matched.start()]);
    remainder.push_str(&line[matched.end()..]);

    Ok(Some((token, remainder.trim().to_owned())))
}

/// Find a leading house number in the street line.
///
/// The three patterns are tried most-specific-first: run + "1/2" fraction,
/// run + "1/4" fraction, plain run. A candidate must contain at least one
/// digit (a letters-only first word is a street, not a house number) and
/// the run may not exceed [`MAX_TOKEN_LEN`] characters.
pub fn extract_house_number(line1: &str) -> Result<HouseNumberExtraction, AddressError> {
    let line = line1.trim();

    for pattern in [&*HOUSE_NUMBER_HALF_RE, &*HOUSE_NUMBER_QUARTER_RE, &*HOUSE_NUMBER_RE] {
        let Some(captures) = pattern.captures(line) else {
            continue;
        };

        let number = captures.get(1).expect("pattern has a number group").as_str();
        let run = number.split_whitespace().next().unwrap_or_default();
        if !run.chars().any(|ch| ch.is_ascii_digit()) {
            continue;
        }
        if run.len() > MAX_TOKEN_LEN {
            return Err(AddressError::InvalidHouseNumber {
                reason: "too many characters",
            });
        }

        let remainder = captures
            .get(2)
            .map(|group| group.as_str())
            .unwrap_or_default()
            .trim()
            .to_owned();
        return Ok(HouseNumberExtraction {
            number: number.trim().to_owned(),
            remainder,
        });
    }

    Ok(HouseNumberExtraction {
        number: String::new(),
        remainder: line.to_owned(),
    })
}

/// The remainder of the street line after the house-number prefix; empty if
/// either input is empty.
pub fn extract_street(line1: &str, house_number: &str) -> String {
    let line = line1.trim();
    let number = house_number.trim();
    if line.is_empty() || number.is_empty() {
        return String::new();
    }

    match line.strip_prefix(number) {
        Some(rest) => rest.trim().to_owned(),
        None => line.to_owned(),
    }
}

/// Convert a structured address into the upstream's flat fields.
///
/// Already-structured fields are trimmed and copied; the street line runs
/// through the extraction pipeline to populate `po_box` / `house_number` /
/// `street`. When a PO Box is present the street portion of the line is
/// discarded.
pub fn to_upstream(address: &StructuredAddress) -> Result<UpstreamAddressFields, AddressError> {
    address.validate()?;

    let line2 = address.line2.as_deref().unwrap_or_default();
    let extraction = extract_po_box(&address.line1, line2)?;

    let mut fields = UpstreamAddressFields {
        city: address.city.trim().to_owned(),
        postal_code: address.postal_code.trim().to_owned(),
        region: address
            .region
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_owned(),
        country_id: address.country.trim().to_owned(),
        ..UpstreamAddressFields::default()
    };

    if !extraction.number.is_empty() {
        fields.po_box = extraction.number;
        fields.po_box_postal_code = fields.postal_code.clone();
        fields.house_number2 = extraction.line2;
        return Ok(fields);
    }

    let house = extract_house_number(&extraction.line1)?;
    if house.number.is_empty() {
        fields.street = house.remainder;
    } else {
        fields.street = extract_street(&extraction.line1, &house.number);
        fields.house_number = house.number;
    }
    fields.house_number2 = extraction.line2;

    Ok(fields)
}

/// Convert the upstream's flat fields back into a structured address.
///
/// A non-empty `po_box` takes precedence: it becomes `line1` and the street
/// fields are ignored. The postal code prefers `po_box_postal_code` when
/// present.
pub fn from_upstream(fields: &UpstreamAddressFields) -> StructuredAddress {
    let po_box = fields.po_box.trim();
    let line1 = if po_box.is_empty() {
        join_house_and_street(fields.house_number.trim(), fields.street.trim())
    } else {
        po_box.to_owned()
    };

    let postal_code = if fields.po_box_postal_code.trim().is_empty() {
        fields.postal_code.trim().to_owned()
    } else {
        fields.po_box_postal_code.trim().to_owned()
    };

    StructuredAddress {
        line1,
        line2: non_empty(fields.house_number2.trim()),
        city: fields.city.trim().to_owned(),
        region: non_empty(fields.region.trim()),
        postal_code,
        country: fields.country_id.trim().to_owned(),
    }
}

fn join_house_and_street(house_number: &str, street: &str) -> String {
    match (house_number.is_empty(), street.is_empty()) {
        (true, _) => street.to_owned(),
        (false, true) => house_number.to_owned(),
        (false, false) => format!("{house_number} {street}"),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_street_fixture() -> UpstreamAddressFields {
        UpstreamAddressFields {
            street: String::from("SE 166TH ST"),
            house_number: String::from("10502"),
            city: String::from("Renton"),
            postal_code: String::from("98055"),
            region: String::from("WA"),
            country_id: String::from("US"),
            ..UpstreamAddressFields::default()
        }
    }

    #[test]
    fn extracts_plain_po_box() {
        let extraction = extract_po_box("PO BOX 12345", "").expect("must extract");
        assert_eq!(extraction.number, "12345");
        assert_eq!(extraction.line1, "");
    }

    #[test]
    fn po_box_literal_forms_normalize_identically() {
        for line in ["PO BOX 12345", "P.O. Box 12345", "p o box 12345", "Box 12345"] {
            let extraction = extract_po_box(line, "").expect("must extract");
            assert_eq!(extraction.number, "12345", "from {line:?}");
        }
    }

    #[test]
    fn po_box_found_on_companion_line() {
        let extraction = extract_po_box("ACME SUPPLY", "P.O. BOX 77").expect("must extract");
        assert_eq!(extraction.number, "77");
        assert_eq!(extraction.line1, "ACME SUPPLY");
        assert_eq!(extraction.line2, "");
    }

    #[test]
    fn missing_po_box_yields_empty_number() {
        let extraction = extract_po_box("10502 SE 166TH ST", "").expect("must extract");
        assert_eq!(extraction.number, "");
        assert_eq!(extraction.line1, "10502 SE 166TH ST");
    }

    #[test]
    fn overlong_po_box_token_fails() {
        let line = format!("PO BOX {}", "X".repeat(15));
        let error = extract_po_box(&line, "").expect_err("must fail");
        assert_eq!(
            error,
            AddressError::InvalidPoBox {
                reason: "too many characters"
            }
        );
    }

    #[test]
    fn digitless_po_box_token_fails() {
        for line in ["PO BOX", "PO BOX ABC"] {
            let error = extract_po_box(line, "").expect_err("must fail");
            assert_eq!(
                error,
                AddressError::InvalidPoBox {
                    reason: "too few characters"
                },
                "from {line:?}"
            );
        }
    }

    #[test]
    fn extracts_leading_house_number() {
        let extraction = extract_house_number("10502 SE 166TH ST").expect("must extract");
        assert_eq!(extraction.number, "10502");
        assert_eq!(extraction.remainder, "SE 166TH ST");
    }

    #[test]
    fn extracts_half_fraction_house_number() {
        let extraction = extract_house_number("123 1/2 MAIN ST").expect("must extract");
        assert_eq!(extraction.number, "123 1/2");
        assert_eq!(extraction.remainder, "MAIN ST");
    }

    #[test]
    fn extracts_quarter_fraction_house_number() {
        let extraction = extract_house_number("9 1/4 ELM AVE").expect("must extract");
        assert_eq!(extraction.number, "9 1/4");
        assert_eq!(extraction.remainder, "ELM AVE");
    }

    #[test]
    fn alphanumeric_grid_house_number_is_accepted() {
        let extraction = extract_house_number("N64W23760 MAIN ST").expect("must extract");
        assert_eq!(extraction.number, "N64W23760");
    }

    #[test]
    fn letters_only_first_word_is_not_a_house_number() {
        let extraction = extract_house_number("RURAL ROUTE").expect("must extract");
        assert_eq!(extraction.number, "");
        assert_eq!(extraction.remainder, "RURAL ROUTE");
    }

    #[test]
    fn overlong_house_number_fails() {
        let error = extract_house_number("123456789012 MAIN ST").expect_err("must fail");
        assert_eq!(
            error,
            AddressError::InvalidHouseNumber {
                reason: "too many characters"
            }
        );
    }

    #[test]
    fn street_is_the_remainder_after_the_house_number() {
        assert_eq!(extract_street("10502 SE 166TH ST", "10502"), "SE 166TH ST");
        assert_eq!(extract_street("10502 SE 166TH ST", ""), "");
        assert_eq!(extract_street("", "10502"), "");
    }

    #[test]
    fn to_upstream_splits_street_line() {
        let address = StructuredAddress::new(
            "10502 SE 166TH ST",
            None,
            "Renton",
            Some(String::from("WA")),
            "98055",
            "US",
        )
        .expect("valid address");

        let fields = to_upstream(&address).expect("must normalize");
        assert_eq!(fields.house_number, "10502");
        assert_eq!(fields.street, "SE 166TH ST");
        assert_eq!(fields.po_box, "");
        assert_eq!(fields.postal_code, "98055");
        assert_eq!(fields.country_id, "US");
    }

    #[test]
    fn to_upstream_prefers_po_box_over_street_text() {
        // Both a street address and a PO Box marker on one line: the PO Box
        // wins and the street portion is discarded.
        let address = StructuredAddress::new(
            "123 MAIN ST PO BOX 99",
            None,
            "Renton",
            None,
            "98055",
            "US",
        )
        .expect("valid address");

        let fields = to_upstream(&address).expect("must normalize");
        assert_eq!(fields.po_box, "99");
        assert_eq!(fields.street, "");
        assert_eq!(fields.house_number, "");
        assert_eq!(fields.po_box_postal_code, "98055");
    }

    #[test]
    fn to_upstream_takes_po_box_from_companion_line() {
        let address = StructuredAddress::new(
            "ACME SUPPLY",
            Some(String::from("PO BOX 400")),
            "Renton",
            None,
            "98055",
            "US",
        )
        .expect("valid address");

        let fields = to_upstream(&address).expect("must normalize");
        assert_eq!(fields.po_box, "400");
        assert_eq!(fields.street, "");
    }

    #[test]
    fn to_upstream_keeps_whole_line_as_street_without_house_number() {
        let address = StructuredAddress::new("RURAL ROUTE", None, "Renton", None, "98055", "US")
            .expect("valid address");

        let fields = to_upstream(&address).expect("must normalize");
        assert_eq!(fields.house_number, "");
        assert_eq!(fields.street, "RURAL ROUTE");
    }

    #[test]
    fn from_upstream_joins_house_number_and_street() {
        let address = from_upstream(&upstream_street_fixture());
        assert_eq!(address.line1, "10502 SE 166TH ST");
        assert_eq!(address.city, "Renton");
        assert_eq!(address.region.as_deref(), Some("WA"));
        assert_eq!(address.postal_code, "98055");
        assert_eq!(address.country, "US");
    }

    #[test]
    fn from_upstream_po_box_wins_over_street_fields() {
        let fields = UpstreamAddressFields {
            po_box: String::from("12345"),
            po_box_postal_code: String::from("98056"),
            ..upstream_street_fixture()
        };

        let address = from_upstream(&fields);
        assert_eq!(address.line1, "12345");
        assert_eq!(address.postal_code, "98056");
    }

    #[test]
    fn normalization_round_trips_a_street_address() {
        let fields = to_upstream(&from_upstream(&upstream_street_fixture()))
            .expect("must normalize");
        assert_eq!(fields.house_number, "10502");
        assert_eq!(fields.street, "SE 166TH ST");
    }
}
