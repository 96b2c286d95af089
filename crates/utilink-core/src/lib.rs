//! # Utilink Core
//!
//! Wire-format contracts and domain types for the utilink upstream
//! integration gateway.
//!
//! The upstream enterprise system speaks an OData-flavored HTTP/JSON
//! dialect with several quirks this crate exists to absorb:
//!
//! - numbers serialized as quoted strings (`"0042"`, `"10.50"`)
//! - dates serialized as `/Date(<epoch-millis>)/` literals
//! - payloads wrapped in nested `{"d": ...}` / `{"error": ...}` envelopes
//! - postal addresses flattened into PO Box / street / house-number fields
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`address`] | Structured ↔ flat address normalization pipeline |
//! | [`codec`] | Quoted-number and epoch-date converters + serde adapters |
//! | [`domain`] | Domain types (`AccountId`, `StructuredAddress`, `PhoneKind`) |
//! | [`envelope`] | Generic result/results/error envelope decode |
//! | [`error`] | Validation, codec, and address error taxonomy |
//! | [`timestamp`] | UTC-only timestamp newtype |
//!
//! Everything here is pure: no I/O, no shared state. The gateway crate
//! composes these pieces around the network.

pub mod address;
pub mod codec;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod timestamp;

pub use address::{
    extract_house_number, extract_po_box, extract_street, from_upstream, to_upstream,
    HouseNumberExtraction, PoBoxExtraction,
};
pub use codec::{
    decode_epoch_date, decode_quoted_number, encode_epoch_date, encode_quoted_number, QuotedNumber,
};
pub use domain::{AccountId, PhoneKind, StructuredAddress, UpstreamAddressFields};
pub use envelope::{
    decode_envelope, decode_results_envelope, Envelope, EnvelopeFault, ErrorDetail, ErrorMessage,
    ErrorResult, InnerError, ResultsEnvelope,
};
pub use error::{AddressError, CodecError, CoreError, ValidationError};
pub use timestamp::UtcDateTime;
