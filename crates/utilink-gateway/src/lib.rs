//! # Utilink Gateway
//!
//! Session credential broker and resource gateway for the upstream
//! enterprise system.
//!
//! A caller invokes a gateway operation with a bearer token (or, during
//! enrollment, a bare business-partner number) and a typed request. The
//! gateway asks the [`broker`] for session credentials — a cache hit or an
//! upstream exchange — builds the wire request with the codec shims from
//! `utilink-core`, executes it against the standard or secure base, decodes
//! the response envelope, and surfaces or translates errors. The gateway
//! never retries; transport failures are marked retryable and left to the
//! caller.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`broker`] | Cache-aside session credential broker |
//! | [`cache`] | Injected credential-cache capability + in-memory impl |
//! | [`config`] | Explicit gateway configuration, base selection |
//! | [`credentials`] | Opaque session cookie bag |
//! | [`error`] | Gateway error taxonomy |
//! | [`gateway`] | The invoke façade |
//! | [`http`] | Transport abstraction (reqwest + offline no-op) |
//! | [`operations`] | Per-resource operation families |

pub mod broker;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod http;
pub mod operations;

pub use broker::{CallerIdentity, CredentialBroker};
pub use cache::{account_cache_key, token_cache_key, CredentialCache, MemoryCredentialCache};
pub use config::{GatewayConfig, UpstreamBase};
pub use credentials::SessionCredentials;
pub use error::{GatewayError, GatewayErrorKind};
pub use gateway::ResourceGateway;
pub use http::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use operations::addresses::{AccountAddressRecord, MailingAddress};
pub use operations::business_partners::{BusinessPartnerIds, NewBusinessPartner};
pub use operations::contract_items::{ContractItem, MoveInOrder, MoveOutOrder};
pub use operations::emails::EmailContact;
pub use operations::identifiers::AccountIdentifier;
pub use operations::payment_arrangements::{NewPaymentArrangement, PaymentArrangement};
pub use operations::phones::PhoneContact;
pub use operations::relationships::AccountRelationship;
