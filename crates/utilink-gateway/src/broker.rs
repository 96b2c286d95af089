//! Session credential broker: cache-aside mapping from a caller identity to
//! upstream session cookies.
//!
//! Per identity the flow is: cache lookup → on hit, deserialize and return
//! with no upstream call → on miss, exchange against the authentication
//! endpoint, store the raw response body under the derived key, return. An
//! exchange failure is fatal for the current request and never retried
//! here. There is no invalidation path; stale entries age out of the cache
//! under its own expiry policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use utilink_core::AccountId;

use crate::cache::{account_cache_key, token_cache_key, CredentialCache};
use crate::credentials::SessionCredentials;
use crate::error::GatewayError;
use crate::http::{HttpClient, HttpRequest};

const OP_TOKEN_EXCHANGE: &str = "exchange_token_credentials";
const OP_ACCOUNT_EXCHANGE: &str = "exchange_account_credentials";

/// Who the upstream call is made on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerIdentity<'a> {
    /// An authenticated caller presenting a bearer token.
    Bearer(&'a str),
    /// A caller identified only by business-partner number (no token), e.g.
    /// during enrollment.
    AccountNumber(&'a AccountId),
}

/// Cache-aside broker for upstream session credentials.
pub struct CredentialBroker {
    cache: Arc<dyn CredentialCache>,
    http_client: Arc<dyn HttpClient>,
    auth_base: String,
    timeout_ms: u64,
    exchanging: AtomicBool,
}

impl CredentialBroker {
    pub fn new(
        cache: Arc<dyn CredentialCache>,
        http_client: Arc<dyn HttpClient>,
        auth_base: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        let auth_base = auth_base.into().trim_end_matches('/').to_owned();
        Self {
            cache,
            http_client,
            auth_base,
            timeout_ms,
            exchanging: AtomicBool::new(false),
        }
    }

    pub async fn credentials(
        &self,
        identity: CallerIdentity<'_>,
    ) -> Result<SessionCredentials, GatewayError> {
        match identity {
            CallerIdentity::Bearer(token) => self.credentials_for_token(token).await,
            CallerIdentity::AccountNumber(account) => self.credentials_for_account(account).await,
        }
    }

    /// Credentials for a bearer token; the token rides in the
    /// `Authorization` header of the exchange call.
    pub async fn credentials_for_token(
        &self,
        token: &str,
    ) -> Result<SessionCredentials, GatewayError> {
        if token.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                OP_TOKEN_EXCHANGE,
                "bearer token must not be empty",
            ));
        }

        let key = token_cache_key(token);
        let request = HttpRequest::get(format!("{}/v1.0/authentication/mcf-token", self.auth_base))
            .with_header("authorization", token)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        self.acquire(OP_TOKEN_EXCHANGE, &key, request).await
    }

    /// Credentials for a business-partner number; the exchange call carries
    /// no auth header.
    pub async fn credentials_for_account(
        &self,
        account: &AccountId,
    ) -> Result<SessionCredentials, GatewayError> {
        let key = account_cache_key(account);
        let request = HttpRequest::get(format!(
            "{}/v1.0/authentication/mcf-token/{}",
            self.auth_base,
            urlencoding::encode(account.as_str())
        ))
        .with_header("accept", "application/json")
        .with_timeout_ms(self.timeout_ms);

        self.acquire(OP_ACCOUNT_EXCHANGE, &key, request).await
    }

    async fn acquire(
        &self,
        operation: &'static str,
        key: &str,
        request: HttpRequest,
    ) -> Result<SessionCredentials, GatewayError> {
        if let Some(raw) = self.cache.get(key).await {
            debug!(operation, "credential cache hit");
            return parse_credentials(operation, &raw);
        }
        debug!(operation, "credential cache miss");

        // Best-effort in-process single-flight: a loser waits briefly and
        // re-reads the cache before performing its own exchange. Concurrent
        // losers that still miss each exchange independently; last write
        // wins in the cache.
        let won = self
            .exchanging
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok();
        if !won {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if let Some(raw) = self.cache.get(key).await {
                debug!(operation, "credential cache hit after waiting on exchange");
                return parse_credentials(operation, &raw);
            }
        }

        let result = self.exchange(operation, key, request).await;
        if won {
            self.exchanging.store(false, Ordering::SeqCst);
        }
        result
    }

    async fn exchange(
        &self,
        operation: &'static str,
        key: &str,
        request: HttpRequest,
    ) -> Result<SessionCredentials, GatewayError> {
        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(operation, error = %error, "credential exchange transport failure");
            GatewayError::credential_exchange(
                operation,
                format!("auth call failed: {}", error.message()),
            )
        })?;

        if !response.is_success() {
            warn!(operation, status = response.status, "credential exchange rejected");
            return Err(GatewayError::credential_exchange(
                operation,
                format!("auth endpoint returned status {}", response.status),
            ));
        }

        let credentials = parse_credentials(operation, &response.body)?;
        self.cache.set(key.to_owned(), response.body).await;
        Ok(credentials)
    }
}

fn parse_credentials(
    operation: &'static str,
    raw: &str,
) -> Result<SessionCredentials, GatewayError> {
    SessionCredentials::parse(raw).map_err(|error| {
        GatewayError::credential_exchange(operation, format!("unparsable auth body: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::cache::MemoryCredentialCache;
    use crate::error::GatewayErrorKind;
    use crate::http::{HttpError, HttpResponse};

    const AUTH_BODY: &str = r#"{"SAP_SESSIONID_X1": "abc123"}"#;

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn returning(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn broker(client: Arc<RecordingHttpClient>) -> CredentialBroker {
        CredentialBroker::new(
            Arc::new(MemoryCredentialCache::with_default_ttl()),
            client,
            "https://auth.test",
            5_000,
        )
    }

    #[tokio::test]
    async fn miss_exchanges_then_hit_skips_upstream() {
        let client = RecordingHttpClient::returning(Ok(HttpResponse::ok_json(AUTH_BODY)));
        let broker = broker(Arc::clone(&client));

        let first = broker
            .credentials_for_token("jwt-1")
            .await
            .expect("exchange succeeds");
        assert_eq!(first.get("SAP_SESSIONID_X1"), Some("abc123"));
        assert_eq!(client.recorded().len(), 1);

        let second = broker
            .credentials_for_token("jwt-1")
            .await
            .expect("cache hit");
        assert_eq!(second, first);
        assert_eq!(client.recorded().len(), 1, "no second upstream exchange");
    }

    #[tokio::test]
    async fn token_exchange_sends_authorization_header() {
        let client = RecordingHttpClient::returning(Ok(HttpResponse::ok_json(AUTH_BODY)));
        let broker = broker(Arc::clone(&client));

        broker
            .credentials_for_token("jwt-2")
            .await
            .expect("exchange succeeds");

        let request = &client.recorded()[0];
        assert_eq!(
            request.url,
            "https://auth.test/v1.0/authentication/mcf-token"
        );
        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("jwt-2")
        );
    }

    #[tokio::test]
    async fn account_exchange_has_no_auth_header_and_nojwt_key() {
        let client = RecordingHttpClient::returning(Ok(HttpResponse::ok_json(AUTH_BODY)));
        let cache = Arc::new(MemoryCredentialCache::with_default_ttl());
        let broker = CredentialBroker::new(
            Arc::clone(&cache) as Arc<dyn CredentialCache>,
            Arc::clone(&client) as Arc<dyn HttpClient>,
            "https://auth.test",
            5_000,
        );
        let account = AccountId::parse("200001234").expect("valid account");

        broker
            .credentials_for_account(&account)
            .await
            .expect("exchange succeeds");

        let request = &client.recorded()[0];
        assert_eq!(
            request.url,
            "https://auth.test/v1.0/authentication/mcf-token/200001234"
        );
        assert!(request.headers.get("authorization").is_none());
        assert!(cache
            .get("authentication:mcf:nojwt:200001234")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn failed_exchange_propagates_and_caches_nothing() {
        let client = RecordingHttpClient::returning(Err(HttpError::new("connection refused")));
        let broker = broker(Arc::clone(&client));

        let error = broker
            .credentials_for_token("jwt-3")
            .await
            .expect_err("exchange fails");
        assert_eq!(error.kind(), GatewayErrorKind::CredentialExchange);

        // Still a miss: the next call exchanges again.
        let _ = broker.credentials_for_token("jwt-3").await;
        assert_eq!(client.recorded().len(), 2);
    }

    #[tokio::test]
    async fn unparsable_auth_body_is_an_exchange_failure() {
        let client = RecordingHttpClient::returning(Ok(HttpResponse::ok_json("<html>nope</html>")));
        let broker = broker(client);

        let error = broker
            .credentials_for_token("jwt-4")
            .await
            .expect_err("parse fails");
        assert_eq!(error.kind(), GatewayErrorKind::CredentialExchange);
        assert!(error.message().contains("unparsable"));
    }

    #[tokio::test]
    async fn empty_token_is_rejected_before_any_call() {
        let client = RecordingHttpClient::returning(Ok(HttpResponse::ok_json(AUTH_BODY)));
        let broker = broker(Arc::clone(&client));

        let error = broker
            .credentials_for_token("  ")
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::InvalidRequest);
        assert!(client.recorded().is_empty());
    }
}
