//! The resource gateway façade.
//!
//! Every operation runs the same sequence: obtain session credentials from
//! the broker, build the wire request, attach the credentials as cookies
//! plus the fixed headers the upstream requires, execute against the
//! standard or secure base, decode the response envelope, and surface or
//! translate errors. The gateway never retries; callers own retry policy.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use utilink_core::envelope::{decode_envelope, decode_results_envelope};

use crate::broker::{CallerIdentity, CredentialBroker};
use crate::cache::CredentialCache;
use crate::config::{GatewayConfig, UpstreamBase};
use crate::error::GatewayError;
use crate::http::{HttpClient, HttpMethod, HttpRequest};

/// A named upstream operation: method, base selection, resource path, and
/// an optional JSON body.
pub(crate) struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    pub base: UpstreamBase,
    pub path: String,
    pub body: Option<String>,
}

impl Operation {
    pub(crate) fn get(name: &'static str, base: UpstreamBase, path: String) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            base,
            path,
            body: None,
        }
    }

    pub(crate) fn post(name: &'static str, base: UpstreamBase, path: String, body: String) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            base,
            path,
            body: Some(body),
        }
    }

    pub(crate) fn put(name: &'static str, base: UpstreamBase, path: String, body: String) -> Self {
        Self {
            name,
            method: HttpMethod::Put,
            base,
            path,
            body: Some(body),
        }
    }
}

/// Façade over the upstream resource endpoints.
///
/// The per-resource operation methods live in [`crate::operations`]; this
/// type owns the shared invoke sequence.
pub struct ResourceGateway {
    config: GatewayConfig,
    http_client: Arc<dyn HttpClient>,
    broker: CredentialBroker,
}

impl ResourceGateway {
    pub fn new(
        config: GatewayConfig,
        http_client: Arc<dyn HttpClient>,
        cache: Arc<dyn CredentialCache>,
    ) -> Self {
        let broker = CredentialBroker::new(
            cache,
            Arc::clone(&http_client),
            config.auth_base.clone(),
            config.timeout_ms,
        );
        Self {
            config,
            http_client,
            broker,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn broker(&self) -> &CredentialBroker {
        &self.broker
    }

    /// Invoke an operation whose response is a single-result envelope.
    pub(crate) async fn invoke<T>(
        &self,
        identity: CallerIdentity<'_>,
        operation: Operation,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(identity, &operation).await?;
        let envelope = decode_envelope::<T>(&body).map_err(|error| {
            GatewayError::decode(
                operation.name,
                format!("failed to decode response envelope: {error}"),
            )
        })?;

        envelope
            .into_result()
            .map_err(|fault| self.log_fault(&operation, fault))
    }

    /// Invoke an operation whose response is a list-shaped envelope;
    /// upstream ordering is preserved.
    pub(crate) async fn invoke_many<T>(
        &self,
        identity: CallerIdentity<'_>,
        operation: Operation,
    ) -> Result<Vec<T>, GatewayError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(identity, &operation).await?;
        let envelope = decode_results_envelope::<T>(&body).map_err(|error| {
            GatewayError::decode(
                operation.name,
                format!("failed to decode results envelope: {error}"),
            )
        })?;

        envelope
            .into_results()
            .map_err(|fault| self.log_fault(&operation, fault))
    }

    /// Invoke a write operation where the upstream may answer with an empty
    /// body (204) or echo the entity back.
    pub(crate) async fn invoke_no_content(
        &self,
        identity: CallerIdentity<'_>,
        operation: Operation,
    ) -> Result<(), GatewayError> {
        let body = self.execute(identity, &operation).await?;
        if body.trim().is_empty() {
            return Ok(());
        }

        let envelope = decode_envelope::<serde_json::Value>(&body).map_err(|error| {
            GatewayError::decode(
                operation.name,
                format!("failed to decode response envelope: {error}"),
            )
        })?;
        envelope
            .into_result()
            .map(|_| ())
            .map_err(|fault| self.log_fault(&operation, fault))
    }

    async fn execute(
        &self,
        identity: CallerIdentity<'_>,
        operation: &Operation,
    ) -> Result<String, GatewayError> {
        let credentials = self.broker.credentials(identity).await?;

        let url = format!(
            "{}/{}",
            self.config.base_url(operation.base),
            operation.path
        );
        debug!(operation = operation.name, url = %url, "invoking upstream operation");

        let mut request = HttpRequest::new(operation.method, url)
            .with_header("accept", "application/json")
            .with_header("x-requested-with", "XMLHttpRequest")
            .with_header("cookie", credentials.cookie_header())
            .with_timeout_ms(self.config.timeout_ms);
        if let Some(body) = &operation.body {
            request = request.with_json_body(body.clone());
        }

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(operation = operation.name, error = %error, "upstream transport failure");
            GatewayError::transport(operation.name, error.message().to_owned())
        })?;

        if !response.is_success() {
            // A rejected call may still carry the structured error envelope.
            if let Ok(envelope) = decode_envelope::<serde_json::Value>(&response.body) {
                if let Some(error) = envelope.error {
                    warn!(
                        operation = operation.name,
                        code = %error.code,
                        "upstream reported an error"
                    );
                    return Err(GatewayError::upstream(operation.name, &error));
                }
            }
            warn!(
                operation = operation.name,
                status = response.status,
                "upstream returned non-success status"
            );
            return Err(GatewayError::transport(
                operation.name,
                format!("upstream returned status {}", response.status),
            ));
        }

        Ok(response.body)
    }

    fn log_fault(
        &self,
        operation: &Operation,
        fault: utilink_core::envelope::EnvelopeFault,
    ) -> GatewayError {
        let error = GatewayError::from_fault(operation.name, fault);
        warn!(
            operation = operation.name,
            code = error.upstream_code().unwrap_or_default(),
            message = error.message(),
            payload = operation.body.as_deref().unwrap_or_default(),
            "upstream operation failed"
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use serde::Deserialize;

    use super::*;
    use crate::cache::MemoryCredentialCache;
    use crate::error::GatewayErrorKind;
    use crate::http::{HttpError, HttpResponse};

    const AUTH_BODY: &str = r#"{"SAP_SESSIONID_X1": "abc123"}"#;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(rename = "AccountID")]
        account_id: String,
    }

    /// Scripted transport: answers the auth exchange, then pops queued
    /// resource responses in order.
    struct ScriptedHttpClient {
        responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
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

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let is_auth = request.url.contains("/v1.0/authentication/");
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);

            let response = if is_auth {
                Ok(HttpResponse::ok_json(AUTH_BODY))
            } else {
                let mut queue = self
                    .responses
                    .lock()
                    .expect("response queue should not be poisoned");
                if queue.is_empty() {
                    Err(HttpError::non_retryable("scripted responses exhausted"))
                } else {
                    queue.remove(0)
                }
            };
            Box::pin(async move { response })
        }
    }

    fn gateway(client: Arc<ScriptedHttpClient>) -> ResourceGateway {
        ResourceGateway::new(
            GatewayConfig::new(
                "https://std.test/odata",
                "https://secure.test/odata",
                "https://auth.test",
            ),
            client,
            Arc::new(MemoryCredentialCache::with_default_ttl()),
        )
    }

    #[tokio::test]
    async fn attaches_credentials_and_fixed_headers() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"{"d": {"AccountID": "1001"}}"#,
        ))]);
        let gateway = gateway(Arc::clone(&client));

        let probe: Probe = gateway
            .invoke(
                CallerIdentity::Bearer("jwt-1"),
                Operation::get(
                    "probe",
                    UpstreamBase::Standard,
                    String::from("Accounts('1001')"),
                ),
            )
            .await
            .expect("invoke succeeds");
        assert_eq!(probe.account_id, "1001");

        let requests = client.recorded();
        assert_eq!(requests.len(), 2, "one auth exchange, one resource call");
        let resource = &requests[1];
        assert_eq!(resource.url, "https://std.test/odata/Accounts('1001')");
        assert_eq!(
            resource.headers.get("cookie").map(String::as_str),
            Some("SAP_SESSIONID_X1=abc123")
        );
        assert_eq!(
            resource.headers.get("x-requested-with").map(String::as_str),
            Some("XMLHttpRequest")
        );
        assert_eq!(
            resource.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn secure_operations_target_the_secure_base() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"{"d": {"AccountID": "1"}}"#,
        ))]);
        let gateway = gateway(Arc::clone(&client));

        let _: Probe = gateway
            .invoke(
                CallerIdentity::Bearer("jwt-1"),
                Operation::get(
                    "probe",
                    UpstreamBase::Secure,
                    String::from("PaymentArrangements('1')"),
                ),
            )
            .await
            .expect("invoke succeeds");

        assert!(client.recorded()[1]
            .url
            .starts_with("https://secure.test/odata/"));
    }

    #[tokio::test]
    async fn populated_error_maps_to_upstream_failure() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"{"error": {"code": "ZCM/102", "message": {"lang": "en", "value": "Account not found"}}}"#,
        ))]);
        let gateway = gateway(client);

        let error = gateway
            .invoke::<Probe>(
                CallerIdentity::Bearer("jwt-1"),
                Operation::get("probe", UpstreamBase::Standard, String::from("Accounts('9')")),
            )
            .await
            .expect_err("upstream error");
        assert_eq!(error.kind(), GatewayErrorKind::Upstream);
        assert_eq!(error.upstream_code(), Some("ZCM/102"));
        assert_eq!(error.message(), "Account not found");
    }

    #[tokio::test]
    async fn error_envelope_on_rejected_status_still_maps_to_upstream() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse {
            status: 400,
            body: String::from(
                r#"{"error": {"code": "ZCM/007", "message": {"value": "Bad input"}}}"#,
            ),
        })]);
        let gateway = gateway(client);

        let error = gateway
            .invoke::<Probe>(
                CallerIdentity::Bearer("jwt-1"),
                Operation::get("probe", UpstreamBase::Standard, String::from("Accounts('9')")),
            )
            .await
            .expect_err("upstream error");
        assert_eq!(error.kind(), GatewayErrorKind::Upstream);
        assert_eq!(error.upstream_code(), Some("ZCM/007"));
    }

    #[tokio::test]
    async fn empty_envelope_is_a_contract_violation() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json("{}"))]);
        let gateway = gateway(client);

        let error = gateway
            .invoke::<Probe>(
                CallerIdentity::Bearer("jwt-1"),
                Operation::get("probe", UpstreamBase::Standard, String::from("Accounts('9')")),
            )
            .await
            .expect_err("contract violation");
        assert_eq!(error.kind(), GatewayErrorKind::ContractViolation);
    }

    #[tokio::test]
    async fn transport_failure_is_retryable_by_the_caller() {
        let client = ScriptedHttpClient::new(vec![Err(HttpError::new("connection refused"))]);
        let gateway = gateway(client);

        let error = gateway
            .invoke::<Probe>(
                CallerIdentity::Bearer("jwt-1"),
                Operation::get("probe", UpstreamBase::Standard, String::from("Accounts('9')")),
            )
            .await
            .expect_err("transport failure");
        assert_eq!(error.kind(), GatewayErrorKind::Transport);
        assert!(error.retryable());
    }

    #[tokio::test]
    async fn no_content_response_is_accepted_for_writes() {
        let client = ScriptedHttpClient::new(vec![Ok(HttpResponse {
            status: 204,
            body: String::new(),
        })]);
        let gateway = gateway(client);

        gateway
            .invoke_no_content(
                CallerIdentity::Bearer("jwt-1"),
                Operation::put(
                    "probe",
                    UpstreamBase::Standard,
                    String::from("AccountAddresses(AccountID='1',AddressID='2')"),
                    String::from("{}"),
                ),
            )
            .await
            .expect("empty body accepted");
    }
}
