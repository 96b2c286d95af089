//! Shared transport doubles for the utilink behavioral suites.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use utilink_gateway::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Canned authentication body: an opaque bag of session cookies.
pub const AUTH_BODY: &str =
    r#"{"SAP_SESSIONID_X1": "abc123", "sap-usercontext": "sap-client=100"}"#;

/// Scripted transport: answers credential exchanges with the canned auth
/// body (after an optional delay) and pops queued resource responses in
/// order, recording every request it sees.
pub struct ScriptedHttpClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    auth_delay_ms: u64,
}

impl ScriptedHttpClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Self::with_auth_delay(responses, 0)
    }

    pub fn with_auth_delay(
        responses: Vec<Result<HttpResponse, HttpError>>,
        auth_delay_ms: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            auth_delay_ms,
        })
    }

    pub fn recorded(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    /// How many credential exchanges the upstream has seen.
    pub fn auth_exchanges(&self) -> usize {
        self.recorded()
            .iter()
            .filter(|request| is_auth_url(&request.url))
            .count()
    }

    /// How many resource calls the upstream has seen.
    pub fn resource_calls(&self) -> usize {
        self.recorded()
            .iter()
            .filter(|request| !is_auth_url(&request.url))
            .count()
    }
}

fn is_auth_url(url: &str) -> bool {
    url.contains("/v1.0/authentication/")
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let is_auth = is_auth_url(&request.url);
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

        let delay_ms = if is_auth { self.auth_delay_ms } else { 0 };
        Box::pin(async move {
            if delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }
            response
        })
    }
}
