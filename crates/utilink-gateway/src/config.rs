/// Which upstream base address an operation targets.
///
/// Two bases are in use: the standard endpoint for everyday account
/// resources and a secure endpoint for sensitive ones (payment
/// arrangements, business-partner creation, move-in/move-out).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamBase {
    Standard,
    Secure,
}

/// Explicit gateway configuration; injected at construction, never read
/// from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the standard upstream endpoint.
    pub standard_base: String,
    /// Base URL of the secure upstream endpoint.
    pub secure_base: String,
    /// Base URL of the authentication endpoint.
    pub auth_base: String,
    /// Per-request timeout applied to every upstream call.
    pub timeout_ms: u64,
}

impl GatewayConfig {
    pub fn new(
        standard_base: impl Into<String>,
        secure_base: impl Into<String>,
        auth_base: impl Into<String>,
    ) -> Self {
        Self {
            standard_base: standard_base.into(),
            secure_base: secure_base.into(),
            auth_base: auth_base.into(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self, base: UpstreamBase) -> &str {
        let url = match base {
            UpstreamBase::Standard => &self.standard_base,
            UpstreamBase::Secure => &self.secure_base,
        };
        url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_selection_strips_trailing_slash() {
        let config = GatewayConfig::new(
            "https://upstream.test/odata/",
            "https://secure.test/odata",
            "https://upstream.test",
        );

        assert_eq!(
            config.base_url(UpstreamBase::Standard),
            "https://upstream.test/odata"
        );
        assert_eq!(
            config.base_url(UpstreamBase::Secure),
            "https://secure.test/odata"
        );
    }
}
