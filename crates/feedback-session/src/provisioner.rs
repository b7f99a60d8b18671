use crate::config::ProviderConfig;
use crate::error::SessionError;
use crate::request::SessionRequest;
use serde_json::Value;

/// The provider's reply, relayed without interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// HTTP status returned by the provider.
    pub status: u16,
    /// Provider JSON body, unmodified.
    pub body: Value,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Requests live interview sessions from the real-time provider.
#[derive(Debug, Clone)]
pub struct SessionProvisioner {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl SessionProvisioner {
    /// Creates a provisioner with its own HTTP client, reused for every
    /// session request.
    pub fn new(config: ProviderConfig) -> Result<Self, SessionError> {
        if !config.has_credential() {
            return Err(SessionError::Config("provider api key is empty".to_string()));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Creates one provider session seeded with `topic`.
    ///
    /// Provider-side failures (4xx/5xx with a JSON body) are returned as
    /// `Ok` with the provider's status and body; only transport failures and
    /// non-JSON replies are errors.
    pub async fn create_session(&self, topic: Option<&str>) -> Result<ProviderResponse, SessionError> {
        let request = SessionRequest::new(&self.config, topic);

        tracing::debug!(
            url = %self.config.session_url,
            model = %request.model,
            fallback = topic.map_or(true, |t| t.trim().is_empty()),
            "requesting provider session"
        );

        let response = self
            .client
            .post(&self.config.session_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|source| SessionError::InvalidBody { status, source })?;

        let relayed = ProviderResponse { status, body };
        if relayed.is_success() {
            tracing::info!(status, "provider session created");
        } else {
            tracing::warn!(status, "provider rejected session request, relaying response");
        }
        Ok(relayed)
    }
}
