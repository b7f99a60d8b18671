use serde::Deserialize;
use std::fmt;

/// Session-creation endpoint of the OpenAI Realtime API.
pub const DEFAULT_SESSION_URL: &str = "https://api.openai.com/v1/realtime/sessions";

fn default_session_url() -> String {
    DEFAULT_SESSION_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o-realtime-preview-2024-12-17".to_string()
}

fn default_voice() -> String {
    "verse".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

/// Settings for the external real-time session provider.
///
/// The model, voice and transcription model are fixed per deployment; callers
/// only influence the instructions.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    /// Bearer credential sent with every session request.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_session_url")]
    pub session_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            session_url: default_session_url(),
            model: default_model(),
            voice: default_voice(),
            transcription_model: default_transcription_model(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"[REDACTED]")
            .field("session_url", &self.session_url)
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

impl ProviderConfig {
    /// Default provider settings with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Same settings, pointed at a different session endpoint.
    pub fn with_session_url(mut self, url: impl Into<String>) -> Self {
        self.session_url = url.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
