//! Provider request body and instruction templating.

use serde::Serialize;

use crate::config::ProviderConfig;

/// Persona used when the caller supplies no topic (absent, empty, or only
/// whitespace).
pub const FALLBACK_INSTRUCTIONS: &str = "You are a friendly researcher running a short \
feedback interview. You always start the conversation by greeting the user and asking how \
their experience with the product has been. Ask one short question at a time and follow up \
on what the user tells you.";

/// Renders the interview instructions sent to the provider.
///
/// A non-blank topic is interpolated verbatim (surrounding whitespace
/// included) into the researcher template; anything else yields
/// [`FALLBACK_INSTRUCTIONS`].
pub fn render_instructions(topic: Option<&str>) -> String {
    match topic {
        Some(t) if !t.trim().is_empty() => format!(
            "You are a researcher with the task of getting the user to talk about {t}. \
             You always start the conversation by greeting the user and asking an open \
             question about {t}. Ask one short question at a time and follow up on what \
             the user tells you."
        ),
        _ => FALLBACK_INSTRUCTIONS.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionConfig {
    pub model: String,
}

/// JSON body of a session-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRequest {
    pub model: String,
    pub voice: String,
    pub modalities: Vec<String>,
    pub input_audio_transcription: TranscriptionConfig,
    pub instructions: String,
}

impl SessionRequest {
    /// Builds the request for `topic` using the deployment's fixed model,
    /// voice and transcription settings.
    pub fn new(config: &ProviderConfig, topic: Option<&str>) -> Self {
        Self {
            model: config.model.clone(),
            voice: config.voice.clone(),
            modalities: vec!["text".to_string(), "audio".to_string()],
            input_audio_transcription: TranscriptionConfig {
                model: config.transcription_model.clone(),
            },
            instructions: render_instructions(topic),
        }
    }
}
