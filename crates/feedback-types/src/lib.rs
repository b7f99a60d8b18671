//! Shared domain types for the voice feedback backend.
//!
//! These are the documents the store persists and the server returns:
//! interview [`Agent`]s and the [`Conversation`] transcripts recorded against
//! them. Field names serialize in camelCase to match the public JSON API.
//!
//! Every other crate in the workspace depends on this one for its types, so it
//! stays free of database and HTTP dependencies.

use serde::{Deserialize, Serialize};

/// A configured interview persona.
///
/// Agents are immutable once created; there is no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Store-assigned identifier (UUID v4).
    pub id: String,
    /// Persona description substituted into session instructions.
    pub instructions: String,
    /// Creation timestamp (RFC 3339, UTC, millisecond precision).
    pub created_at: String,
}

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The interviewing agent.
    Agent,
    /// The human being interviewed.
    User,
}

impl Speaker {
    /// Returns the stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Speaker {
    type Err = ParseSpeakerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(Self::Agent),
            "user" => Ok(Self::User),
            _ => Err(ParseSpeakerError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown speaker string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpeakerError(pub String);

impl std::fmt::Display for ParseSpeakerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown speaker: {} (expected \"agent\" or \"user\")", self.0)
    }
}

impl std::error::Error for ParseSpeakerError {}

/// One entry in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub speaker: Speaker,
    /// Server-assigned timestamp (RFC 3339, UTC, millisecond precision).
    pub timestamp: String,
}

/// A transcript of one interview, linked to the agent that ran it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation identifier (UUID v4).
    pub conversation_id: String,
    /// Identifier of the owning agent.
    pub agent_id: String,
    /// Creation timestamp; listings sort on this field.
    pub start_time: String,
    /// Messages in chronological (insertion) order.
    pub messages: Vec<Message>,
}
