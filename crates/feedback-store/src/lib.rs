//! Agent and conversation persistence for the voice feedback backend.
//!
//! Every operation takes a borrowed [`rusqlite::Connection`] and works
//! against the tables created by `feedback-db` migrations. Each write is a
//! single statement.
//! Callers own connection acquisition (usually from the pool inside
//! `tokio::task::spawn_blocking`).
//!
//! Writes that depend on another row existing are expressed as
//! `INSERT … SELECT` so the existence check and the write cannot interleave
//! with a concurrent request:
//!
//! - [`create_conversation`] inserts only if the referenced agent exists.
//! - [`append_message`] inserts only if the conversation exists, and derives
//!   the message timestamp inside the same statement so transcript timestamps
//!   never go backwards.

mod agents;
mod conversations;
mod error;

pub use agents::{create_agent, get_agent};
pub use conversations::{
    append_message, create_conversation, get_conversation, list_conversations_for_agent,
    list_messages,
};
pub use error::StoreError;

/// Current time in the stored timestamp format: RFC 3339, UTC, millisecond
/// precision. Fixed width, so timestamps compare correctly as text.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests;
