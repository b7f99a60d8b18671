//! Conversation transcripts and their append-only message lists.

use feedback_types::{Conversation, Message, Speaker};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::StoreError;
use crate::now_timestamp;

/// Creates an empty conversation for an existing agent.
///
/// The agent lookup and the insert are one statement, so a conversation can
/// never reference a missing agent.
///
/// # Errors
///
/// Returns `StoreError::Validation` if `agent_id` is blank,
/// `StoreError::AgentNotFound` if the agent does not exist, or
/// `StoreError::Database` on SQL failure.
pub fn create_conversation(conn: &Connection, agent_id: &str) -> Result<Conversation, StoreError> {
    if agent_id.trim().is_empty() {
        return Err(StoreError::Validation("agentId is required".to_string()));
    }

    let conversation_id = Uuid::new_v4().to_string();
    let start_time = now_timestamp();

    let inserted = conn.execute(
        "INSERT INTO conversations (conversation_id, agent_id, start_time)
         SELECT ?1, id, ?3 FROM agents WHERE id = ?2",
        params![conversation_id, agent_id, start_time],
    )?;

    if inserted == 0 {
        return Err(StoreError::AgentNotFound(agent_id.to_string()));
    }

    tracing::info!(%conversation_id, agent_id, "conversation created");
    Ok(Conversation {
        conversation_id,
        agent_id: agent_id.to_string(),
        start_time,
        messages: Vec::new(),
    })
}

/// Appends one message to a conversation transcript.
///
/// The timestamp is the current time, raised if necessary to the latest
/// timestamp already in the transcript, so timestamps are non-decreasing in
/// insertion order even under clock skew or concurrent appends.
///
/// # Errors
///
/// Returns `StoreError::Validation` if `content` is blank,
/// `StoreError::ConversationNotFound` if no conversation has this id, or
/// `StoreError::Database` on SQL failure.
pub fn append_message(
    conn: &Connection,
    conversation_id: &str,
    content: &str,
    speaker: Speaker,
) -> Result<Message, StoreError> {
    if content.trim().is_empty() {
        return Err(StoreError::Validation("content is required".to_string()));
    }

    let timestamp: Option<String> = conn
        .query_row(
            "INSERT INTO conversation_messages (conversation_id, content, speaker, timestamp)
             SELECT c.conversation_id, ?2, ?3, max(?4, COALESCE(
                 (SELECT MAX(m.timestamp) FROM conversation_messages m
                  WHERE m.conversation_id = c.conversation_id), ''))
             FROM conversations c WHERE c.conversation_id = ?1
             RETURNING timestamp",
            params![conversation_id, content, speaker.as_str(), now_timestamp()],
            |row| row.get(0),
        )
        .optional()?;

    let timestamp =
        timestamp.ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;

    tracing::debug!(conversation_id, %speaker, "message appended");
    Ok(Message {
        content: content.to_string(),
        speaker,
        timestamp,
    })
}

/// Retrieves one conversation with its full transcript.
///
/// # Errors
///
/// Returns `StoreError::ConversationNotFound` if no conversation has this id.
pub fn get_conversation(conn: &Connection, conversation_id: &str) -> Result<Conversation, StoreError> {
    let mut conversation = conn
        .query_row(
            "SELECT conversation_id, agent_id, start_time
             FROM conversations WHERE conversation_id = ?1",
            [conversation_id],
            map_row_to_conversation,
        )
        .optional()?
        .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;

    conversation.messages = list_messages(conn, conversation_id)?;
    Ok(conversation)
}

/// Lists an agent's conversations, most recently started first.
///
/// Conversations sharing a start time are ordered by creation, newest first.
/// An unknown agent id yields an empty list.
pub fn list_conversations_for_agent(
    conn: &Connection,
    agent_id: &str,
) -> Result<Vec<Conversation>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT conversation_id, agent_id, start_time
         FROM conversations
         WHERE agent_id = ?1
         ORDER BY start_time DESC, id DESC",
    )?;

    let mut conversations = stmt
        .query_map([agent_id], map_row_to_conversation)?
        .collect::<Result<Vec<_>, _>>()?;

    for conversation in &mut conversations {
        conversation.messages = list_messages(conn, &conversation.conversation_id)?;
    }
    Ok(conversations)
}

/// Lists a conversation's messages in insertion order.
pub fn list_messages(conn: &Connection, conversation_id: &str) -> Result<Vec<Message>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT content, speaker, timestamp
         FROM conversation_messages
         WHERE conversation_id = ?1
         ORDER BY id ASC",
    )?;

    let messages = stmt
        .query_map([conversation_id], map_row_to_message)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(messages)
}

fn map_row_to_conversation(row: &Row) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        conversation_id: row.get(0)?,
        agent_id: row.get(1)?,
        start_time: row.get(2)?,
        messages: Vec::new(),
    })
}

fn map_row_to_message(row: &Row) -> rusqlite::Result<Message> {
    let speaker_str: String = row.get(1)?;
    let speaker: Speaker = speaker_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Message {
        content: row.get(0)?,
        speaker,
        timestamp: row.get(2)?,
    })
}
