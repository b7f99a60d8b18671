//! Agent documents: interview personas created once and never modified.

use feedback_types::Agent;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::StoreError;
use crate::now_timestamp;

/// Persists a new agent with a generated id and creation timestamp.
///
/// The instruction text is stored exactly as given.
///
/// # Errors
///
/// Returns `StoreError::Validation` if `instructions` is empty or only
/// whitespace (nothing is written), or `StoreError::Database` on SQL failure.
pub fn create_agent(conn: &Connection, instructions: &str) -> Result<Agent, StoreError> {
    if instructions.trim().is_empty() {
        return Err(StoreError::Validation("instructions is required".to_string()));
    }

    let agent = Agent {
        id: Uuid::new_v4().to_string(),
        instructions: instructions.to_string(),
        created_at: now_timestamp(),
    };

    conn.execute(
        "INSERT INTO agents (id, instructions, created_at) VALUES (?1, ?2, ?3)",
        params![agent.id, agent.instructions, agent.created_at],
    )?;

    tracing::info!(agent_id = %agent.id, "agent created");
    Ok(agent)
}

/// Retrieves an agent by id.
///
/// # Errors
///
/// Returns `StoreError::AgentNotFound` if no agent has this id.
pub fn get_agent(conn: &Connection, id: &str) -> Result<Agent, StoreError> {
    conn.query_row(
        "SELECT id, instructions, created_at FROM agents WHERE id = ?1",
        [id],
        |row| {
            Ok(Agent {
                id: row.get(0)?,
                instructions: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| StoreError::AgentNotFound(id.to_string()))
}
