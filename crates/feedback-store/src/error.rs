//! Error types for store operations.

/// Errors that can occur during agent and conversation operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required field was absent or blank.
    #[error("{0}")]
    Validation(String),

    /// No agent matches the given id.
    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// No conversation matches the given id.
    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    /// A database operation failed.
    #[error("store database error: {0}")]
    Database(#[from] rusqlite::Error),
}
