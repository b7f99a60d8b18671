//! Versioned schema for agents and transcripts.
//!
//! Each step is a SQL file compiled into the binary and recorded by name in
//! `_feedback_migrations` once applied. Steps already recorded are skipped,
//! so running this on every start is safe.

use rusqlite::Connection;
use thiserror::Error;

/// Schema steps as `(name, sql)`, oldest first. Append only.
const SCHEMA_STEPS: &[(&str, &str)] = &[
    ("000_init", TRACKING_TABLE_SQL),
    ("001_agents", include_str!("migrations/001_agents.sql")),
    (
        "002_conversations",
        include_str!("migrations/002_conversations.sql"),
    ),
    (
        "003_conversation_messages",
        include_str!("migrations/003_conversation_messages.sql"),
    ),
];

const TRACKING_TABLE_SQL: &str = include_str!("migrations/000_init.sql");

#[derive(Debug, Error)]
pub enum MigrationError {
    /// A schema step (or its bookkeeping row) could not be written. Nothing
    /// from that step is left behind.
    #[error("schema step '{step}' failed: {source}")]
    Apply {
        step: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The tracking table could not be created or read.
    #[error("cannot read schema history: {0}")]
    History(#[source] rusqlite::Error),
}

/// Brings the connected database up to the current schema.
///
/// Returns how many steps were newly applied (zero on an up-to-date store).
///
/// # Errors
///
/// Returns `MigrationError::Apply` naming the first step that failed, or
/// `MigrationError::History` if applied steps cannot be determined.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    apply_steps(conn, SCHEMA_STEPS)
}

fn apply_steps(conn: &Connection, steps: &[(&str, &str)]) -> Result<usize, MigrationError> {
    conn.execute_batch(TRACKING_TABLE_SQL)
        .map_err(MigrationError::History)?;

    let mut newly_applied = 0;
    for &(step, sql) in steps {
        if already_applied(conn, step)? {
            tracing::debug!(step, "schema step already applied");
            continue;
        }

        apply_one(conn, step, sql).map_err(|source| MigrationError::Apply {
            step: step.to_string(),
            source,
        })?;
        tracing::info!(step, "applied schema step");
        newly_applied += 1;
    }

    Ok(newly_applied)
}

fn already_applied(conn: &Connection, step: &str) -> Result<bool, MigrationError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM _feedback_migrations WHERE name = ?1)",
        [step],
        |row| row.get(0),
    )
    .map_err(MigrationError::History)
}

// Step body and bookkeeping row commit together or not at all.
fn apply_one(conn: &Connection, step: &str, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute("INSERT INTO _feedback_migrations (name) VALUES (?1)", [step])?;
    tx.commit()
}
