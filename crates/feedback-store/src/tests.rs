//! Unit tests for agent and conversation persistence.

use std::collections::HashSet;

use feedback_types::Speaker;
use rusqlite::Connection;

use crate::error::StoreError;
use crate::{
    append_message, create_agent, create_conversation, get_agent, get_conversation,
    list_conversations_for_agent, list_messages,
};

/// Creates an in-memory SQLite database with migrations applied.
fn test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("should open in-memory db");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("should enable foreign keys");
    feedback_db::run_migrations(&conn).expect("migrations should succeed");
    conn
}

fn agent_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM agents", [], |row| row.get(0))
        .expect("should count agents")
}

// ── agents ───────────────────────────────────────────────────────────

#[test]
fn create_agent_round_trips_exact_text() {
    let conn = test_db();

    let agent = create_agent(&conn, "pricing feedback").expect("create should succeed");
    assert_eq!(agent.instructions, "pricing feedback");
    assert!(!agent.created_at.is_empty());
    assert!(chrono::DateTime::parse_from_rfc3339(&agent.created_at).is_ok());

    let fetched = get_agent(&conn, &agent.id).expect("get should succeed");
    assert_eq!(fetched, agent);
}

#[test]
fn create_agent_rejects_blank_instructions() {
    let conn = test_db();

    for input in ["", "   ", "\n\t"] {
        match create_agent(&conn, input) {
            Err(StoreError::Validation(msg)) => assert!(msg.contains("instructions")),
            other => panic!("expected validation error for {input:?}, got {other:?}"),
        }
    }
    assert_eq!(agent_count(&conn), 0, "nothing should be persisted");
}

#[test]
fn get_agent_unknown_id_is_not_found() {
    let conn = test_db();

    let err = get_agent(&conn, "does-not-exist").unwrap_err();
    assert!(matches!(err, StoreError::AgentNotFound(id) if id == "does-not-exist"));
}

#[test]
fn agent_ids_are_distinct() {
    let conn = test_db();
    let a = create_agent(&conn, "one").unwrap();
    let b = create_agent(&conn, "two").unwrap();
    assert_ne!(a.id, b.id);
}

// ── conversations ────────────────────────────────────────────────────

#[test]
fn create_conversation_starts_empty() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();

    let conversation = create_conversation(&conn, &agent.id).expect("create should succeed");
    assert_eq!(conversation.agent_id, agent.id);
    assert!(conversation.messages.is_empty());

    let stored = get_conversation(&conn, &conversation.conversation_id).unwrap();
    assert_eq!(stored, conversation);
}

#[test]
fn create_conversation_requires_agent_id() {
    let conn = test_db();
    assert!(matches!(
        create_conversation(&conn, " "),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn create_conversation_for_missing_agent_is_not_found() {
    let conn = test_db();

    let err = create_conversation(&conn, "ghost").unwrap_err();
    assert!(matches!(err, StoreError::AgentNotFound(id) if id == "ghost"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn conversation_ids_are_unique() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();

    let n = 200;
    let ids: HashSet<String> = (0..n)
        .map(|_| create_conversation(&conn, &agent.id).unwrap().conversation_id)
        .collect();
    assert_eq!(ids.len(), n);
}

#[test]
fn messages_keep_insertion_order() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();
    let conversation = create_conversation(&conn, &agent.id).unwrap();
    let id = &conversation.conversation_id;

    append_message(&conn, id, "hi", Speaker::User).unwrap();
    append_message(&conn, id, "hello", Speaker::Agent).unwrap();

    let messages = list_messages(&conn, id).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[0].speaker, Speaker::User);
    assert_eq!(messages[1].content, "hello");
    assert_eq!(messages[1].speaker, Speaker::Agent);
    assert!(messages[1].timestamp >= messages[0].timestamp);
}

#[test]
fn message_timestamps_never_go_backwards() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();
    let conversation = create_conversation(&conn, &agent.id).unwrap();
    let id = &conversation.conversation_id;

    // A message stamped in the future by a skewed clock.
    conn.execute(
        "INSERT INTO conversation_messages (conversation_id, content, speaker, timestamp)
         VALUES (?1, 'early', 'user', '2999-01-01T00:00:00.000Z')",
        [id],
    )
    .unwrap();

    let appended = append_message(&conn, id, "later", Speaker::Agent).unwrap();
    assert_eq!(appended.timestamp, "2999-01-01T00:00:00.000Z");
}

#[test]
fn append_to_unknown_conversation_is_not_found() {
    let conn = test_db();

    let err = append_message(&conn, "missing", "hi", Speaker::User).unwrap_err();
    assert!(matches!(err, StoreError::ConversationNotFound(id) if id == "missing"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM conversation_messages", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn append_rejects_blank_content() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();
    let conversation = create_conversation(&conn, &agent.id).unwrap();

    assert!(matches!(
        append_message(&conn, &conversation.conversation_id, "", Speaker::User),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn list_conversations_most_recent_first() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();

    let first = create_conversation(&conn, &agent.id).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = create_conversation(&conn, &agent.id).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let third = create_conversation(&conn, &agent.id).unwrap();

    append_message(&conn, &second.conversation_id, "hi", Speaker::User).unwrap();

    let listed = list_conversations_for_agent(&conn, &agent.id).unwrap();
    let ids: Vec<&str> = listed.iter().map(|c| c.conversation_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            third.conversation_id.as_str(),
            second.conversation_id.as_str(),
            first.conversation_id.as_str()
        ]
    );
    assert_eq!(listed[1].messages.len(), 1);
    assert!(listed[0].messages.is_empty());
}

#[test]
fn list_conversations_breaks_ties_by_creation() {
    let conn = test_db();
    let agent = create_agent(&conn, "persona").unwrap();

    for id in ["c-1", "c-2", "c-3"] {
        conn.execute(
            "INSERT INTO conversations (conversation_id, agent_id, start_time)
             VALUES (?1, ?2, '2024-01-01T00:00:00.000Z')",
            [id, agent.id.as_str()],
        )
        .unwrap();
    }

    let listed = list_conversations_for_agent(&conn, &agent.id).unwrap();
    let ids: Vec<&str> = listed.iter().map(|c| c.conversation_id.as_str()).collect();
    assert_eq!(ids, vec!["c-3", "c-2", "c-1"]);
}

#[test]
fn list_conversations_scoped_to_agent() {
    let conn = test_db();
    let a = create_agent(&conn, "a").unwrap();
    let b = create_agent(&conn, "b").unwrap();
    create_conversation(&conn, &a.id).unwrap();
    create_conversation(&conn, &b.id).unwrap();

    let listed = list_conversations_for_agent(&conn, &a.id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].agent_id, a.id);

    assert!(list_conversations_for_agent(&conn, "nobody").unwrap().is_empty());
}
