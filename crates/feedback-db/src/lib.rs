//! Database layer for the voice feedback backend.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. The `agents`, `conversations` and
//! `conversation_messages` tables are all created through versioned
//! migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: no external database process. WAL allows
//!   concurrent readers with a single writer; transcript appends are single
//!   statements, so writer serialization is all the store needs.
//! - **`r2d2` connection pool**: bounded connection reuse, constructed once at
//!   startup and handed to the router.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!` and ship with the server.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_memory_pool, create_pool, DbPool, DbRuntimeSettings, PoolError};
