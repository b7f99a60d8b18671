//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds. Concurrent
    /// writers wait this long for the write lock before failing.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),
}

static MEMORY_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Creates a file-backed SQLite pool with WAL mode and foreign keys enabled.
///
/// `db_path` is the store connection string from configuration. Passing
/// `:memory:` is accepted but routed to [`create_memory_pool`], since a plain
/// `:memory:` path would give every pooled connection its own empty database.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created,
/// including when the first connection fails its initialization pragmas.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    if db_path == ":memory:" {
        return create_memory_pool(settings);
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(flags)
        .with_init(move |conn| init_connection(conn, settings));

    tracing::debug!(path = db_path, "opening sqlite pool");
    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .build(manager)?;
    Ok(pool)
}

/// Creates a pool over a single named in-memory database shared by every
/// connection in the pool. Each call gets a fresh, empty database.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_memory_pool(settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let n = MEMORY_DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!(
        "file:feedback-mem-{}-{}?mode=memory&cache=shared",
        std::process::id(),
        n
    );

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(uri)
        .with_flags(flags)
        .with_init(move |conn| init_connection(conn, settings));

    // The database lives only as long as one connection stays open, so the
    // pool must never reap or recycle its connections.
    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)?;
    Ok(pool)
}

fn init_connection(conn: &mut Connection, settings: DbRuntimeSettings) -> rusqlite::Result<()> {
    // In-memory databases report "memory" instead of "wal".
    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    if journal_mode != "wal" && journal_mode != "memory" {
        return Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("failed to set WAL journal mode, got: {}", journal_mode)),
        ));
    }
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {};",
        settings.busy_timeout_ms
    ))
}
