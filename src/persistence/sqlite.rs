use super::{PersistenceResult, STORAGE_KEY, StateStore};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Key/value table holding the planner snapshot under [`STORAGE_KEY`].
pub struct SqliteStateStore {
    connection: Mutex<Connection>,
    key: String,
}

impl SqliteStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            key: STORAGE_KEY.to_string(),
        })
    }

    /// Stores the snapshot under a different key, letting several planners
    /// share one database file.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS planner_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl StateStore for SqliteStateStore {
    fn read_blob(&self) -> PersistenceResult<Option<String>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT value FROM planner_state WHERE key = ?1")?;
        let value = stmt
            .query_row(params![self.key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn write_blob(&self, blob: &str) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO planner_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![self.key, blob],
        )?;
        Ok(())
    }

    fn remove_blob(&self) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        conn.execute("DELETE FROM planner_state WHERE key = ?1", params![self.key])?;
        Ok(())
    }
}
