//! The embedded SQLite record store.
//!
//! One table, `todos`, keyed by a uuid-v4 string id. All access goes through
//! raw parameterized statements decoded into [`TaskRecord`]; DDL runs once,
//! unprepared, at [`initialize`](TaskStore::initialize). Writes are
//! serialized by SQLite's own locking — this store adds no locking of its own
//! beyond the connection slot.

use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    FromQueryResult, Statement, Value,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{TaskStore, TaskUpdate};
use crate::task::{encode_timestamp, Task, TaskRecord};

const CREATE_TODOS_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS todos (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    "createdAt" TEXT NOT NULL
)"#;

const SELECT_ALL: &str = r#"SELECT id, text, completed, "createdAt" AS created_at
    FROM todos ORDER BY "createdAt" DESC"#;

const SELECT_ONE: &str = r#"SELECT id, text, completed, "createdAt" AS created_at
    FROM todos WHERE id = $1"#;

/// Task store backed by an embedded SQLite database file.
///
/// Construction is cheap and does not touch the filesystem; the connection is
/// opened by [`initialize`](TaskStore::initialize) and released by
/// [`close`](TaskStore::close), after which a re-initialize reconnects.
pub struct SqliteTaskStore {
    database_url: String,
    verbose: bool,
    conn: RwLock<Option<DatabaseConnection>>,
}

impl SqliteTaskStore {
    /// Create an unconnected store for the given sea-orm SQLite URL
    /// (e.g. `sqlite:./data/todos.db?mode=rwc` or `sqlite::memory:`).
    ///
    /// `verbose` wires through to sqlx statement logging.
    pub fn new(database_url: impl Into<String>, verbose: bool) -> Self {
        Self {
            database_url: database_url.into(),
            verbose,
            conn: RwLock::new(None),
        }
    }

    /// Clone out the live connection, or fail if the store is not connected.
    /// The handle is pool-backed, so cloning is cheap and the lock is held
    /// only for the lookup.
    async fn conn(&self) -> Result<DatabaseConnection, StoreError> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotConnected)
    }

    async fn fetch_one(
        &self,
        conn: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<Task>, StoreError> {
        let record = TaskRecord::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            SELECT_ONE,
            [id.into()],
        ))
        .one(conn)
        .await
        .map_err(StoreError::Query)?;

        record.map(TaskRecord::into_task).transpose()
    }
}

#[async_trait::async_trait]
impl TaskStore for SqliteTaskStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        let mut slot = self.conn.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let mut opts = ConnectOptions::new(&self.database_url);
        // Single-writer, single-process store: one live connection, kept open
        // so `sqlite::memory:` databases survive between calls.
        opts.max_connections(1)
            .min_connections(1)
            .sqlx_logging(self.verbose);
        let conn = Database::connect(opts)
            .await
            .map_err(StoreError::Connection)?;
        conn.execute_unprepared(CREATE_TODOS_TABLE)
            .await
            .map_err(StoreError::Connection)?;

        log::debug!("task store connected at {}", self.database_url);
        *slot = Some(conn);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn().await?;
        let records = TaskRecord::find_by_statement(Statement::from_string(
            DatabaseBackend::Sqlite,
            SELECT_ALL,
        ))
        .all(&conn)
        .await
        .map_err(StoreError::Query)?;

        records.into_iter().map(TaskRecord::into_task).collect()
    }

    async fn insert(
        &self,
        text: &str,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Task, StoreError> {
        let conn = self.conn().await?;
        let task = Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed,
            created_at,
        };

        conn.execute_raw(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"INSERT INTO todos (id, text, completed, "createdAt") VALUES ($1, $2, $3, $4)"#,
            [
                task.id.as_str().into(),
                task.text.as_str().into(),
                i32::from(task.completed).into(),
                encode_timestamp(task.created_at).into(),
            ],
        ))
        .await
        .map_err(StoreError::Write)?;

        Ok(task)
    }

    async fn update(&self, id: &str, update: &TaskUpdate) -> Result<Option<Task>, StoreError> {
        let conn = self.conn().await?;

        // One fixed statement per variant; nothing assembled at runtime.
        let (sql, values): (&str, Vec<Value>) = match update {
            TaskUpdate::Text(text) => (
                "UPDATE todos SET text = $1 WHERE id = $2",
                vec![text.as_str().into(), id.into()],
            ),
            TaskUpdate::Completed(completed) => (
                "UPDATE todos SET completed = $1 WHERE id = $2",
                vec![i32::from(*completed).into(), id.into()],
            ),
            TaskUpdate::Both { text, completed } => (
                "UPDATE todos SET text = $1, completed = $2 WHERE id = $3",
                vec![
                    text.as_str().into(),
                    i32::from(*completed).into(),
                    id.into(),
                ],
            ),
        };

        let result = conn
            .execute_raw(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                sql,
                values,
            ))
            .await
            .map_err(StoreError::Write)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Re-select so the caller gets the stored state, not an echo of the request.
        self.fetch_one(&conn, id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn().await?;
        let result = conn
            .execute_raw(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "DELETE FROM todos WHERE id = $1",
                [id.into()],
            ))
            .await
            .map_err(StoreError::Write)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_completed(&self) -> Result<u64, StoreError> {
        let conn = self.conn().await?;
        let result = conn
            .execute_raw(Statement::from_string(
                DatabaseBackend::Sqlite,
                "DELETE FROM todos WHERE completed = 1",
            ))
            .await
            .map_err(StoreError::Write)?;

        Ok(result.rows_affected())
    }

    async fn close(&self) -> Result<(), StoreError> {
        let mut slot = self.conn.write().await;
        if let Some(conn) = slot.take() {
            conn.close().await.map_err(StoreError::Connection)?;
            log::debug!("task store closed");
        }
        Ok(())
    }
}
