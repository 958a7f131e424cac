//! SQLite call store
//!
//! One row per call id in the `calls` table. The schema is created on open;
//! there is no migration history to manage.

use async_trait::async_trait;
use dialwatch_call_core::{Call, CallId, CallStatus};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::CallStore;

const CREATE_CALLS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS calls (
        id TEXT PRIMARY KEY,
        to_number TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )
"#;

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_calls_created_at ON calls (created_at DESC)";

/// Persisted call row
#[derive(sqlx::FromRow, Debug, Clone)]
struct CallRow {
    id: String,
    to_number: String,
    status: String,
    created_at: i64,
}

impl CallRow {
    fn into_call(self) -> StoreResult<Call> {
        if self.status.trim().is_empty() {
            return Err(StoreError::Corrupt {
                call_id: self.id,
                message: "empty status".to_string(),
            });
        }
        Ok(Call {
            id: CallId::new(self.id),
            destination: self.to_number,
            status: CallStatus::from(self.status),
            created_at: self.created_at,
        })
    }
}

/// SQLite-backed [`CallStore`]
#[derive(Clone, Debug)]
pub struct SqliteCallStore {
    pool: SqlitePool,
}

impl SqliteCallStore {
    /// Open (creating if needed) the database at `database_url`
    ///
    /// Use `sqlite://path/to/calls.db?mode=rwc` to create the file on first use.
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        info!(database_url = %database_url, "Call store ready");
        Ok(store)
    }

    /// Wrap an existing pool, creating the schema if needed
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_CALLS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_CREATED_AT_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CallStore for SqliteCallStore {
    async fn insert_or_replace(&self, call: &Call) -> StoreResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO calls (id, to_number, status, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(call.id.as_str())
        .bind(&call.destination)
        .bind(call.status.as_str())
        .bind(call.created_at)
        .execute(&self.pool)
        .await?;

        debug!(call_id = %call.id, status = %call.status, "Stored call");
        Ok(())
    }

    async fn update_status(&self, call_id: &CallId, status: &CallStatus) -> StoreResult<()> {
        let result = sqlx::query("UPDATE calls SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(call_id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(call_id));
        }
        debug!(call_id = %call_id, status = %status, "Updated call status");
        Ok(())
    }

    async fn get(&self, call_id: &CallId) -> StoreResult<Option<Call>> {
        let row = sqlx::query_as::<_, CallRow>(
            "SELECT id, to_number, status, created_at FROM calls WHERE id = ?",
        )
        .bind(call_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CallRow::into_call).transpose()
    }

    async fn list_all(&self) -> StoreResult<Vec<Call>> {
        let rows = sqlx::query_as::<_, CallRow>(
            "SELECT id, to_number, status, created_at FROM calls ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CallRow::into_call).collect()
    }
}
