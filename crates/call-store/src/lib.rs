//! # dialwatch call-store
//!
//! Durable call records keyed by call id.
//!
//! The [`CallStore`] contract is deliberately small:
//!
//! - `insert_or_replace` - exactly one record per id, last write wins
//! - `update_status` - fails with [`StoreError::NotFound`] for unknown ids
//! - `list_all` - every call, newest `created_at` first
//!
//! Two implementations are provided: [`MemoryCallStore`] for tests and
//! embedding, and [`SqliteCallStore`] for persistence across runs.

use async_trait::async_trait;
use dialwatch_call_core::{Call, CallId, CallStatus};

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryCallStore;
pub use sqlite::SqliteCallStore;

/// Storage for call records
///
/// Implementations must accept concurrent writes for different ids.
#[async_trait]
pub trait CallStore: Send + Sync {
    /// Insert the call, replacing any record with the same id
    async fn insert_or_replace(&self, call: &Call) -> StoreResult<()>;

    /// Set the status of an existing call
    async fn update_status(&self, call_id: &CallId, status: &CallStatus) -> StoreResult<()>;

    /// Fetch a single call
    async fn get(&self, call_id: &CallId) -> StoreResult<Option<Call>>;

    /// All calls, newest first
    async fn list_all(&self) -> StoreResult<Vec<Call>>;
}
