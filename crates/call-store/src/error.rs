//! Error types for call storage

use dialwatch_call_core::CallId;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Call not found: {call_id}")]
    NotFound { call_id: CallId },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt call record {call_id}: {message}")]
    Corrupt { call_id: String, message: String },
}

impl StoreError {
    pub fn not_found(call_id: &CallId) -> Self {
        Self::NotFound {
            call_id: call_id.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
