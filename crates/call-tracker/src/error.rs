//! Error types for the tracking engine

use dialwatch_call_core::CallError;
use dialwatch_call_store::StoreError;
use thiserror::Error;

/// Result type for tracker and initiator operations
pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Placing or querying the call failed
    #[error(transparent)]
    Call(#[from] CallError),

    /// The call store rejected an operation
    #[error("Call store error: {0}")]
    Store(#[from] StoreError),
}

impl TrackerError {
    /// Input or credential problems the caller has to fix
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TrackerError::Call(CallError::InvalidInput { .. })
                | TrackerError::Call(CallError::MissingCredential { .. })
        )
    }
}
