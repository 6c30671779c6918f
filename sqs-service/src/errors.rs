use thiserror::Error;
use user_shared::error::{Fault, PipelineError, StoreError};

/// Why a single queue record was reported back as a batch item failure.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to decode validate body: {0}")]
    Body(#[from] PipelineError),

    #[error("Failed to create user: {0}")]
    Store(#[from] StoreError),

    #[error("Record processing aborted: {0}")]
    Fault(#[from] Fault),
}
