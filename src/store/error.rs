//! Store and builder errors.

use crate::checkpoint::CheckpointError;
use crate::persistence::RepositoryError;
use thiserror::Error;

/// Errors that can occur when building a game store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Checkpoint store not specified. Call .checkpoints(store) before .build()")]
    MissingCheckpointStore,

    #[error("No Tokio runtime. Build the store from within a runtime context")]
    NoRuntime,
}

/// Errors surfaced by explicit store operations.
///
/// Background auto-saves never produce these; their failures are logged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Checkpoint failed: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Could not export game result: {0}")]
    Export(#[from] RepositoryError),

    #[error("Game is not finished")]
    NotFinished,
}
