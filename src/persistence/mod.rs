//! Question sets and match history, at the boundary of the game core.
//!
//! The core only ever appends a [`GameResult`] once a game has finished;
//! listing, saving and deleting question sets belong to the editor UI.
//! Two interchangeable backends implement [`QuestionRepository`]: a
//! device-local one for guests and a database one for signed-in users.
//! [`RepositoryFactory`] picks between them from the auth state.

mod demo;
mod local;
mod sqlite;

pub use demo::{demo_config, demo_question_set, DEMO_SET_ID};
pub use local::{LocalRepository, GAME_HISTORY_KEY, QUESTION_SETS_KEY};
pub use sqlite::SqliteRepository;

use crate::core::{GameResult, QuestionSet};
use crate::storage::StorageError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by a repository backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backend scopes data per user and no user was given
    #[error("Operation requires a signed-in owner")]
    MissingOwner,

    /// The record exists and belongs to another user
    #[error("Question set '{id}' belongs to another user")]
    NotOwner { id: String },
}

/// Storage of question sets and finished-game history.
///
/// `owner` scopes data per user where the backend supports it; device-local
/// backends ignore it.
pub trait QuestionRepository: Send + Sync {
    fn list(&self, owner: Option<&str>) -> Result<Vec<QuestionSet>, RepositoryError>;

    /// Insert or replace by set id.
    fn save(&self, set: &QuestionSet, owner: Option<&str>) -> Result<(), RepositoryError>;

    /// Delete by set id. Deleting a missing set succeeds.
    fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    fn list_history(&self, owner: Option<&str>) -> Result<Vec<GameResult>, RepositoryError>;

    fn append_history(&self, result: &GameResult, owner: Option<&str>)
        -> Result<(), RepositoryError>;
}

/// Signed-in user, as reported by the authentication collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Chooses the repository backend from the current auth state.
#[derive(Clone)]
pub struct RepositoryFactory {
    local: Arc<dyn QuestionRepository>,
    remote: Arc<dyn QuestionRepository>,
}

impl RepositoryFactory {
    pub fn new(local: Arc<dyn QuestionRepository>, remote: Arc<dyn QuestionRepository>) -> Self {
        Self { local, remote }
    }

    /// Remote backend for a signed-in user, device-local otherwise.
    pub fn for_identity(&self, identity: Option<&Identity>) -> Arc<dyn QuestionRepository> {
        match identity {
            Some(_) => Arc::clone(&self.remote),
            None => Arc::clone(&self.local),
        }
    }
}

/// Outcome of [`migrate_local_to_remote`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub sets_migrated: usize,
    pub sets_failed: usize,
    pub results_migrated: usize,
    pub results_failed: usize,
}

/// Copy a guest's local data to their account after sign-in.
///
/// Saves are upserts, so running this twice creates no duplicates. A
/// failure on one item is logged and the rest continue. Sets that reached
/// the remote backend are then removed locally; history stays as a local
/// cache.
pub fn migrate_local_to_remote(
    user_id: &str,
    local: &dyn QuestionRepository,
    remote: &dyn QuestionRepository,
) -> Result<MigrationReport, RepositoryError> {
    let sets = local.list(None)?;
    let history = local.list_history(None)?;
    let mut report = MigrationReport::default();

    if sets.is_empty() && history.is_empty() {
        return Ok(report);
    }

    let mut migrated_ids = Vec::new();
    for set in &sets {
        match remote.save(set, Some(user_id)) {
            Ok(()) => {
                report.sets_migrated += 1;
                migrated_ids.push(set.id.as_str());
            }
            Err(err) => {
                report.sets_failed += 1;
                warn!(set_id = %set.id, error = %err, "failed to migrate question set");
            }
        }
    }

    for result in &history {
        match remote.append_history(result, Some(user_id)) {
            Ok(()) => report.results_migrated += 1,
            Err(err) => {
                report.results_failed += 1;
                warn!(result_id = %result.id, error = %err, "failed to migrate game result");
            }
        }
    }

    for id in migrated_ids {
        if let Err(err) = local.delete(id) {
            warn!(set_id = %id, error = %err, "failed to remove migrated set locally");
        }
    }

    info!(
        user_id,
        sets = report.sets_migrated,
        results = report.results_migrated,
        "migrated local data"
    );
    Ok(report)
}
