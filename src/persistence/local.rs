//! Device-local repository over a key-value store.

use super::{QuestionRepository, RepositoryError};
use crate::core::{GameResult, QuestionSet};
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub const QUESTION_SETS_KEY: &str = "feud_question_sets";
pub const GAME_HISTORY_KEY: &str = "feud_game_history";

/// Repository for guests. Everything lives in one device store.
///
/// Unreadable or corrupt data reads as empty; write failures (such as a
/// full store) are returned to the caller.
#[derive(Debug, Clone)]
pub struct LocalRepository<K> {
    storage: K,
}

impl<K: KeyValueStore> LocalRepository<K> {
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(err) => {
                warn!(key, error = %err, "local storage read failed");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(key, error = %err, "ignoring corrupt local data");
            T::default()
        })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)?;
        Ok(())
    }
}

impl<K: KeyValueStore> QuestionRepository for LocalRepository<K> {
    fn list(&self, _owner: Option<&str>) -> Result<Vec<QuestionSet>, RepositoryError> {
        Ok(self.read(QUESTION_SETS_KEY))
    }

    fn save(&self, set: &QuestionSet, _owner: Option<&str>) -> Result<(), RepositoryError> {
        let mut sets: Vec<QuestionSet> = self.read(QUESTION_SETS_KEY);
        match sets.iter_mut().find(|s| s.id == set.id) {
            Some(existing) => *existing = set.clone(),
            None => sets.push(set.clone()),
        }
        self.write(QUESTION_SETS_KEY, &sets)
    }

    fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut sets: Vec<QuestionSet> = self.read(QUESTION_SETS_KEY);
        sets.retain(|s| s.id != id);
        self.write(QUESTION_SETS_KEY, &sets)
    }

    fn list_history(&self, _owner: Option<&str>) -> Result<Vec<GameResult>, RepositoryError> {
        Ok(self.read(GAME_HISTORY_KEY))
    }

    fn append_history(
        &self,
        result: &GameResult,
        _owner: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut history: Vec<GameResult> = self.read(GAME_HISTORY_KEY);
        history.push(result.clone());
        self.write(GAME_HISTORY_KEY, &history)
    }
}
