//! Checkpoint and resume for an in-progress game.
//!
//! One slot holds the latest snapshot: a save replaces it, never appends.
//! The snapshot is wrapped in a versioned envelope so a format change can
//! be detected on load instead of silently producing a wrong game.

use crate::core::GameState;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Storage key of the in-progress game.
pub const CURRENT_GAME_KEY: &str = "feud_current_game";

/// Serializable checkpoint of a game session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// When checkpoint was written
    pub saved_at: DateTime<Utc>,

    /// Snapshot of the game
    pub state: GameState,
}

impl Checkpoint {
    pub fn new(state: GameState) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            saved_at: Utc::now(),
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;

        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(checkpoint)
    }
}

/// Durable home of the latest game snapshot.
pub trait CheckpointStore: Send + Sync {
    /// Read the saved snapshot, if any.
    fn load(&self) -> Result<Option<GameState>, CheckpointError>;

    /// Replace the saved snapshot.
    fn save(&self, state: &GameState) -> Result<(), CheckpointError>;

    /// Forget the saved snapshot.
    fn clear(&self) -> Result<(), CheckpointError>;
}

/// Checkpoint store that keeps one snapshot under a fixed key.
#[derive(Debug, Clone)]
pub struct CheckpointSlot<K> {
    storage: K,
    key: String,
}

impl<K: KeyValueStore> CheckpointSlot<K> {
    /// Slot under [`CURRENT_GAME_KEY`].
    pub fn new(storage: K) -> Self {
        Self::with_key(storage, CURRENT_GAME_KEY)
    }

    pub fn with_key(storage: K, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }
}

impl<K: KeyValueStore> CheckpointStore for CheckpointSlot<K> {
    fn load(&self) -> Result<Option<GameState>, CheckpointError> {
        match self.storage.get(&self.key)? {
            Some(json) => Ok(Some(Checkpoint::from_json(&json)?.state)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &GameState) -> Result<(), CheckpointError> {
        let json = Checkpoint::new(state.clone()).to_json()?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CheckpointError> {
        self.storage.remove(&self.key)?;
        Ok(())
    }
}

impl<C: CheckpointStore + ?Sized> CheckpointStore for std::sync::Arc<C> {
    fn load(&self) -> Result<Option<GameState>, CheckpointError> {
        (**self).load()
    }

    fn save(&self, state: &GameState) -> Result<(), CheckpointError> {
        (**self).save(state)
    }

    fn clear(&self) -> Result<(), CheckpointError> {
        (**self).clear()
    }
}
