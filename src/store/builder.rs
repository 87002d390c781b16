//! Builder for constructing a game store.

use super::debounce::DebouncedWriter;
use super::error::BuildError;
use super::GameStore;
use crate::checkpoint::CheckpointStore;
use crate::sync::{ChannelHub, DEFAULT_CHANNEL_NAME};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Quiet period before an auto-save is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Builder for a [`GameStore`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use feud::checkpoint::CheckpointSlot;
/// use feud::storage::MemoryStore;
/// use feud::store::GameStore;
/// use feud::sync::ChannelHub;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), feud::store::BuildError> {
/// let hub = ChannelHub::new();
/// let store = GameStore::builder()
///     .checkpoints(CheckpointSlot::new(MemoryStore::new()))
///     .channel(&hub)
///     .debounce(Duration::from_millis(500))
///     .build()?;
///
/// assert!(!store.has_saved_game());
/// # Ok(())
/// # }
/// ```
pub struct GameStoreBuilder {
    checkpoints: Option<Arc<dyn CheckpointStore>>,
    hub: Option<ChannelHub>,
    channel_name: String,
    debounce: Duration,
}

impl GameStoreBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            checkpoints: None,
            hub: None,
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Set the checkpoint store (required).
    pub fn checkpoints<C>(mut self, checkpoints: C) -> Self
    where
        C: CheckpointStore + 'static,
    {
        self.checkpoints = Some(Arc::new(checkpoints));
        self
    }

    /// Publish state on this hub. Without one, displays stay waiting.
    pub fn channel(mut self, hub: &ChannelHub) -> Self {
        self.hub = Some(hub.clone());
        self
    }

    /// Channel name scoping this session.
    pub fn channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    /// Quiet period before an auto-save.
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Build the store.
    /// Returns an error if required fields are missing or no runtime is
    /// available for background writes.
    pub fn build(self) -> Result<GameStore, BuildError> {
        let checkpoints = self.checkpoints.ok_or(BuildError::MissingCheckpointStore)?;
        let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime)?;

        let publisher = self.hub.map(|hub| hub.publisher(&self.channel_name));
        let writer = DebouncedWriter::new(Arc::clone(&checkpoints), self.debounce, runtime);

        Ok(GameStore::from_parts(checkpoints, publisher, writer))
    }
}

impl Default for GameStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
