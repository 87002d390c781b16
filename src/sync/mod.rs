//! Cross-surface sync: pushes full state snapshots from the moderator
//! console to any number of passive display boards.
//!
//! The protocol is push, at most once per change, last write wins. Each
//! message carries the whole [`GameState`], so a board that misses an
//! update converges on the next one. There are no acknowledgements and a
//! publisher never learns whether anyone was listening.

mod board;

pub use board::{BoardView, GameBoard};

use crate::core::GameState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::trace;

/// Channel name that scopes one game session.
pub const DEFAULT_CHANNEL_NAME: &str = "feud-game-state";

/// Messages buffered per listener before the slowest one starts skipping.
const CHANNEL_CAPACITY: usize = 16;

/// Envelope posted on the channel.
///
/// Serializes as `{"type":"STATE_UPDATE","state":{...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelMessage {
    StateUpdate { state: Arc<GameState> },
}

impl ChannelMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Same-process registry of named broadcast channels.
///
/// Cloning the hub shares the registry: a publisher and a board opened on
/// the same name from any clone talk to each other.
#[derive(Clone, Debug, Default)]
pub struct ChannelHub {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<ChannelMessage>>>>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishing end of the channel `name`.
    pub fn publisher(&self, name: &str) -> ChannelPublisher {
        ChannelPublisher {
            name: name.to_string(),
            sender: self.sender(name),
        }
    }

    /// Listening end of the channel `name`. Only messages posted after
    /// this call are received.
    pub fn subscribe(&self, name: &str) -> broadcast::Receiver<ChannelMessage> {
        self.sender(name).subscribe()
    }

    fn sender(&self, name: &str) -> broadcast::Sender<ChannelMessage> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .entry(name.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

/// Posts state snapshots on one named channel.
#[derive(Clone, Debug)]
pub struct ChannelPublisher {
    name: String,
    sender: broadcast::Sender<ChannelMessage>,
}

impl ChannelPublisher {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Best-effort publish. Never blocks and never fails: with no board
    /// listening the message is simply dropped.
    pub fn publish(&self, state: Arc<GameState>) {
        let message = ChannelMessage::StateUpdate { state };
        match self.sender.send(message) {
            Ok(listeners) => trace!(channel = %self.name, listeners, "state published"),
            Err(_) => trace!(channel = %self.name, "state published with no listeners"),
        }
    }

    /// Number of boards currently listening.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
