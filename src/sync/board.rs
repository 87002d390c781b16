//! The passive display board.

use super::{ChannelHub, ChannelMessage};
use crate::core::GameState;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

/// What a board should render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoardView<'a> {
    /// No snapshot received yet; show "waiting for the control panel".
    Waiting,
    /// Render this snapshot.
    Showing(&'a GameState),
}

/// Read-only mirror of the moderator's state.
///
/// A board cannot dispatch: it only overwrites its local copy with each
/// snapshot it receives.
#[derive(Debug)]
pub struct GameBoard {
    receiver: Option<broadcast::Receiver<ChannelMessage>>,
    latest: Option<Arc<GameState>>,
}

impl GameBoard {
    /// Start listening on channel `name`.
    pub fn connect(hub: &ChannelHub, name: &str) -> Self {
        Self {
            receiver: Some(hub.subscribe(name)),
            latest: None,
        }
    }

    /// Board for an environment without a broadcast channel. It stays in
    /// [`BoardView::Waiting`] forever.
    pub fn detached() -> Self {
        Self {
            receiver: None,
            latest: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn view(&self) -> BoardView<'_> {
        match &self.latest {
            Some(state) => BoardView::Showing(state),
            None => BoardView::Waiting,
        }
    }

    /// Latest snapshot received, if any.
    pub fn state(&self) -> Option<&GameState> {
        self.latest.as_deref()
    }

    /// Apply every message already queued, keeping only the newest.
    /// Returns whether the board changed.
    pub fn poll(&mut self) -> bool {
        let mut updated = false;
        while let Some(receiver) = self.receiver.as_mut() {
            match receiver.try_recv() {
                Ok(message) => {
                    self.apply(message);
                    updated = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "board lagged; skipping to newer snapshots");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    self.receiver = None;
                }
            }
        }
        updated
    }

    /// Wait for the next snapshot. Returns `false` once the channel is
    /// gone (or was never there); the board keeps its last state.
    pub async fn changed(&mut self) -> bool {
        loop {
            let Some(receiver) = self.receiver.as_mut() else {
                return false;
            };
            match receiver.recv().await {
                Ok(message) => {
                    self.apply(message);
                    self.poll();
                    return true;
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "board lagged; skipping to newer snapshots");
                }
                Err(RecvError::Closed) => {
                    self.receiver = None;
                    return false;
                }
            }
        }
    }

    fn apply(&mut self, message: ChannelMessage) {
        let ChannelMessage::StateUpdate { state } = message;
        self.latest = Some(state);
    }
}
