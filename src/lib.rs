//! Feud: the game core of a two-screen survey trivia game.
//!
//! A moderator drives the game from a control console while any number of
//! passive boards mirror it. Game logic is a pure function from state and
//! action to a new state; everything with side effects lives in a thin
//! shell around it.
//!
//! # Core Concepts
//!
//! - **Engine**: `transition(&state, &action)` with phase-gated actions
//! - **Store**: single owner of the live state; publishes and checkpoints
//! - **Sync**: full-snapshot broadcast to display boards, last write wins
//! - **Checkpoint**: one debounced slot per device for crash recovery
//! - **Persistence**: question sets and match history, local or database
//!
//! # Example
//!
//! ```rust
//! use feud::checkpoint::CheckpointSlot;
//! use feud::engine::Action;
//! use feud::persistence::demo_config;
//! use feud::storage::MemoryStore;
//! use feud::store::GameStore;
//! use feud::sync::{BoardView, ChannelHub, GameBoard, DEFAULT_CHANNEL_NAME};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hub = ChannelHub::new();
//! let mut board = GameBoard::connect(&hub, DEFAULT_CHANNEL_NAME);
//! let mut store = GameStore::builder()
//!     .checkpoints(CheckpointSlot::new(MemoryStore::new()))
//!     .channel(&hub)
//!     .build()?;
//!
//! store.dispatch(Action::ResetGame(Some(demo_config("Red", "Blue"))));
//! store.dispatch(Action::RevealAnswer(0));
//!
//! board.poll();
//! match board.view() {
//!     BoardView::Showing(state) => assert_eq!(state.round_points, 38),
//!     BoardView::Waiting => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod sync;

pub use crate::core::{GameConfig, GameResult, GameState, Phase, Team};
pub use engine::{transition, Action};
pub use store::GameStore;
