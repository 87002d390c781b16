//! Core game types.
//!
//! This module contains the pure data of the game:
//! - Phases via the `State` trait
//! - Guard predicates for phase gating
//! - Questions, teams, the `GameState` snapshot, and results
//!
//! Nothing in this module performs I/O.

mod game;
mod guard;
mod question;
mod state;

pub use game::{GameConfig, GameResult, GameState, Team, TeamData, Winner};
pub use guard::Guard;
pub use question::{Answer, Question, QuestionSet, QuestionSetSummary};
pub use state::{Phase, State};
