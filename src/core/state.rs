//! Core State trait and the game's phase machine.
//!
//! Phases are the discrete stages of a round. The trait provides pure
//! methods for inspecting a phase without side effects.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure - no side effects.
///
/// # Required Traits
///
/// - `Clone`: states are copied into every snapshot
/// - `PartialEq`: states are compared by phase guards
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states travel in checkpoints and broadcasts
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Discrete stage of a game session.
///
/// ```text
/// setup --create--> playing --3rd strike--> stealing --steal--> scored
///                     |  ^                                        |
///                     |  +------------- next question ------------+
///                     +--- next question (last) ---> finished <---+
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No active session.
    #[default]
    Setup,
    /// The active team is answering.
    Playing,
    /// The opposing team has one attempt to steal the pot.
    Stealing,
    /// Steal resolved; remaining answers may be shown without scoring.
    Scored,
    /// Session complete.
    Finished,
}

impl State for Phase {
    fn name(&self) -> &str {
        match self {
            Self::Setup => "setup",
            Self::Playing => "playing",
            Self::Stealing => "stealing",
            Self::Scored => "scored",
            Self::Finished => "finished",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Finished)
    }
}
