//! The game engine: a pure, deterministic mapping `(GameState, Action) -> GameState`.
//!
//! # Round flow
//!
//! 1. `playing`: the active team names answers; the moderator reveals them.
//! 2. `playing`: wrong answers are recorded as strikes.
//! 3. `stealing`: after three strikes the opposing team gets one attempt.
//! 4. `scored`: the steal is resolved and the pot awarded; remaining
//!    answers may still be revealed for show.
//! 5. `next question` starts the following round with possession flipped,
//!    or finishes the session after the last question.
//!
//! No function here performs I/O or mutates its input. Invalid actions for
//! the current phase return the state unchanged.

mod action;
mod queries;
mod transition;

pub use action::Action;
pub use queries::{calculate_round_score, is_game_over, match_winner};
pub use transition::{
    add_strike, attempt_steal, create_game, end_game, next_question, reset, restore,
    reveal_answer, switch_team, transition, MAX_STRIKES,
};
