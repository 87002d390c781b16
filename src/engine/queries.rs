//! Side-effect-free reads over game data.

use crate::core::{Answer, GameState, Team};

/// Sum of points for the revealed slots. Unknown slots count as zero.
pub fn calculate_round_score(answers: &[Answer], revealed: &[usize]) -> u32 {
    revealed
        .iter()
        .filter_map(|&i| answers.get(i))
        .map(|a| a.points)
        .sum()
}

/// Team with the higher final score; `None` on a tie.
pub fn match_winner(state: &GameState) -> Option<Team> {
    state.leader()
}

/// Whether the session has reached `finished`.
pub fn is_game_over(state: &GameState) -> bool {
    state.phase == crate::core::Phase::Finished
}
