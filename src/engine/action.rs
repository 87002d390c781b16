//! Moderator actions and the phases that accept them.

use crate::core::{GameConfig, GameState, Guard, Phase};

/// Every input the moderator console can dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Reveal the answer at this slot of the current question.
    RevealAnswer(usize),
    /// Record a wrong answer for the active team.
    AddStrike,
    /// Hand possession to the other team and clear strikes.
    SwitchTeam,
    /// The opposing team's single steal attempt. `None` means no answer
    /// was given, which counts as a failed steal.
    AttemptSteal(Option<usize>),
    /// Close the round and move to the next question.
    NextQuestion,
    /// Administrative override: finish the session now.
    EndGame,
    /// Start over, either with a new game or back to the blank setup state.
    ResetGame(Option<GameConfig>),
    /// Replace the state with a checkpointed snapshot.
    RestoreGame(Box<GameState>),
}

impl Action {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RevealAnswer(_) => "REVEAL_ANSWER",
            Self::AddStrike => "ADD_STRIKE",
            Self::SwitchTeam => "SWITCH_TEAM",
            Self::AttemptSteal(_) => "ATTEMPT_STEAL",
            Self::NextQuestion => "NEXT_QUESTION",
            Self::EndGame => "END_GAME",
            Self::ResetGame(_) => "RESET_GAME",
            Self::RestoreGame(_) => "RESTORE_GAME",
        }
    }

    /// Phases in which this action changes the game. Outside them the
    /// engine returns the input state unchanged.
    pub fn guard(&self) -> Guard<Phase> {
        match self {
            Self::RevealAnswer(_) => Guard::one_of([Phase::Playing, Phase::Scored]),
            Self::AddStrike => Guard::one_of([Phase::Playing]),
            Self::AttemptSteal(_) => Guard::one_of([Phase::Stealing]),
            Self::NextQuestion => Guard::one_of([Phase::Playing, Phase::Scored]),
            Self::SwitchTeam | Self::EndGame | Self::ResetGame(_) | Self::RestoreGame(_) => {
                Guard::always()
            }
        }
    }

    /// Whether the action is accepted in `phase`.
    pub fn allowed_in(&self, phase: Phase) -> bool {
        self.guard().check(&phase)
    }

    /// A reset without a config returns to the blank setup state.
    pub fn is_bare_reset(&self) -> bool {
        matches!(self, Self::ResetGame(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [Phase; 5] = [
        Phase::Setup,
        Phase::Playing,
        Phase::Stealing,
        Phase::Scored,
        Phase::Finished,
    ];

    fn accepted(action: &Action) -> Vec<Phase> {
        ALL_PHASES
            .into_iter()
            .filter(|p| action.allowed_in(*p))
            .collect()
    }

    #[test]
    fn reveal_is_accepted_while_playing_or_scored() {
        assert_eq!(
            accepted(&Action::RevealAnswer(0)),
            vec![Phase::Playing, Phase::Scored]
        );
    }

    #[test]
    fn strike_is_accepted_only_while_playing() {
        assert_eq!(accepted(&Action::AddStrike), vec![Phase::Playing]);
    }

    #[test]
    fn steal_is_accepted_only_while_stealing() {
        assert_eq!(accepted(&Action::AttemptSteal(None)), vec![Phase::Stealing]);
    }

    #[test]
    fn nothing_but_overrides_run_after_finish() {
        assert!(!Action::NextQuestion.allowed_in(Phase::Finished));
        assert!(!Action::RevealAnswer(0).allowed_in(Phase::Finished));
        assert!(Action::EndGame.allowed_in(Phase::Finished));
        assert!(Action::ResetGame(None).allowed_in(Phase::Finished));
    }

    #[test]
    fn switch_team_is_never_gated() {
        assert_eq!(accepted(&Action::SwitchTeam), ALL_PHASES.to_vec());
    }

    #[test]
    fn bare_reset_is_detected() {
        assert!(Action::ResetGame(None).is_bare_reset());
        assert!(!Action::EndGame.is_bare_reset());
    }
}
