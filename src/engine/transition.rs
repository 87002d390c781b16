//! Pure state transitions.
//!
//! Every function takes a snapshot by reference and returns a new one.
//! Out-of-phase or malformed input yields an unchanged clone.

use super::action::Action;
use crate::core::{GameConfig, GameState, Phase, Team, TeamData};
use uuid::Uuid;

/// Strikes that hand the round to the opposing team.
pub const MAX_STRIKES: u8 = 3;

/// Apply one action to a state.
///
/// # Example
///
/// ```rust
/// use feud::core::{Answer, GameConfig, Phase, Question};
/// use feud::engine::{create_game, transition, Action};
///
/// let config = GameConfig {
///     team1_name: "A".into(),
///     team2_name: "B".into(),
///     total_rounds: 1,
///     questions: vec![Question::new(
///         "q1",
///         "Name a fruit",
///         vec![Answer::new("a1", "Apple", 60, 1), Answer::new("a2", "Banana", 40, 2)],
///     )],
/// };
///
/// let state = create_game(&config);
/// let state = transition(&state, &Action::RevealAnswer(0));
/// let state = transition(&state, &Action::NextQuestion);
///
/// assert_eq!(state.team1.score, 60);
/// assert_eq!(state.phase, Phase::Finished);
/// ```
pub fn transition(state: &GameState, action: &Action) -> GameState {
    if !action.allowed_in(state.phase) {
        return state.clone();
    }

    match action {
        Action::RevealAnswer(index) => apply_reveal(state, *index),
        Action::AddStrike => apply_strike(state),
        Action::SwitchTeam => apply_switch(state),
        Action::AttemptSteal(index) => apply_steal(state, *index),
        Action::NextQuestion => apply_next_question(state),
        Action::EndGame => apply_end_game(state),
        Action::ResetGame(config) => reset(config.as_ref()),
        Action::RestoreGame(snapshot) => restore(snapshot),
    }
}

/// Build the opening state of a new session. Team 1 starts.
///
/// A config without questions produces a session that is already
/// finished, with zero rounds played.
pub fn create_game(config: &GameConfig) -> GameState {
    let (phase, current_round) = if config.questions.is_empty() {
        (Phase::Finished, 0)
    } else {
        (Phase::Playing, 1)
    };

    GameState {
        id: Uuid::new_v4(),
        phase,
        current_question_index: 0,
        current_round,
        total_rounds: config.total_rounds,
        team1: TeamData::new(config.team1_name.clone()),
        team2: TeamData::new(config.team2_name.clone()),
        active_team: Team::Team1,
        strikes: 0,
        revealed_answers: Vec::new(),
        round_points: 0,
        multiplier: config
            .questions
            .first()
            .map_or(1, |q| q.effective_multiplier()),
        questions: config.questions.clone(),
    }
}

/// Reveal an answer. In `playing` its points join the pot; in `scored`
/// it is shown without scoring.
pub fn reveal_answer(state: &GameState, index: usize) -> GameState {
    transition(state, &Action::RevealAnswer(index))
}

/// Record a strike; the third one opens the steal.
pub fn add_strike(state: &GameState) -> GameState {
    transition(state, &Action::AddStrike)
}

/// Flip possession and clear strikes, in any phase.
pub fn switch_team(state: &GameState) -> GameState {
    transition(state, &Action::SwitchTeam)
}

/// Resolve the steal and award the pot.
///
/// A steal succeeds iff `index` names an existing, unrevealed answer; the
/// opposing team then wins the pot including that answer. Otherwise the
/// active team keeps the pot.
pub fn attempt_steal(state: &GameState, index: Option<usize>) -> GameState {
    transition(state, &Action::AttemptSteal(index))
}

/// Close the round. From `playing` the active team banks the pot first;
/// from `scored` the pot was already awarded.
pub fn next_question(state: &GameState) -> GameState {
    transition(state, &Action::NextQuestion)
}

/// Force the session to `finished`.
pub fn end_game(state: &GameState) -> GameState {
    transition(state, &Action::EndGame)
}

/// New game from `config`, or the blank setup state without one.
pub fn reset(config: Option<&GameConfig>) -> GameState {
    match config {
        Some(config) => create_game(config),
        None => GameState::blank(),
    }
}

/// Replace the state with a checkpointed snapshot, verbatim.
pub fn restore(snapshot: &GameState) -> GameState {
    snapshot.clone()
}

fn apply_reveal(state: &GameState, index: usize) -> GameState {
    if state.is_revealed(index) {
        return state.clone();
    }
    let Some(answer) = state
        .current_question()
        .and_then(|question| question.answers.get(index))
    else {
        return state.clone();
    };

    let mut next = state.clone();
    next.revealed_answers.push(index);
    if state.phase == Phase::Playing {
        next.round_points = next.round_points.saturating_add(answer.points);
    }
    next
}

fn apply_strike(state: &GameState) -> GameState {
    let strikes = state.strikes.saturating_add(1).min(MAX_STRIKES);

    GameState {
        strikes,
        phase: if strikes >= MAX_STRIKES {
            Phase::Stealing
        } else {
            Phase::Playing
        },
        ..state.clone()
    }
}

fn apply_switch(state: &GameState) -> GameState {
    GameState {
        active_team: state.active_team.opponent(),
        strikes: 0,
        ..state.clone()
    }
}

fn apply_steal(state: &GameState, index: Option<usize>) -> GameState {
    let Some(question) = state.current_question() else {
        return state.clone();
    };

    let stolen = index.and_then(|i| {
        if state.is_revealed(i) {
            None
        } else {
            question.answers.get(i).map(|answer| (i, answer.points))
        }
    });

    let mut next = state.clone();
    let winner = match stolen {
        Some((i, points)) => {
            next.revealed_answers.push(i);
            next.round_points = next.round_points.saturating_add(points);
            state.active_team.opponent()
        }
        None => state.active_team,
    };

    award_pot(&mut next, winner);
    next.phase = Phase::Scored;
    next
}

fn apply_next_question(state: &GameState) -> GameState {
    let mut next = state.clone();
    if state.phase != Phase::Scored {
        award_pot(&mut next, state.active_team);
    }
    advance(next)
}

fn apply_end_game(state: &GameState) -> GameState {
    GameState {
        phase: Phase::Finished,
        ..state.clone()
    }
}

fn award_pot(state: &mut GameState, team: Team) {
    let points = state.round_points.saturating_mul(state.multiplier);
    let data = state.team_mut(team);
    data.score = data.score.saturating_add(points);
}

/// Move past the current question. Does not award points.
fn advance(mut state: GameState) -> GameState {
    let next_index = state.current_question_index + 1;
    let Some(question) = state.questions.get(next_index) else {
        state.phase = Phase::Finished;
        return state;
    };

    state.multiplier = question.effective_multiplier();
    state.current_question_index = next_index;
    state.current_round += 1;
    state.active_team = state.active_team.opponent();
    state.strikes = 0;
    state.revealed_answers.clear();
    state.round_points = 0;
    state.phase = Phase::Playing;
    state
}
