//! Game session data: teams, the canonical state snapshot, and results.
//!
//! `GameState` is an immutable value as far as the engine is concerned.
//! Every transition returns a fresh snapshot, so any number of readers
//! (moderator UI, display broadcast, checkpoint writer) can hold one
//! without coordination.

use super::question::Question;
use super::state::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Team identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Team1,
    Team2,
}

impl Team {
    /// The other team.
    pub fn opponent(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }
}

/// A team's name and running score.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TeamData {
    pub name: String,
    pub score: u32,
}

impl TeamData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }
}

/// Everything needed to start a fresh session.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub team1_name: String,
    pub team2_name: String,
    pub total_rounds: u32,
    pub questions: Vec<Question>,
}

/// Canonical, versionless snapshot of a game session.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Session identifier; nil before a game is created.
    pub id: Uuid,
    pub phase: Phase,
    /// 0-based pointer into `questions`.
    pub current_question_index: usize,
    /// 1-based round counter.
    pub current_round: u32,
    pub total_rounds: u32,
    pub team1: TeamData,
    pub team2: TeamData,
    pub active_team: Team,
    /// Faults in the current round, 0..=3.
    pub strikes: u8,
    /// Revealed answer slots of the current question, in reveal order.
    pub revealed_answers: Vec<usize>,
    /// Pot of the current round, before multiplier and assignment.
    pub round_points: u32,
    pub multiplier: u32,
    pub questions: Vec<Question>,
}

impl GameState {
    /// Blank `setup` state shown before any game starts.
    pub fn blank() -> Self {
        Self {
            id: Uuid::nil(),
            phase: Phase::Setup,
            current_question_index: 0,
            current_round: 1,
            total_rounds: 5,
            team1: TeamData::new("Team 1"),
            team2: TeamData::new("Team 2"),
            active_team: Team::Team1,
            strikes: 0,
            revealed_answers: Vec::new(),
            round_points: 0,
            multiplier: 1,
            questions: Vec::new(),
        }
    }

    /// Question in play, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn team(&self, team: Team) -> &TeamData {
        match team {
            Team::Team1 => &self.team1,
            Team::Team2 => &self.team2,
        }
    }

    pub(crate) fn team_mut(&mut self, team: Team) -> &mut TeamData {
        match team {
            Team::Team1 => &mut self.team1,
            Team::Team2 => &mut self.team2,
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed_answers.contains(&index)
    }

    /// Team with the higher score; `None` on a tie.
    pub fn leader(&self) -> Option<Team> {
        use std::cmp::Ordering;

        match self.team1.score.cmp(&self.team2.score) {
            Ordering::Greater => Some(Team::Team1),
            Ordering::Less => Some(Team::Team2),
            Ordering::Equal => None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::blank()
    }
}

/// Outcome of a finished match.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Team1,
    Team2,
    Draw,
}

impl From<Option<Team>> for Winner {
    fn from(team: Option<Team>) -> Self {
        match team {
            Some(Team::Team1) => Self::Team1,
            Some(Team::Team2) => Self::Team2,
            None => Self::Draw,
        }
    }
}

/// Terminal summary of a finished session, handed to history persistence.
///
/// Created once and never mutated.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: Uuid,
    pub team1: TeamData,
    pub team2: TeamData,
    pub winner: Winner,
    pub total_rounds: u32,
    pub completed_at: DateTime<Utc>,
    /// Question set the session was played from.
    pub question_set_id: String,
}

impl GameResult {
    /// Summarize a finished state. Returns `None` unless the phase is
    /// `finished`.
    pub fn from_state(
        state: &GameState,
        question_set_id: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) -> Option<Self> {
        if state.phase != Phase::Finished {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4(),
            team1: state.team1.clone(),
            team2: state.team2.clone(),
            winner: state.leader().into(),
            total_rounds: state.total_rounds,
            completed_at,
            question_set_id: question_set_id.into(),
        })
    }
}
