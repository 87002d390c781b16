//! Questions, surveyed answers, and question sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A surveyed answer on the board.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub text: String,
    /// Points awarded for this answer.
    pub points: u32,
    /// Rank in the survey, 1 = most popular.
    pub order_index: u32,
}

impl Answer {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        points: u32,
        order_index: u32,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            points,
            order_index,
        }
    }
}

/// A question read aloud, with its answers ordered by rank.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answers: Vec<Answer>,
    /// Bonus multiplier for this question; `None` means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answers,
            multiplier: None,
        }
    }

    /// Set the per-question multiplier.
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Multiplier that applies when this question is in play.
    pub fn effective_multiplier(&self) -> u32 {
        self.multiplier.unwrap_or(1)
    }

    /// Sum of all answer points on the board.
    pub fn total_points(&self) -> u32 {
        self.answers.iter().map(|a| a.points).sum()
    }
}

/// Questions grouped under one theme or episode.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub questions: Vec<Question>,
    /// Owning user; `None` for demo or public sets.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionSet {
    /// Listing view without answers.
    pub fn summary(&self) -> QuestionSetSummary {
        QuestionSetSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            is_public: self.is_public,
            question_count: self.questions.len(),
            user_id: self.user_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Summary of a question set for pickers and listings.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSetSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub question_count: usize,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
