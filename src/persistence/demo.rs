//! Built-in question set for playing without an account.

use crate::core::{Answer, GameConfig, Question, QuestionSet};
use chrono::{DateTime, Utc};

pub const DEMO_SET_ID: &str = "demo-set-001";

/// Answers are ranked by popularity and each question totals 100 points.
pub fn demo_question_set() -> QuestionSet {
    let created_at = DateTime::<Utc>::from_timestamp(1_767_225_600, 0).unwrap_or_default();

    QuestionSet {
        id: DEMO_SET_ID.to_string(),
        title: "Survey Says - Demo".to_string(),
        description: Some("Sample questions to play without creating an account".to_string()),
        is_public: true,
        questions: vec![
            question(
                "q01",
                "What is the first thing you do after waking up?",
                &[
                    ("Check my phone", 38),
                    ("Go to the bathroom", 27),
                    ("Make coffee", 18),
                    ("Exercise", 10),
                    ("Eat breakfast", 7),
                ],
            ),
            question(
                "q02",
                "Name something people bring to the beach",
                &[
                    ("Towel", 30),
                    ("Sunscreen", 25),
                    ("Umbrella", 20),
                    ("Cooler", 15),
                    ("Sunglasses", 10),
                ],
            ),
            question(
                "q03",
                "What do people do when they can't sleep?",
                &[
                    ("Look at their phone", 32),
                    ("Watch TV", 24),
                    ("Count sheep", 18),
                    ("Drink warm milk", 13),
                    ("Read a book", 9),
                    ("Toss and turn", 4),
                ],
            ),
            question(
                "q04",
                "Name a reason you might be late for work",
                &[
                    ("Traffic", 41),
                    ("Overslept", 29),
                    ("Car trouble", 14),
                    ("Kids", 10),
                    ("Weather", 6),
                ],
            )
            .with_multiplier(2),
        ],
        user_id: None,
        created_at,
        updated_at: created_at,
    }
}

/// Config for a full game over the demo set.
pub fn demo_config(team1_name: impl Into<String>, team2_name: impl Into<String>) -> GameConfig {
    let set = demo_question_set();
    GameConfig {
        team1_name: team1_name.into(),
        team2_name: team2_name.into(),
        total_rounds: set.questions.len() as u32,
        questions: set.questions,
    }
}

fn question(id: &str, text: &str, answers: &[(&str, u32)]) -> Question {
    let answers = answers
        .iter()
        .zip(1u32..)
        .map(|((text, points), rank)| Answer::new(format!("{id}-a{rank}"), *text, *points, rank))
        .collect();
    Question::new(id, text, answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_question_totals_one_hundred() {
        for question in demo_question_set().questions {
            assert_eq!(question.total_points(), 100, "{}", question.id);
        }
    }

    #[test]
    fn answers_are_ranked_by_points() {
        for question in demo_question_set().questions {
            let ranks: Vec<u32> = question.answers.iter().map(|a| a.order_index).collect();
            let expected: Vec<u32> = (1..=question.answers.len() as u32).collect();
            assert_eq!(ranks, expected);
            assert!(question.answers.windows(2).all(|w| w[0].points >= w[1].points));
        }
    }

    #[test]
    fn demo_config_uses_every_question() {
        let config = demo_config("Red", "Blue");
        assert_eq!(config.total_rounds, 4);
        assert_eq!(config.questions.len(), 4);
        assert_eq!(config.team1_name, "Red");
    }
}
