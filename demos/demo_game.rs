//! Demo Game
//!
//! This example plays the built-in demo question set from the moderator's
//! console while a display board mirrors every change.
//!
//! Key concepts:
//! - One store owns the game; the board only listens
//! - Out-of-phase actions are ignored, not errors
//! - The finished game is exported to history and its checkpoint cleared
//!
//! Run with: cargo run --example demo_game

use feud::checkpoint::{CheckpointSlot, CheckpointStore};
use feud::core::{GameState, State, Winner};
use feud::engine::Action;
use feud::persistence::{demo_config, LocalRepository, QuestionRepository, DEMO_SET_ID};
use feud::storage::MemoryStore;
use feud::store::GameStore;
use feud::sync::{BoardView, ChannelHub, GameBoard, DEFAULT_CHANNEL_NAME};
use std::sync::Arc;

fn render(board: &GameBoard) {
    match board.view() {
        BoardView::Waiting => println!("  [Board] Waiting for the control panel..."),
        BoardView::Showing(state) => println!("  [Board] {}", summary(state)),
    }
}

fn summary(state: &GameState) -> String {
    let question = state
        .current_question()
        .map(|q| q.text.as_str())
        .unwrap_or("-");
    format!(
        "round {}/{} | {} | {} {} - {} {} | pot {} x{} | strikes {}\n          Q: {}",
        state.current_round,
        state.total_rounds,
        state.phase.name(),
        state.team1.name,
        state.team1.score,
        state.team2.score,
        state.team2.name,
        state.round_points,
        state.multiplier,
        state.strikes,
        question,
    )
}

fn play(store: &mut GameStore, board: &mut GameBoard, label: &str, action: Action) {
    println!("\n> {label}");
    store.dispatch(action);
    board.poll();
    render(board);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Survey Says: demo game ===");

    let hub = ChannelHub::new();
    let checkpoints = Arc::new(CheckpointSlot::new(MemoryStore::new()));
    let history = LocalRepository::new(MemoryStore::new());

    let mut board = GameBoard::connect(&hub, DEFAULT_CHANNEL_NAME);
    render(&board);

    let mut store = GameStore::builder()
        .checkpoints(Arc::clone(&checkpoints))
        .channel(&hub)
        .build()?;
    board.poll();

    let moves = [
        ("New game: Red vs Blue", Action::ResetGame(Some(demo_config("Red", "Blue")))),
        ("Red says \"Check my phone\"", Action::RevealAnswer(0)),
        ("Red says \"Make coffee\"", Action::RevealAnswer(2)),
        ("Red misses", Action::AddStrike),
        ("Steal attempt before three strikes (ignored)", Action::AttemptSteal(Some(1))),
        ("Red banks the pot", Action::NextQuestion),
        ("Blue misses", Action::AddStrike),
        ("Blue misses", Action::AddStrike),
        ("Blue misses", Action::AddStrike),
        ("Red steals with \"Towel\"", Action::AttemptSteal(Some(0))),
        ("Show \"Sunscreen\" for fun", Action::RevealAnswer(1)),
        ("Next question", Action::NextQuestion),
        ("Red says \"Watch TV\"", Action::RevealAnswer(1)),
        ("Red banks the pot", Action::NextQuestion),
        ("Blue says \"Traffic\" on the double round", Action::RevealAnswer(0)),
        ("Blue banks the pot", Action::NextQuestion),
    ];
    for (label, action) in moves {
        play(&mut store, &mut board, label, action);
    }

    store.checkpoint_now()?;
    println!(
        "\nCheckpoint present before export: {}",
        checkpoints.load()?.is_some()
    );

    let result = store.export_result(&history, DEMO_SET_ID, None)?;
    let winner = match result.winner {
        Winner::Team1 => result.team1.name.as_str(),
        Winner::Team2 => result.team2.name.as_str(),
        Winner::Draw => "nobody (draw)",
    };
    println!("Winner: {winner}");
    println!("Games in history: {}", history.list_history(None)?.len());
    println!(
        "Checkpoint present after export: {}",
        checkpoints.load()?.is_some()
    );

    Ok(())
}
