//! The game store: single owner of the live session.
//!
//! The store holds the canonical [`GameState`], routes every action
//! through the pure engine, and runs the two side effects of a change:
//! publishing the snapshot to display boards and scheduling a debounced
//! checkpoint. Neither side effect can block or fail a dispatch, and a
//! failure in one never affects the other.
//!
//! There is exactly one writer. Methods that change state take
//! `&mut self`; readers get an immutable snapshot.

mod builder;
mod debounce;
mod error;

pub use builder::{GameStoreBuilder, DEFAULT_DEBOUNCE};
pub use error::{BuildError, StoreError};

use crate::checkpoint::CheckpointStore;
use crate::core::{GameResult, GameState, Phase, State};
use crate::engine::{self, Action};
use crate::persistence::QuestionRepository;
use crate::sync::ChannelPublisher;
use chrono::Utc;
use debounce::DebouncedWriter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owner of one game session's state.
pub struct GameStore {
    state: Arc<GameState>,
    publisher: Option<ChannelPublisher>,
    writer: DebouncedWriter,
    saved_game: Option<GameState>,
}

impl GameStore {
    pub fn builder() -> GameStoreBuilder {
        GameStoreBuilder::new()
    }

    pub(crate) fn from_parts(
        checkpoints: Arc<dyn CheckpointStore>,
        publisher: Option<ChannelPublisher>,
        writer: DebouncedWriter,
    ) -> Self {
        let saved_game = match checkpoints.load() {
            Ok(Some(saved)) if saved.phase != Phase::Setup => {
                info!(session = %saved.id, phase = saved.phase.name(), "resumable game found");
                Some(saved)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable checkpoint");
                None
            }
        };

        let store = Self {
            state: Arc::new(GameState::blank()),
            publisher,
            writer,
            saved_game,
        };
        store.publish();
        store
    }

    /// Current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Name of the channel boards should listen on, if publishing.
    pub fn channel_name(&self) -> Option<&str> {
        self.publisher.as_ref().map(|p| p.name())
    }

    /// Whether `action` would change anything in the current phase.
    /// Controls for rejected actions should be disabled.
    pub fn can_dispatch(&self, action: &Action) -> bool {
        action.allowed_in(self.state.phase)
    }

    /// Apply an action.
    ///
    /// The new state is computed synchronously. Publishing and the
    /// debounced checkpoint happen without blocking the caller. An action
    /// that leaves the state unchanged triggers no side effects.
    pub fn dispatch(&mut self, action: Action) {
        if action.is_bare_reset() {
            self.clear_checkpoint();
        }
        if matches!(action, Action::ResetGame(_)) && self.saved_game.take().is_some() {
            debug!("resumable game dropped by reset");
        }

        let next = engine::transition(&self.state, &action);
        debug!(
            action = action.name(),
            phase = next.phase.name(),
            round = next.current_round,
            "dispatched"
        );

        if next == *self.state {
            return;
        }
        self.log_lifecycle(&next);
        self.commit(next);
    }

    /// Whether a checkpointed game is waiting for a resume decision.
    pub fn has_saved_game(&self) -> bool {
        self.saved_game.is_some()
    }

    pub fn saved_game(&self) -> Option<&GameState> {
        self.saved_game.as_ref()
    }

    /// Resume the checkpointed game. Returns `false` if there was none.
    pub fn restore_saved_game(&mut self) -> bool {
        let Some(saved) = self.saved_game.take() else {
            return false;
        };
        info!(session = %saved.id, round = saved.current_round, "restoring saved game");
        self.dispatch(Action::RestoreGame(Box::new(saved)));
        true
    }

    /// Decline the resume prompt and forget the checkpoint.
    pub fn discard_saved_game(&mut self) {
        if self.saved_game.take().is_some() {
            info!("saved game discarded");
            self.clear_checkpoint();
        }
    }

    /// Whether an auto-save is waiting for its quiet period.
    pub fn has_pending_checkpoint(&self) -> bool {
        self.writer.is_pending()
    }

    /// Write the current state now, replacing any pending auto-save.
    /// Unlike auto-saves, failures are returned.
    pub fn checkpoint_now(&mut self) -> Result<(), StoreError> {
        self.writer.save_now(&self.state)?;
        Ok(())
    }

    /// Summary of the finished game, or `None` while it is still running.
    pub fn game_result(&self, question_set_id: &str) -> Option<GameResult> {
        GameResult::from_state(&self.state, question_set_id, Utc::now())
    }

    /// Confirm that the finished game was exported; the checkpoint is no
    /// longer needed and is cleared.
    pub fn acknowledge_export(&mut self) -> Result<(), StoreError> {
        if self.state.phase != Phase::Finished {
            return Err(StoreError::NotFinished);
        }
        self.writer.clear()?;
        info!(session = %self.state.id, "game exported; checkpoint cleared");
        Ok(())
    }

    /// Append the finished game to `repository`'s history, then clear the
    /// checkpoint. The checkpoint survives if the append fails.
    pub fn export_result(
        &mut self,
        repository: &dyn QuestionRepository,
        question_set_id: &str,
        owner: Option<&str>,
    ) -> Result<GameResult, StoreError> {
        let result = self.game_result(question_set_id).ok_or(StoreError::NotFinished)?;
        repository.append_history(&result, owner)?;
        self.acknowledge_export()?;
        Ok(result)
    }

    fn commit(&mut self, next: GameState) {
        self.state = Arc::new(next);
        self.publish();

        if self.state.phase == Phase::Setup {
            self.writer.cancel();
        } else {
            self.writer.schedule(Arc::clone(&self.state));
        }
    }

    fn publish(&self) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(Arc::clone(&self.state));
        }
    }

    fn clear_checkpoint(&mut self) {
        if let Err(err) = self.writer.clear() {
            warn!(error = %err, "failed to clear checkpoint");
        }
    }

    fn log_lifecycle(&self, next: &GameState) {
        if next.id != self.state.id {
            if next.id.is_nil() {
                info!("game reset");
            } else {
                info!(session = %next.id, rounds = next.total_rounds, "game started");
            }
        }
        if next.phase.is_final() && !self.state.phase.is_final() {
            info!(
                session = %next.id,
                team1 = next.team1.score,
                team2 = next.team2.score,
                "game finished"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{CheckpointError, CheckpointSlot};
    use crate::core::{Answer, GameConfig, Question};
    use crate::persistence::LocalRepository;
    use crate::storage::MemoryStore;
    use crate::sync::{BoardView, ChannelHub, GameBoard, DEFAULT_CHANNEL_NAME};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Checkpoint store that counts writes.
    struct Counting {
        inner: CheckpointSlot<MemoryStore>,
        saves: AtomicUsize,
        clears: AtomicUsize,
    }

    impl Default for Counting {
        fn default() -> Self {
            Self {
                inner: CheckpointSlot::new(MemoryStore::new()),
                saves: AtomicUsize::new(0),
                clears: AtomicUsize::new(0),
            }
        }
    }

    impl CheckpointStore for Counting {
        fn load(&self) -> Result<Option<GameState>, CheckpointError> {
            self.inner.load()
        }

        fn save(&self, state: &GameState) -> Result<(), CheckpointError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(state)
        }

        fn clear(&self) -> Result<(), CheckpointError> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            self.inner.clear()
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            team1_name: "A".to_string(),
            team2_name: "B".to_string(),
            total_rounds: 1,
            questions: vec![Question::new(
                "q1",
                "Name a pet",
                vec![
                    Answer::new("a1", "Dog", 40, 1),
                    Answer::new("a2", "Cat", 30, 2),
                    Answer::new("a3", "Fish", 20, 3),
                    Answer::new("a4", "Bird", 10, 4),
                ],
            )],
        }
    }

    fn store_with(checkpoints: Arc<Counting>) -> GameStore {
        GameStore::builder()
            .checkpoints(checkpoints)
            .debounce(Duration::from_secs(1))
            .build()
            .unwrap()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1500)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn new_store_starts_blank() {
        let store = store_with(Arc::default());

        assert_eq!(store.state(), &GameState::blank());
        assert!(!store.has_saved_game());
        assert!(!store.has_pending_checkpoint());
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_updates_state_synchronously() {
        let mut store = store_with(Arc::default());
        store.dispatch(Action::ResetGame(Some(config())));
        store.dispatch(Action::RevealAnswer(0));

        assert_eq!(store.state().phase, Phase::Playing);
        assert_eq!(store.state().round_points, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_dispatches_writes_once() {
        let checkpoints = Arc::new(Counting::default());
        let mut store = store_with(Arc::clone(&checkpoints));

        store.dispatch(Action::ResetGame(Some(config())));
        store.dispatch(Action::RevealAnswer(0));
        store.dispatch(Action::RevealAnswer(1));
        assert!(store.has_pending_checkpoint());
        assert_eq!(checkpoints.saves.load(Ordering::SeqCst), 0);

        settle().await;

        assert_eq!(checkpoints.saves.load(Ordering::SeqCst), 1);
        assert_eq!(checkpoints.load().unwrap().as_ref(), Some(store.state()));
        assert!(!store.has_pending_checkpoint());
    }

    #[tokio::test(start_paused = true)]
    async fn no_op_dispatch_schedules_nothing() {
        let checkpoints = Arc::new(Counting::default());
        let mut store = store_with(Arc::clone(&checkpoints));
        store.dispatch(Action::AttemptSteal(Some(0)));

        assert!(!store.has_pending_checkpoint());
        settle().await;
        assert_eq!(checkpoints.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn setup_state_is_never_checkpointed() {
        let checkpoints = Arc::new(Counting::default());
        let mut store = store_with(Arc::clone(&checkpoints));

        store.dispatch(Action::ResetGame(Some(config())));
        store.dispatch(Action::ResetGame(None));
        settle().await;

        assert_eq!(checkpoints.saves.load(Ordering::SeqCst), 0);
        assert!(checkpoints.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn bare_reset_clears_existing_checkpoint() {
        let checkpoints = Arc::new(Counting::default());
        let mut store = store_with(Arc::clone(&checkpoints));
        store.dispatch(Action::ResetGame(Some(config())));
        settle().await;
        assert!(checkpoints.load().unwrap().is_some());

        store.dispatch(Action::ResetGame(None));

        assert!(checkpoints.load().unwrap().is_none());
        assert_eq!(store.state().phase, Phase::Setup);
    }

    #[tokio::test(start_paused = true)]
    async fn saved_game_is_held_not_applied() {
        let checkpoints = Arc::new(Counting::default());
        let saved = engine::reveal_answer(&engine::create_game(&config()), 2);
        checkpoints.save(&saved).unwrap();

        let mut store = store_with(Arc::clone(&checkpoints));
        assert!(store.has_saved_game());
        assert_eq!(store.state().phase, Phase::Setup);

        assert!(store.restore_saved_game());
        assert_eq!(store.state(), &saved);
        assert!(!store.has_saved_game());
        assert!(!store.restore_saved_game());
    }

    #[tokio::test(start_paused = true)]
    async fn saved_setup_state_is_not_offered() {
        let checkpoints = Arc::new(Counting::default());
        checkpoints.save(&GameState::blank()).unwrap();

        let store = store_with(checkpoints);
        assert!(!store.has_saved_game());
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_checkpoint_is_ignored() {
        let storage = MemoryStore::new();
        crate::storage::KeyValueStore::set(&storage, crate::checkpoint::CURRENT_GAME_KEY, "garbage")
            .unwrap();

        let store = GameStore::builder()
            .checkpoints(CheckpointSlot::new(storage))
            .build()
            .unwrap();
        assert!(!store.has_saved_game());
    }

    #[tokio::test(start_paused = true)]
    async fn discard_forgets_saved_game() {
        let checkpoints = Arc::new(Counting::default());
        checkpoints.save(&engine::create_game(&config())).unwrap();

        let mut store = store_with(Arc::clone(&checkpoints));
        store.discard_saved_game();

        assert!(!store.has_saved_game());
        assert!(checkpoints.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn auto_save_failure_keeps_playing() {
        let mut store = GameStore::builder()
            .checkpoints(CheckpointSlot::new(MemoryStore::with_quota(8)))
            .build()
            .unwrap();

        store.dispatch(Action::ResetGame(Some(config())));
        settle().await;
        store.dispatch(Action::RevealAnswer(0));

        assert_eq!(store.state().round_points, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_checkpoint_failure_is_returned() {
        let mut store = GameStore::builder()
            .checkpoints(CheckpointSlot::new(MemoryStore::with_quota(8)))
            .build()
            .unwrap();
        store.dispatch(Action::ResetGame(Some(config())));

        assert!(matches!(store.checkpoint_now(), Err(StoreError::Checkpoint(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn checkpoint_now_replaces_pending_write() {
        let checkpoints = Arc::new(Counting::default());
        let mut store = store_with(Arc::clone(&checkpoints));
        store.dispatch(Action::ResetGame(Some(config())));

        store.checkpoint_now().unwrap();
        settle().await;

        assert_eq!(checkpoints.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn export_appends_history_and_clears_checkpoint() {
        let checkpoints = Arc::new(Counting::default());
        let repository = LocalRepository::new(MemoryStore::new());
        let mut store = store_with(Arc::clone(&checkpoints));
        store.dispatch(Action::ResetGame(Some(config())));
        store.dispatch(Action::RevealAnswer(0));
        store.dispatch(Action::NextQuestion);
        store.checkpoint_now().unwrap();

        let result = store.export_result(&repository, "set-1", None).unwrap();

        assert_eq!(result.team1.score, 40);
        assert_eq!(repository.list_history(None).unwrap(), vec![result]);
        assert!(checkpoints.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn export_before_finish_is_rejected() {
        let repository = LocalRepository::new(MemoryStore::new());
        let mut store = store_with(Arc::default());
        store.dispatch(Action::ResetGame(Some(config())));

        assert!(matches!(
            store.export_result(&repository, "set-1", None),
            Err(StoreError::NotFinished)
        ));
        assert!(matches!(store.acknowledge_export(), Err(StoreError::NotFinished)));
    }

    #[tokio::test(start_paused = true)]
    async fn board_mirrors_every_change() {
        let hub = ChannelHub::new();
        let mut board = GameBoard::connect(&hub, DEFAULT_CHANNEL_NAME);
        let mut store = GameStore::builder()
            .checkpoints(CheckpointSlot::new(MemoryStore::new()))
            .channel(&hub)
            .build()
            .unwrap();

        assert!(board.poll());
        assert_eq!(board.view(), BoardView::Showing(&GameState::blank()));

        store.dispatch(Action::ResetGame(Some(config())));
        store.dispatch(Action::RevealAnswer(3));
        assert!(board.poll());
        assert_eq!(board.state(), Some(store.state()));
    }

    #[tokio::test(start_paused = true)]
    async fn store_without_channel_leaves_board_waiting() {
        let hub = ChannelHub::new();
        let mut board = GameBoard::connect(&hub, DEFAULT_CHANNEL_NAME);
        let mut store = store_with(Arc::default());

        store.dispatch(Action::ResetGame(Some(config())));

        assert!(!board.poll());
        assert_eq!(board.view(), BoardView::Waiting);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_store_cancels_pending_write() {
        let checkpoints = Arc::new(Counting::default());
        let mut store = store_with(Arc::clone(&checkpoints));
        store.dispatch(Action::ResetGame(Some(config())));
        drop(store);

        settle().await;
        assert_eq!(checkpoints.saves.load(Ordering::SeqCst), 0);
    }

    /// Checkpoint store whose saves take a while and can be observed
    /// in progress.
    struct SlowSave {
        inner: CheckpointSlot<MemoryStore>,
        started: std::sync::atomic::AtomicBool,
    }

    impl CheckpointStore for SlowSave {
        fn load(&self) -> Result<Option<GameState>, CheckpointError> {
            self.inner.load()
        }

        fn save(&self, state: &GameState) -> Result<(), CheckpointError> {
            self.started.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            self.inner.save(state)
        }

        fn clear(&self) -> Result<(), CheckpointError> {
            self.inner.clear()
        }
    }

    async fn wait_for_save_to_start(checkpoints: &SlowSave) {
        while !checkpoints.started.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    fn slow_store(checkpoints: &Arc<SlowSave>) -> GameStore {
        GameStore::builder()
            .checkpoints(Arc::clone(checkpoints))
            .debounce(Duration::from_millis(1))
            .build()
            .unwrap()
    }

    fn slow_save() -> Arc<SlowSave> {
        Arc::new(SlowSave {
            inner: CheckpointSlot::new(MemoryStore::new()),
            started: std::sync::atomic::AtomicBool::new(false),
        })
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn bare_reset_outlasts_save_in_progress() {
        let checkpoints = slow_save();
        let mut store = slow_store(&checkpoints);

        store.dispatch(Action::ResetGame(Some(config())));
        wait_for_save_to_start(&checkpoints).await;
        store.dispatch(Action::ResetGame(None));
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(checkpoints.load().unwrap().is_none());
        drop(store);
        assert!(!slow_store(&checkpoints).has_saved_game());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn acknowledged_export_outlasts_save_in_progress() {
        let checkpoints = slow_save();
        let mut store = slow_store(&checkpoints);

        store.dispatch(Action::ResetGame(Some(config())));
        store.dispatch(Action::EndGame);
        wait_for_save_to_start(&checkpoints).await;
        store.acknowledge_export().unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(checkpoints.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn can_dispatch_follows_phase() {
        let mut store = store_with(Arc::default());
        assert!(!store.can_dispatch(&Action::AddStrike));

        store.dispatch(Action::ResetGame(Some(config())));
        assert!(store.can_dispatch(&Action::AddStrike));
        assert!(!store.can_dispatch(&Action::AttemptSteal(None)));
    }
}
