//! Debounced checkpoint writes.

use crate::checkpoint::{CheckpointError, CheckpointStore};
use crate::core::GameState;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Checkpoint store plus the generation of the latest scheduled write.
///
/// Every write and clear happens under `generation`. A background write
/// only lands if no cancel, clear or newer schedule bumped the generation
/// while it slept.
struct Slot {
    checkpoints: Arc<dyn CheckpointStore>,
    generation: Mutex<u64>,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Collapses bursts of state changes into one checkpoint write after a
/// quiet period. Each schedule cancels the pending write; dropping the
/// writer cancels it too, so no write outlives the store.
pub(crate) struct DebouncedWriter {
    slot: Arc<Slot>,
    delay: Duration,
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    pub(crate) fn new(
        checkpoints: Arc<dyn CheckpointStore>,
        delay: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            slot: Arc::new(Slot {
                checkpoints,
                generation: Mutex::new(0),
            }),
            delay,
            runtime,
            pending: None,
        }
    }

    /// Write `state` once `delay` passes without another schedule.
    pub(crate) fn schedule(&mut self, state: Arc<GameState>) {
        let generation = self.invalidate();

        let slot = Arc::clone(&self.slot);
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let current = slot.lock();
            if *current != generation {
                return;
            }
            match slot.checkpoints.save(&state) {
                Ok(()) => debug!(session = %state.id, phase = ?state.phase, "checkpoint saved"),
                Err(err) => warn!(error = %err, "auto-save failed; continuing in memory"),
            }
        }));
    }

    /// Drop the pending write. Waits for a write already in progress.
    pub(crate) fn cancel(&mut self) {
        self.invalidate();
    }

    /// Write `state` now, superseding any pending write.
    pub(crate) fn save_now(&mut self, state: &GameState) -> Result<(), CheckpointError> {
        self.exclusive(|checkpoints| checkpoints.save(state))
    }

    /// Forget the checkpoint. No earlier write can land afterwards.
    pub(crate) fn clear(&mut self) -> Result<(), CheckpointError> {
        self.exclusive(|checkpoints| checkpoints.clear())
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn exclusive<T>(&mut self, op: impl FnOnce(&dyn CheckpointStore) -> T) -> T {
        self.abort();
        let mut generation = self.slot.lock();
        *generation += 1;
        op(self.slot.checkpoints.as_ref())
    }

    fn invalidate(&mut self) -> u64 {
        self.abort();
        let mut generation = self.slot.lock();
        *generation += 1;
        *generation
    }

    fn abort(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        self.cancel();
    }
}
