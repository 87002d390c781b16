//! Guard predicates for gating transitions by phase.
//!
//! Guards are pure boolean functions that decide whether an action may
//! change the game. An action whose guard rejects the current phase is a
//! silent no-op, never an error.

use super::state::State;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use feud::core::{Guard, Phase};
///
/// let can_reveal = Guard::one_of([Phase::Playing, Phase::Scored]);
///
/// assert!(can_reveal.check(&Phase::Playing));
/// assert!(can_reveal.check(&Phase::Scored));
/// assert!(!can_reveal.check(&Phase::Stealing));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State + 'static> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that passes for any of the listed states.
    pub fn one_of<I>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let allowed: Vec<S> = states.into_iter().collect();
        Self::new(move |state| allowed.contains(state))
    }

    /// Guard that passes for every state.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Check if the guard allows transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}
