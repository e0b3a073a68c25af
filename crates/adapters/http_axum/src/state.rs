//! Shared application state for axum handlers.

use std::sync::Arc;

use sunswitch_app::scheduler::Scheduler;

/// Application state shared across all axum handlers.
///
/// Generic over the scheduler's solar clock, device client and wall clock
/// to avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`.
pub struct AppState<S, D, C> {
    /// The scheduler the API controls. The evaluation loop runs on the same
    /// instance.
    pub scheduler: Arc<Scheduler<S, D, C>>,
}

impl<S, D, C> Clone for AppState<S, D, C> {
    fn clone(&self) -> Self {
        Self {
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl<S, D, C> AppState<S, D, C> {
    /// Create a new application state from a scheduler instance.
    pub fn new(scheduler: Scheduler<S, D, C>) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
        }
    }

    /// Create a new application state from a scheduler shared with the
    /// background loop.
    pub fn from_arc(scheduler: Arc<Scheduler<S, D, C>>) -> Self {
        Self { scheduler }
    }
}
