//! Middleware hooks around dispatch

use crate::Action;

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging or other cross-cutting concerns
/// to a store.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// Middleware that reports every dispatch through `tracing`
///
/// One `debug` event per action, after the reducer ran, carrying the action
/// name, its [`Action::summary`] and whether state changed. The full
/// `Debug` form of an action is never logged, so summaries decide what
/// reaches the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        tracing::trace!(action = %action.name(), "dispatching");
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        tracing::debug!(
            action = %action.name(),
            summary = %action.summary(),
            state_changed,
            "action processed"
        );
    }
}
