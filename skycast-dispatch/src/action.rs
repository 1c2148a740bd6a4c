//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions represent intents to change state, or the results of async work
/// coming back. They should be:
/// - Clone: Actions may be logged or replayed
/// - Debug: For debugging and logging
/// - Send + 'static: Results are produced on spawned tasks
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;

    /// One-line description used by [`LoggingMiddleware`](crate::LoggingMiddleware).
    ///
    /// Override to keep data-heavy actions short in the logs.
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
