//! Dispatch runtime for the skycast client
//!
//! A small Redux/Elm-style core: state lives in a store and changes only
//! through a reducer, and asynchronous work is declared as effects that the
//! owner of the store turns into keyed tasks.
//!
//! # Async pattern
//!
//! 1. **Intent actions** (`SearchSubmit`) make the reducer return an effect.
//! 2. The owner spawns the effect on a [`TaskManager`] under a [`TaskKey`].
//! 3. The task resolves to a **result action** (`SearchDidLoad`,
//!    `SearchDidError`) wrapped in a [`Completion`].
//! 4. [`TaskManager::finish`] lets the result through only if no newer
//!    task replaced it, and the result is dispatched like any other action.
//!
//! The `Did*` naming convention marks result actions.

pub mod action;
pub mod effect;
pub mod store;
pub mod tasks;

pub use action::Action;
pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
pub use store::{LoggingMiddleware, Middleware};
pub use tasks::{Completion, Generation, TaskKey, TaskManager};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
    pub use crate::store::{LoggingMiddleware, Middleware};
    pub use crate::tasks::{Completion, Generation, TaskKey, TaskManager};
}
