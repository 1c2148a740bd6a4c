//! Keyed async tasks with generation tracking
//!
//! Every spawn is stamped with a fresh [`Generation`]. A task's output comes
//! back as a [`Completion`] carrying the key and generation it was started
//! with, and [`TaskManager::finish`] only hands the action back if that
//! generation is still the live one for the key. Anything superseded or
//! cancelled in the meantime is dropped there, even if the task already
//! finished and its completion was sitting in the channel.
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(tx);
//!
//! tasks.spawn("search", async { Action::SearchDidLoad(fetch("Oslo").await) });
//! tasks.spawn("search", async { Action::SearchDidLoad(fetch("Rome").await) });
//!
//! while let Some(completion) = rx.recv().await {
//!     if let Some(action) = tasks.finish(completion) {
//!         // only the "Rome" result gets here
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Action;

/// Identifies a task for cancellation and replacement.
///
/// Tasks with the same key are mutually exclusive: spawning a new task under
/// a key that is still running cancels the old one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invocation stamp handed out by [`TaskManager::spawn`].
///
/// Generations increase monotonically across all keys of one manager.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Generation(u64);

/// Output of a finished task, tagged with what started it.
#[derive(Debug)]
pub struct Completion<A> {
    pub key: TaskKey,
    pub generation: Generation,
    pub action: A,
}

struct Running {
    generation: Generation,
    handle: AbortHandle,
}

/// Manages async task lifecycle with automatic cancellation.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, Running>,
    last_generation: u64,
    completion_tx: mpsc::UnboundedSender<Completion<A>>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    /// Create a new task manager.
    ///
    /// Completions are sent on `completion_tx` and should be fed back
    /// through [`finish`](Self::finish).
    pub fn new(completion_tx: mpsc::UnboundedSender<Completion<A>>) -> Self {
        Self {
            tasks: HashMap::new(),
            last_generation: 0,
            completion_tx,
        }
    }

    /// Spawn a task, cancelling any existing task with the same key.
    ///
    /// Returns the generation the new task runs under.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> Generation
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        self.last_generation += 1;
        let generation = Generation(self.last_generation);

        let tx = self.completion_tx.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            // Receiver gone means the owner was torn down.
            let _ = tx.send(Completion {
                key: task_key,
                generation,
                action,
            });
        });

        tracing::trace!(task = %key, generation = generation.0, "task spawned");
        self.tasks.insert(
            key,
            Running {
                generation,
                handle: handle.abort_handle(),
            },
        );
        generation
    }

    /// Accept a completion, returning its action only if it is still current.
    ///
    /// A current completion also retires the task, so `is_running` turns
    /// false for its key.
    pub fn finish(&mut self, completion: Completion<A>) -> Option<A> {
        if !self.is_current(&completion.key, completion.generation) {
            tracing::debug!(
                task = %completion.key,
                generation = completion.generation.0,
                "discarding stale completion"
            );
            return None;
        }
        self.tasks.remove(&completion.key);
        Some(completion.action)
    }

    /// Generation of the task currently running under `key`, if any.
    pub fn current(&self, key: &TaskKey) -> Option<Generation> {
        self.tasks.get(key).map(|running| running.generation)
    }

    pub fn is_current(&self, key: &TaskKey, generation: Generation) -> bool {
        self.current(key) == Some(generation)
    }

    /// Cancel a task by key. No-op if nothing runs under it.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(running) = self.tasks.remove(key) {
            running.handle.abort();
        }
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&mut self) {
        for (_, running) in self.tasks.drain() {
            running.handle.abort();
        }
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, running) in self.tasks.drain() {
            running.handle.abort();
        }
    }
}
