//! Dashboard controller
//!
//! Owns the store, the task manager and the completion channel. User
//! intents go in through the `run_*` and `set_*` methods; network results
//! come back through [`Dashboard::next_completion`], which only applies a
//! result if its task generation is still the live one for its workflow.
//! After [`Dashboard::teardown`] nothing mutates state any more.

use std::sync::Arc;

use skycast_dispatch::{
    Action as _, Completion, EffectStoreWithMiddleware, LoggingMiddleware, TaskKey, TaskManager,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::api::WeatherApi;
use crate::effect::Effect;
use crate::reducer::reducer;
use crate::state::{AppState, TokenAction};

pub const SEARCH_TASK: &str = "search";
pub const SUBSCRIBE_TASK: &str = "subscribe";
pub const TOKEN_TASK: &str = "token";

type DashboardStore = EffectStoreWithMiddleware<AppState, Action, Effect, LoggingMiddleware>;

pub struct Dashboard {
    store: DashboardStore,
    tasks: TaskManager<Action>,
    completions: mpsc::UnboundedReceiver<Completion<Action>>,
    api: Arc<dyn WeatherApi>,
    shutdown: CancellationToken,
}

impl Dashboard {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self::with_state(api, AppState::default())
    }

    pub fn with_state(api: Arc<dyn WeatherApi>, state: AppState) -> Self {
        let (completion_tx, completions) = mpsc::unbounded_channel();
        Self {
            store: EffectStoreWithMiddleware::new(state, reducer, LoggingMiddleware::new()),
            tasks: TaskManager::new(completion_tx),
            completions,
            api,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    // ===== Search =====

    pub fn set_search_query(&mut self, query: impl Into<String>) -> bool {
        self.dispatch(Action::SearchQueryChange(query.into()))
    }

    /// Start a weather lookup, superseding any lookup still in flight.
    ///
    /// Blank input is ignored.
    pub fn run_search(&mut self, city: impl Into<String>) -> bool {
        self.dispatch(Action::SearchSubmit(city.into()))
    }

    /// Search for whatever is in the search field.
    pub fn submit_search(&mut self) -> bool {
        let query = self.state().search.query_city.clone();
        self.run_search(query)
    }

    // ===== Subscribe =====

    pub fn set_email(&mut self, email: impl Into<String>) -> bool {
        self.dispatch(Action::SubscribeEmailChange(email.into()))
    }

    /// User edit of the subscription city. Auto-fill from searches stops.
    pub fn set_subscription_city(&mut self, city: impl Into<String>) -> bool {
        self.dispatch(Action::SubscribeCityChange(city.into()))
    }

    pub fn set_frequency(&mut self, frequency: impl Into<String>) -> bool {
        self.dispatch(Action::SubscribeFrequencyChange(frequency.into()))
    }

    pub fn can_subscribe(&self) -> bool {
        !self.is_torn_down() && self.state().subscription.can_submit()
    }

    /// Validate and send a subscription. Ignored while one is in flight.
    pub fn run_subscribe(
        &mut self,
        email: impl Into<String>,
        city: impl Into<String>,
        frequency: impl Into<String>,
    ) -> bool {
        self.dispatch(Action::SubscribeSubmit {
            email: email.into(),
            city: city.into(),
            frequency: frequency.into(),
        })
    }

    /// Subscribe with the current form fields.
    pub fn submit_subscription(&mut self) -> bool {
        let sub = &self.state().subscription;
        let (email, city, frequency) =
            (sub.email.clone(), sub.city.value().clone(), sub.frequency.clone());
        self.run_subscribe(email, city, frequency)
    }

    // ===== Token links =====

    pub fn run_token_action(&mut self, action: TokenAction, token: impl Into<String>) -> bool {
        self.dispatch(Action::TokenSubmit {
            action,
            token: token.into(),
        })
    }

    // ===== Completions and lifecycle =====

    /// Wait for one task to finish and apply its result if still current.
    ///
    /// Returns false when nothing is in flight or the dashboard has been
    /// torn down, true after a completion was taken off the channel
    /// (whether applied or discarded as stale).
    pub async fn next_completion(&mut self) -> bool {
        if self.is_torn_down() || self.tasks.is_empty() {
            return false;
        }

        let next = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            completion = self.completions.recv() => completion,
        };

        let Some(completion) = next else {
            self.teardown();
            return false;
        };
        if let Some(action) = self.tasks.finish(completion) {
            self.dispatch(action);
        }
        true
    }

    /// Apply completions until no task is in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Whether a workflow's request is still outstanding.
    pub fn is_in_flight(&self, task: &str) -> bool {
        self.tasks.is_running(&TaskKey::new(task))
    }

    /// Handle that tears the dashboard down when cancelled, e.g. from a
    /// signal handler. Takes effect at the next `next_completion`.
    pub fn teardown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Abort all requests. Pending and future completions become no-ops.
    pub fn teardown(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(pending = self.tasks.len(), "tearing down with requests in flight");
        }
        self.shutdown.cancel();
        self.tasks.cancel_all();
    }

    pub fn is_torn_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn dispatch(&mut self, action: Action) -> bool {
        if self.is_torn_down() {
            tracing::debug!(action = action.name(), "ignored after teardown");
            return false;
        }
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.handle_effect(effect);
        }
        result.changed
    }

    fn handle_effect(&mut self, effect: Effect) {
        let api = Arc::clone(&self.api);
        match effect {
            Effect::FetchWeather { city } => {
                self.tasks.spawn(SEARCH_TASK, async move {
                    let result = api.fetch_weather(&city).await;
                    match result {
                        Ok(reading) => Action::SearchDidLoad { city, reading },
                        Err(error) => Action::SearchDidError { city, error },
                    }
                });
            }
            Effect::CreateSubscription {
                email,
                city,
                frequency,
            } => {
                self.tasks.spawn(SUBSCRIBE_TASK, async move {
                    let result = api.create_subscription(&email, &city, frequency).await;
                    match result {
                        Ok(()) => Action::SubscribeDidSucceed,
                        Err(error) => Action::SubscribeDidError(error),
                    }
                });
            }
            Effect::RunTokenAction { action, token } => {
                self.tasks.spawn(TOKEN_TASK, async move {
                    let result = api.run_token_action(action, &token).await;
                    match result {
                        Ok(()) => Action::TokenDidSucceed(action),
                        Err(error) => Action::TokenDidError { action, error },
                    }
                });
            }
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
