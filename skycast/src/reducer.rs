//! Reducer - (state, action) -> state + effects
//!
//! All state transitions for the three workflows live here. No I/O: network
//! work is returned as [`Effect`]s. Stale results never reach this function;
//! the dashboard filters them by task generation first.

use skycast_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::error::NormalizedError;
use crate::state::{
    AppState, Frequency, Status, CITY_NOT_FOUND_MESSAGE, CITY_REQUIRED_MESSAGE,
    EMAIL_REQUIRED_MESSAGE, INVALID_FREQUENCY_MESSAGE, MISSING_TOKEN_MESSAGE, SUBSCRIBED_MESSAGE,
};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search =====
        Action::SearchQueryChange(query) => {
            if state.search.query_city == query {
                return DispatchResult::unchanged();
            }
            state.search.query_city = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            let city = query.trim().to_string();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }

            state.search.query_city = query;
            state.search.status = Status::Loading;
            state.search.reading = None;
            state.search.error = None;

            // A confirmation from an earlier subscribe would be misleading now.
            if state.subscription.success_message.take().is_some()
                && state.subscription.status == Status::Success
            {
                state.subscription.status = Status::Idle;
            }

            DispatchResult::changed_with(Effect::FetchWeather { city })
        }

        Action::SearchDidLoad { city, reading } => {
            state.search.status = Status::Success;
            state.search.reading = Some(reading);
            state.search.error = None;
            settle_search_city(state, city);
            DispatchResult::changed()
        }

        Action::SearchDidError { city, error } => {
            let error = if error.is_not_found() {
                error.with_message(CITY_NOT_FOUND_MESSAGE)
            } else {
                error
            };
            state.search.status = Status::Error;
            state.search.reading = None;
            state.search.error = Some(error);
            settle_search_city(state, city);
            DispatchResult::changed()
        }

        // ===== Subscribe =====
        Action::SubscribeEmailChange(email) => {
            state.subscription.email = email;
            DispatchResult::changed()
        }

        Action::SubscribeCityChange(city) => {
            state.subscription.city.set_by_user(city);
            DispatchResult::changed()
        }

        Action::SubscribeFrequencyChange(frequency) => {
            state.subscription.frequency = frequency;
            DispatchResult::changed()
        }

        Action::SubscribeSubmit {
            email,
            city,
            frequency,
        } => {
            let sub = &mut state.subscription;
            // One subscribe request at a time.
            if sub.is_loading() {
                return DispatchResult::unchanged();
            }

            sub.error = None;
            sub.success_message = None;

            let email = email.trim();
            let city = city.trim();
            let validated = if email.is_empty() {
                Err(EMAIL_REQUIRED_MESSAGE)
            } else if city.is_empty() {
                Err(CITY_REQUIRED_MESSAGE)
            } else {
                frequency
                    .parse::<Frequency>()
                    .map_err(|_| INVALID_FREQUENCY_MESSAGE)
            };

            match validated {
                Ok(frequency) => {
                    sub.status = Status::Loading;
                    DispatchResult::changed_with(Effect::CreateSubscription {
                        email: email.to_string(),
                        city: city.to_string(),
                        frequency,
                    })
                }
                Err(message) => {
                    sub.status = Status::Error;
                    sub.error = Some(NormalizedError::validation(message));
                    DispatchResult::changed()
                }
            }
        }

        Action::SubscribeDidSucceed => {
            state.subscription.status = Status::Success;
            state.subscription.error = None;
            state.subscription.success_message = Some(SUBSCRIBED_MESSAGE.to_string());
            DispatchResult::changed()
        }

        Action::SubscribeDidError(error) => {
            state.subscription.status = Status::Error;
            state.subscription.success_message = None;
            state.subscription.error = Some(error);
            DispatchResult::changed()
        }

        // ===== Token links =====
        Action::TokenSubmit { action, token } => {
            let link = &mut state.token;
            link.action = Some(action);
            link.error = None;
            link.success_message = None;

            if token.trim().is_empty() {
                link.token = token;
                link.status = Status::Error;
                link.error = Some(NormalizedError::validation(MISSING_TOKEN_MESSAGE));
                return DispatchResult::changed();
            }

            link.token = token.clone();
            link.status = Status::Loading;
            DispatchResult::changed_with(Effect::RunTokenAction { action, token })
        }

        Action::TokenDidSucceed(action) => {
            state.token.status = Status::Success;
            state.token.error = None;
            state.token.success_message = Some(action.success_message().to_string());
            DispatchResult::changed()
        }

        Action::TokenDidError { error, .. } => {
            state.token.status = Status::Error;
            state.token.success_message = None;
            state.token.error = Some(error);
            DispatchResult::changed()
        }
    }
}

/// Record the searched city and feed it to the subscription form.
fn settle_search_city(state: &mut AppState, city: String) {
    state.search.result_city = Some(city.clone());
    state.subscription.city.derive(city);
}
