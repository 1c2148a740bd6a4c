//! Actions
//!
//! Naming convention: the prefix names the workflow (`Search*`,
//! `Subscribe*`, `Token*`) and a `Did` marks a result coming back from an
//! async task.

use skycast_dispatch::Action as DispatchAction;

use crate::error::NormalizedError;
use crate::state::{TokenAction, WeatherReading};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Search =====
    /// Search field edited
    SearchQueryChange(String),

    /// Intent: look up weather for a city (raw, untrimmed input)
    SearchSubmit(String),

    /// Result: weather for `city` arrived
    SearchDidLoad { city: String, reading: WeatherReading },

    /// Result: lookup for `city` failed
    SearchDidError { city: String, error: NormalizedError },

    // ===== Subscribe =====
    SubscribeEmailChange(String),

    /// Subscription city typed by the user; stops auto-fill
    SubscribeCityChange(String),

    SubscribeFrequencyChange(String),

    /// Intent: validate and send a subscription request
    SubscribeSubmit {
        email: String,
        city: String,
        frequency: String,
    },

    SubscribeDidSucceed,

    SubscribeDidError(NormalizedError),

    // ===== Token links =====
    /// Intent: confirm or cancel a subscription from a link token
    TokenSubmit { action: TokenAction, token: String },

    TokenDidSucceed(TokenAction),

    TokenDidError {
        action: TokenAction,
        error: NormalizedError,
    },
}

impl DispatchAction for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SearchQueryChange(_) => "SearchQueryChange",
            Action::SearchSubmit(_) => "SearchSubmit",
            Action::SearchDidLoad { .. } => "SearchDidLoad",
            Action::SearchDidError { .. } => "SearchDidError",
            Action::SubscribeEmailChange(_) => "SubscribeEmailChange",
            Action::SubscribeCityChange(_) => "SubscribeCityChange",
            Action::SubscribeFrequencyChange(_) => "SubscribeFrequencyChange",
            Action::SubscribeSubmit { .. } => "SubscribeSubmit",
            Action::SubscribeDidSucceed => "SubscribeDidSucceed",
            Action::SubscribeDidError(_) => "SubscribeDidError",
            Action::TokenSubmit { .. } => "TokenSubmit",
            Action::TokenDidSucceed(_) => "TokenDidSucceed",
            Action::TokenDidError { .. } => "TokenDidError",
        }
    }

    /// Keeps personal data and payloads out of the logs.
    fn summary(&self) -> String {
        match self {
            Action::SearchDidLoad { city, reading } => format!(
                "SearchDidLoad {{ city: {city:?}, temp: {:.1}, humidity: {:.0} }}",
                reading.temperature, reading.humidity
            ),
            Action::SearchDidError { city, error } => {
                format!("SearchDidError {{ city: {city:?}, status: {:?} }}", error.status)
            }
            Action::SubscribeEmailChange(_) => "SubscribeEmailChange(..)".to_string(),
            Action::SubscribeSubmit { city, frequency, .. } => {
                format!("SubscribeSubmit {{ city: {city:?}, frequency: {frequency:?} }}")
            }
            Action::SubscribeDidError(error) => {
                format!("SubscribeDidError {{ status: {:?} }}", error.status)
            }
            Action::TokenSubmit { action, .. } => format!("TokenSubmit({action:?})"),
            Action::TokenDidError { action, error } => {
                format!("TokenDidError {{ action: {action:?}, status: {:?} }}", error.status)
            }
            _ => format!("{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_hides_email_and_token() {
        let submit = Action::SubscribeSubmit {
            email: "me@example.com".into(),
            city: "Oslo".into(),
            frequency: "daily".into(),
        };
        assert!(!submit.summary().contains("me@example.com"));
        assert_eq!(submit.name(), "SubscribeSubmit");

        let token = Action::TokenSubmit {
            action: TokenAction::Confirm,
            token: "secret-token".into(),
        };
        assert_eq!(token.summary(), "TokenSubmit(Confirm)");
    }

    #[test]
    fn test_summary_of_loaded_weather() {
        let action = Action::SearchDidLoad {
            city: "Warsaw".into(),
            reading: WeatherReading {
                temperature: 18.0,
                humidity: 60.0,
                description: "Clear".into(),
            },
        };
        assert_eq!(
            action.summary(),
            "SearchDidLoad { city: \"Warsaw\", temp: 18.0, humidity: 60 }"
        );
    }
}

