//! Application state - single source of truth
//!
//! Only the reducer mutates this. The search, subscription and token-link
//! workflows each own one sub-state; the one link between them is the
//! subscription city, which follows the last searched city until the user
//! types into it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NormalizedError;

pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found. Please check spelling and try again.";
pub const EMAIL_REQUIRED_MESSAGE: &str = "Please enter your email address.";
pub const CITY_REQUIRED_MESSAGE: &str = "Please enter a city to subscribe to.";
pub const INVALID_FREQUENCY_MESSAGE: &str = "Please select a valid frequency.";
pub const SUBSCRIBED_MESSAGE: &str = "Subscribed! Check your email for confirmation.";
pub const MISSING_TOKEN_MESSAGE: &str = "Missing token in URL.";

/// Current weather as returned by `GET /weather`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
}

/// How often notifications are sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Hourly,
    #[default]
    Daily,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidFrequency(pub String);

impl fmt::Display for InvalidFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency {:?} (expected hourly or daily)", self.0)
    }
}

impl std::error::Error for InvalidFrequency {}

impl FromStr for Frequency {
    type Err = InvalidFrequency;

    /// Exact match only: "Daily" or " daily" are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            other => Err(InvalidFrequency(other.to_string())),
        }
    }
}

/// Lifecycle of one workflow. Exactly one holds at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// A value fed from elsewhere until the user overrides it.
///
/// Once overridden, derived updates are ignored for the rest of the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedField<T> {
    value: T,
    user_overridden: bool,
}

impl<T: PartialEq> DerivedField<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            user_overridden: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_user_overridden(&self) -> bool {
        self.user_overridden
    }

    /// Apply an update from the source. Returns true if the value changed.
    pub fn derive(&mut self, value: T) -> bool {
        if self.user_overridden || self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Apply a direct user edit. Derivation stops from here on.
    pub fn set_by_user(&mut self, value: T) {
        self.value = value;
        self.user_overridden = true;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    pub status: Status,
    /// Raw text of the search field.
    pub query_city: String,
    /// Trimmed city of the last settled search, successful or not.
    pub result_city: Option<String>,
    pub reading: Option<WeatherReading>,
    pub error: Option<NormalizedError>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionState {
    pub status: Status,
    pub city: DerivedField<String>,
    pub email: String,
    /// Raw frequency selection; validated on submit.
    pub frequency: String,
    pub error: Option<NormalizedError>,
    pub success_message: Option<String>,
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            city: DerivedField::default(),
            email: String::new(),
            frequency: Frequency::default().as_str().to_string(),
            error: None,
            success_message: None,
        }
    }
}

impl SubscriptionState {
    pub fn city_is_user_edited(&self) -> bool {
        self.city.is_user_overridden()
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Whether the subscribe action should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.email.trim().is_empty()
            && !self.city.value().trim().is_empty()
            && self.frequency.parse::<Frequency>().is_ok()
            && !self.is_loading()
    }
}

/// Request carried by a confirmation or unsubscribe link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenAction {
    Confirm,
    Unsubscribe,
}

impl TokenAction {
    pub fn success_message(self) -> &'static str {
        match self {
            TokenAction::Confirm => "Success! Your subscription has been confirmed.",
            TokenAction::Unsubscribe => "You have been unsubscribed.",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenState {
    pub action: Option<TokenAction>,
    pub status: Status,
    pub token: String,
    pub error: Option<NormalizedError>,
    pub success_message: Option<String>,
}

/// Everything the client shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub search: SearchState,
    pub subscription: SubscriptionState,
    pub token: TokenState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_parse_is_exact() {
        assert_eq!("hourly".parse::<Frequency>(), Ok(Frequency::Hourly));
        assert_eq!("daily".parse::<Frequency>(), Ok(Frequency::Daily));
        assert!("Daily".parse::<Frequency>().is_err());
        assert!(" daily".parse::<Frequency>().is_err());
        assert!("weekly".parse::<Frequency>().is_err());
        assert_eq!(Frequency::Hourly.to_string(), "hourly");
    }

    #[test]
    fn test_derived_field_follows_source_until_overridden() {
        let mut city = DerivedField::new(String::new());

        assert!(city.derive("Warsaw".to_string()));
        assert!(!city.derive("Warsaw".to_string()));
        assert_eq!(city.value(), "Warsaw");

        city.set_by_user("Krakow".to_string());
        assert!(city.is_user_overridden());
        assert!(!city.derive("Berlin".to_string()));
        assert_eq!(city.value(), "Krakow");

        // Clearing the field is still a user edit.
        city.set_by_user(String::new());
        assert!(!city.derive("Paris".to_string()));
        assert_eq!(city.value(), "");
    }

    #[test]
    fn test_can_submit() {
        let mut sub = SubscriptionState::default();
        assert!(!sub.can_submit());

        sub.email = " me@example.com ".into();
        sub.city.derive("Oslo".into());
        assert!(sub.can_submit());

        sub.frequency = "weekly".into();
        assert!(!sub.can_submit());

        sub.frequency = "hourly".into();
        sub.status = Status::Loading;
        assert!(!sub.can_submit());

        sub.status = Status::Error;
        sub.city.set_by_user("   ".into());
        assert!(!sub.can_submit());
    }

    #[test]
    fn test_reading_deserializes_from_service_payload() {
        let reading: WeatherReading =
            serde_json::from_str(r#"{"temperature": 18, "humidity": 60, "description": "Clear"}"#)
                .unwrap();
        assert_eq!(
            reading,
            WeatherReading {
                temperature: 18.0,
                humidity: 60.0,
                description: "Clear".into(),
            }
        );
    }
}
