//! Effects - side effects declared by the reducer
//!
//! The reducer only describes the request; the dashboard turns each effect
//! into a keyed task on the task manager.

use crate::state::{Frequency, TokenAction};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// `GET /weather?city=` for an already trimmed city
    FetchWeather { city: String },

    /// `POST /subscribe` with validated, trimmed fields
    CreateSubscription {
        email: String,
        city: String,
        frequency: Frequency,
    },

    /// `GET /confirm/{token}` or `GET /unsubscribe/{token}`
    RunTokenAction { action: TokenAction, token: String },
}
