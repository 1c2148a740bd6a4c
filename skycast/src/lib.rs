//! skycast - weather lookup and notification subscriptions
//!
//! Two layers:
//!
//! - [`api`]: the HTTP client for the weather service. Every failure comes
//!   out as a [`NormalizedError`].
//! - [`dashboard`]: the controller running the search, subscription and
//!   token-link workflows on top of the `skycast-dispatch` store, with stale
//!   search results suppressed by task generation.

pub mod action;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod effect;
pub mod error;
pub mod reducer;
pub mod state;

pub use api::{HttpWeatherApi, WeatherApi};
pub use config::{ClientConfig, ConfigError};
pub use dashboard::Dashboard;
pub use error::{ErrorKind, NormalizedError};
pub use state::{AppState, Frequency, Status, TokenAction, WeatherReading};
