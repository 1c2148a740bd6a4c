//! Weather service client
//!
//! One place that talks HTTP. Each call either returns its value or a
//! [`NormalizedError`]; status handling, body sniffing and transport codes
//! all happen here so the controller only ever sees the normalized shape.
//!
//! Remote contract:
//! - `GET /weather?city={city}` -> `{temperature, humidity, description}`
//! - `POST /subscribe` (multipart form: `email`, `city`, `frequency`)
//! - `GET /confirm/{token}`
//! - `GET /unsubscribe/{token}`

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::error::NormalizedError;
use crate::state::{Frequency, TokenAction, WeatherReading};

/// Operations the dashboard needs from the remote service.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// `city` must already be trimmed and non-empty.
    async fn fetch_weather(&self, city: &str) -> Result<WeatherReading, NormalizedError>;

    async fn create_subscription(
        &self,
        email: &str,
        city: &str,
        frequency: Frequency,
    ) -> Result<(), NormalizedError>;

    /// `token` is sent percent-encoded as a single path segment.
    async fn confirm_subscription(&self, token: &str) -> Result<(), NormalizedError>;

    /// `token` is sent percent-encoded as a single path segment.
    async fn cancel_subscription(&self, token: &str) -> Result<(), NormalizedError>;

    /// Dispatch a link token to the matching endpoint.
    async fn run_token_action(
        &self,
        action: TokenAction,
        token: &str,
    ) -> Result<(), NormalizedError> {
        match action {
            TokenAction::Confirm => self.confirm_subscription(token).await,
            TokenAction::Unsubscribe => self.cancel_subscription(token).await,
        }
    }
}

/// [`WeatherApi`] over HTTP with reqwest.
#[derive(Clone, Debug)]
pub struct HttpWeatherApi {
    client: Client,
    base_url: String,
}

impl HttpWeatherApi {
    /// Build a client with the configured timeout and a JSON `Accept` header.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Paths are appended to the base, so a base with a path prefix keeps it.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and turn any non-2xx outcome into a [`NormalizedError`].
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, NormalizedError> {
        let response = request.send().await.map_err(|e| {
            let error = NormalizedError::from(e);
            tracing::warn!(path, code = ?error.code, "request failed: {}", error.message);
            error
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        // A body that fails to arrive still leaves a usable status.
        let body = response.bytes().await.unwrap_or_default();
        let error = NormalizedError::from_response(status.as_u16(), &body);
        tracing::warn!(
            path,
            status = status.as_u16(),
            code = ?error.code,
            "request rejected: {}",
            error.message
        );
        Err(error)
    }

    async fn get_token_path(&self, prefix: &str, token: &str) -> Result<(), NormalizedError> {
        let path = format!("{prefix}/{}", urlencoding::encode(token));
        tracing::debug!(endpoint = prefix, "GET");
        self.send(prefix, self.client.get(self.url(&path))).await?;
        Ok(())
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherReading, NormalizedError> {
        tracing::debug!(city, "GET /weather");
        let request = self.client.get(self.url("/weather")).query(&[("city", city)]);
        let response = self.send("/weather", request).await?;
        let body = response.bytes().await?;
        parse_reading(&body)
    }

    async fn create_subscription(
        &self,
        email: &str,
        city: &str,
        frequency: Frequency,
    ) -> Result<(), NormalizedError> {
        tracing::debug!(city, %frequency, "POST /subscribe");
        let form = Form::new()
            .text("email", email.to_string())
            .text("city", city.to_string())
            .text("frequency", frequency.as_str());
        let request = self.client.post(self.url("/subscribe")).multipart(form);
        self.send("/subscribe", request).await?;
        Ok(())
    }

    async fn confirm_subscription(&self, token: &str) -> Result<(), NormalizedError> {
        self.get_token_path("/confirm", token).await
    }

    async fn cancel_subscription(&self, token: &str) -> Result<(), NormalizedError> {
        self.get_token_path("/unsubscribe", token).await
    }
}

/// Undecodable bodies are a runtime fault; valid JSON of the wrong shape is
/// unexpected and kept as details.
fn parse_reading(body: &[u8]) -> Result<WeatherReading, NormalizedError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| NormalizedError::runtime(e.to_string()))?;
    match serde_json::from_value(value.clone()) {
        Ok(reading) => Ok(reading),
        Err(e) => {
            tracing::warn!("weather payload has unexpected shape: {e}");
            Err(NormalizedError::unexpected(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, UNEXPECTED_ERROR_MESSAGE};
    use serde_json::json;

    #[test]
    fn test_parse_reading() {
        let reading =
            parse_reading(br#"{"temperature": -3.5, "humidity": 81, "description": "Snow"}"#)
                .unwrap();
        assert_eq!(reading.temperature, -3.5);
        assert_eq!(reading.description, "Snow");
    }

    #[test]
    fn test_parse_reading_wrong_shape_is_unexpected() {
        let error = parse_reading(br#"{"temp": 20}"#).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unexpected);
        assert_eq!(error.message, UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(error.details, Some(json!({"temp": 20})));
    }

    #[test]
    fn test_parse_reading_garbage_is_runtime_fault() {
        let error = parse_reading(b"<html>oops</html>").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unexpected);
        assert_ne!(error.message, UNEXPECTED_ERROR_MESSAGE);
        assert!(error.status.is_none());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_base_url_prefix_is_kept() {
        let config = ClientConfig::new("http://localhost:9000/api/").unwrap();
        let api = HttpWeatherApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:9000/api");
        assert_eq!(api.url("/weather"), "http://localhost:9000/api/weather");
    }
}
