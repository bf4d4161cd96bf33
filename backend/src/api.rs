//! Festival API boundary
//!
//! [`FestivalApi`] is the seam between the dashboard core and the network.
//! [`HttpFestivalApi`] talks to the game server over HTTP; tests plug in
//! their own implementation.
//!
//! # Endpoints
//!
//! - `GET  {base}/api/festival/{id}`: snapshot; any non-2xx status is a fetch error
//! - `POST {base}/api/events/respond/{id}`: event response; the JSON body is
//!   decoded whatever the status, since rejections arrive as 400 with
//!   `{"success": false, "error": ...}`

use crate::config::{ConfigError, DashboardConfig};
use crate::models::{EventResponseRequest, EventResponseResult, FestivalSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Failure to obtain a snapshot
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

/// Failure to deliver an event response or read its answer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait FestivalApi: Send + Sync + 'static {
    /// Fetch the current festival snapshot
    async fn fetch_snapshot(&self) -> Result<FestivalSnapshot, FetchError>;

    /// Submit the player's choice for an event
    async fn respond_to_event(
        &self,
        request: &EventResponseRequest,
    ) -> Result<EventResponseResult, TransportError>;
}

/// reqwest-backed [`FestivalApi`]
#[derive(Debug, Clone)]
pub struct HttpFestivalApi {
    client: Client,
    base_url: String,
    festival_id: u64,
}

impl HttpFestivalApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            festival_id: config.festival_id,
        })
    }

    pub fn snapshot_url(&self) -> String {
        format!("{}/api/festival/{}", self.base_url, self.festival_id)
    }

    pub fn respond_url(&self) -> String {
        format!("{}/api/events/respond/{}", self.base_url, self.festival_id)
    }
}

#[async_trait]
impl FestivalApi for HttpFestivalApi {
    async fn fetch_snapshot(&self) -> Result<FestivalSnapshot, FetchError> {
        let url = self.snapshot_url();
        debug!(url = %url, "GET festival snapshot");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_snapshot(status, &body)
    }

    async fn respond_to_event(
        &self,
        request: &EventResponseRequest,
    ) -> Result<EventResponseResult, TransportError> {
        let url = self.respond_url();
        debug!(url = %url, event_type = %request.event_type, option_id = %request.option_id, "POST event response");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        decode_event_response(&body)
    }
}

/// Turn a raw `GET /api/festival` answer into a snapshot
pub fn decode_snapshot(status: u16, body: &str) -> Result<FestivalSnapshot, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status { status });
    }
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Decode an event-response body regardless of HTTP status
pub fn decode_event_response(body: &str) -> Result<EventResponseResult, TransportError> {
    serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_trim_trailing_slash() {
        let api = HttpFestivalApi::new(&DashboardConfig::new("http://localhost:5000/", 42)).unwrap();
        assert_eq!(api.snapshot_url(), "http://localhost:5000/api/festival/42");
        assert_eq!(api.respond_url(), "http://localhost:5000/api/events/respond/42");
    }

    #[test]
    fn test_non_2xx_is_status_error() {
        assert_eq!(
            decode_snapshot(404, "<html>not found</html>"),
            Err(FetchError::Status { status: 404 })
        );
        assert_eq!(FetchError::Status { status: 500 }.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        assert!(matches!(decode_snapshot(200, "not json"), Err(FetchError::Decode(_))));
        assert!(matches!(
            decode_event_response("<html>"),
            Err(TransportError::Decode(_))
        ));
    }

    #[test]
    fn test_ok_body_decodes() {
        let snapshot = decode_snapshot(200, r#"{"festival": {"budget": 1000}}"#).unwrap();
        assert_eq!(snapshot.festival().unwrap().budget, 1000.0);
    }
}
