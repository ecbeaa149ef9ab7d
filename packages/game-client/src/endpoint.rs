use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::GameClientError;
use shared::models::matchmaking::responses::WsEndpointResponse;

/// Looks up where a room's websocket currently lives. The answer changes
/// when the room migrates nodes, so it is fetched fresh on every
/// (re)connection attempt.
#[async_trait]
pub trait EndpointClient: Send + Sync {
    async fn ws_endpoint(&self, room_id: &str) -> Result<WsEndpointResponse, GameClientError>;
}

/// reqwest-backed lookup against the public API.
pub struct HttpEndpointClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl HttpEndpointClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl EndpointClient for HttpEndpointClient {
    async fn ws_endpoint(&self, room_id: &str) -> Result<WsEndpointResponse, GameClientError> {
        let url = format!("{}/api/v1/rooms/{}/ws_endpoint", self.base_url, room_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<WsEndpointResponse>().await?),
            // Room gone or terminal; there is nothing to reconnect to.
            StatusCode::NOT_FOUND => Err(GameClientError::SessionUnrecoverable(
                "room no longer active".to_string(),
            )),
            status => Err(GameClientError::Endpoint(format!(
                "unexpected status {} from {}",
                status, url
            ))),
        }
    }
}
