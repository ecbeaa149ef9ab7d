use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::error::GameClientError;

/// Proof presented when joining a room's websocket channel.
#[derive(Debug, Clone)]
pub enum JoinCredentials {
    /// First join, straight from matchmaking.
    RoomToken(String),
    /// Rejoining an in-flight game after a drop.
    Reconnect(String),
}

impl JoinCredentials {
    fn token(&self) -> &str {
        match self {
            JoinCredentials::RoomToken(token) | JoinCredentials::Reconnect(token) => token,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            JoinCredentials::RoomToken(_) => "room_token",
            JoinCredentials::Reconnect(_) => "reconnect_token",
        }
    }
}

/// Successful join acknowledgement: the rotated reconnect token to store,
/// plus the full game state to render from.
#[derive(Debug, Clone)]
pub struct JoinAck {
    pub reconnect_token: String,
    pub session_state: serde_json::Value,
}

#[async_trait]
pub trait GameTransport: Send + Sync {
    async fn join(
        &self,
        ws_url: &str,
        room_id: &str,
        credentials: &JoinCredentials,
    ) -> Result<JoinAck, GameClientError>;
}

#[derive(Serialize)]
struct JoinFrame<'a> {
    action: &'static str,
    room_id: &'a str,
    token: &'a str,
    token_kind: &'static str,
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JoinReply {
    Ok {
        reconnect_token: String,
        #[serde(default)]
        session_state: serde_json::Value,
    },
    Error {
        reason: String,
    },
}

/// Websocket transport speaking the game server's JSON join protocol: one
/// join frame out, one reply frame back, then the session is live.
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameTransport for WsTransport {
    async fn join(
        &self,
        ws_url: &str,
        room_id: &str,
        credentials: &JoinCredentials,
    ) -> Result<JoinAck, GameClientError> {
        let (mut socket, _) = connect_async(ws_url)
            .await
            .map_err(|e| GameClientError::Transport(e.to_string()))?;

        let frame = serde_json::to_string(&JoinFrame {
            action: "join",
            room_id,
            token: credentials.token(),
            token_kind: credentials.kind(),
        })?;
        socket
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| GameClientError::Transport(e.to_string()))?;

        // The first text frame is always the join reply.
        while let Some(message) = socket.next().await {
            let message = message.map_err(|e| GameClientError::Transport(e.to_string()))?;
            if let Message::Text(text) = message {
                return match serde_json::from_str::<JoinReply>(&text)? {
                    JoinReply::Ok {
                        reconnect_token,
                        session_state,
                    } => Ok(JoinAck {
                        reconnect_token,
                        session_state,
                    }),
                    JoinReply::Error { reason } => Err(GameClientError::Rejected(reason)),
                };
            }
        }

        Err(GameClientError::Transport(
            "connection closed before join reply".to_string(),
        ))
    }
}
