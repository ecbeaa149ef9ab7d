use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::endpoint::EndpointClient;
use crate::error::GameClientError;
use crate::store::{SessionStore, StoredSession};
use crate::transport::{GameTransport, JoinAck, JoinCredentials};
use shared::config::AUTO_RECONNECT_DELAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connected,
    Disconnected,
    Reconnecting,
}

/// Drives one player's room session: first join, disconnection handling
/// with a single delayed automatic retry, and manual reconnection. Every
/// successful join rotates the stored reconnect token.
pub struct SessionClient {
    store: Arc<dyn SessionStore>,
    endpoint: Arc<dyn EndpointClient>,
    transport: Arc<dyn GameTransport>,
    state: Mutex<ConnectionState>,
    reconnect_delay: Duration,
}

impl SessionClient {
    pub fn new(
        store: Arc<dyn SessionStore>,
        endpoint: Arc<dyn EndpointClient>,
        transport: Arc<dyn GameTransport>,
    ) -> Self {
        Self {
            store,
            endpoint,
            transport,
            state: Mutex::new(ConnectionState::Idle),
            reconnect_delay: Duration::from_millis(AUTO_RECONNECT_DELAY_MS),
        }
    }

    /// Shortens the automatic retry delay; for tests.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.lock().unwrap() = state;
    }

    /// First join with the room token handed out by matchmaking. On success
    /// the rotated reconnect token is persisted for later recovery.
    pub async fn join_room(
        &self,
        room_id: &str,
        room_token: &str,
    ) -> Result<JoinAck, GameClientError> {
        let endpoint = self.endpoint.ws_endpoint(room_id).await?;
        let ack = self
            .transport
            .join(
                &endpoint.ws_url,
                room_id,
                &JoinCredentials::RoomToken(room_token.to_string()),
            )
            .await?;

        self.store.save(&StoredSession {
            room_id: room_id.to_string(),
            reconnect_token: ack.reconnect_token.clone(),
        });
        self.set_state(ConnectionState::Connected);
        Ok(ack)
    }

    /// Call when the websocket drops. Marks the session disconnected, waits
    /// the auto-reconnect delay, and makes exactly one recovery attempt.
    /// Further attempts are the caller's choice via [`retry_now`].
    ///
    /// [`retry_now`]: SessionClient::retry_now
    pub async fn handle_disconnect(&self) -> Result<JoinAck, GameClientError> {
        self.set_state(ConnectionState::Disconnected);
        tracing::info!(
            delay_ms = self.reconnect_delay.as_millis() as u64,
            "Connection lost, scheduling automatic reconnect"
        );
        tokio::time::sleep(self.reconnect_delay).await;
        self.reconnect().await
    }

    /// Immediate manual retry, for the "reconnect now" button.
    pub async fn retry_now(&self) -> Result<JoinAck, GameClientError> {
        self.reconnect().await
    }

    async fn reconnect(&self) -> Result<JoinAck, GameClientError> {
        let stored = match self.store.load() {
            Some(stored) => stored,
            None => {
                self.abandon();
                return Err(GameClientError::SessionUnrecoverable(
                    "no stored session".to_string(),
                ));
            }
        };

        self.set_state(ConnectionState::Reconnecting);

        let endpoint = match self.endpoint.ws_endpoint(&stored.room_id).await {
            Ok(endpoint) => endpoint,
            Err(GameClientError::SessionUnrecoverable(msg)) => {
                self.abandon();
                return Err(GameClientError::SessionUnrecoverable(msg));
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        match self
            .transport
            .join(
                &endpoint.ws_url,
                &stored.room_id,
                &JoinCredentials::Reconnect(stored.reconnect_token.clone()),
            )
            .await
        {
            Ok(ack) => {
                self.store.save(&StoredSession {
                    room_id: stored.room_id,
                    reconnect_token: ack.reconnect_token.clone(),
                });
                self.set_state(ConnectionState::Connected);
                tracing::info!("Reconnected");
                Ok(ack)
            }
            // The server refused our token; it will never start working.
            Err(GameClientError::Rejected(reason)) => {
                self.abandon();
                Err(GameClientError::SessionUnrecoverable(reason))
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Gives up on the stored session and returns to a clean slate; the
    /// caller should route the player back to matchmaking.
    fn abandon(&self) {
        self.store.clear();
        self.set_state(ConnectionState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;

    use crate::store::MemorySessionStore;
    use shared::models::matchmaking::responses::WsEndpointResponse;

    struct StaticEndpoint {
        replies: Mutex<VecDeque<Result<WsEndpointResponse, GameClientError>>>,
    }

    impl StaticEndpoint {
        fn always_ok() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
            }
        }

        fn with_replies(replies: Vec<Result<WsEndpointResponse, GameClientError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }

        fn ok_reply() -> WsEndpointResponse {
            WsEndpointResponse {
                ws_url: "ws://node-1:4000/socket".to_string(),
                node_name: Some("node-1".to_string()),
                room_status: "playing".to_string(),
            }
        }
    }

    #[async_trait]
    impl EndpointClient for StaticEndpoint {
        async fn ws_endpoint(&self, _room_id: &str) -> Result<WsEndpointResponse, GameClientError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Self::ok_reply()))
        }
    }

    /// Scripted transport: pops one outcome per join attempt.
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<JoinAck, GameClientError>>>,
        seen_credentials: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<JoinAck, GameClientError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                seen_credentials: Mutex::new(Vec::new()),
            }
        }

        fn ack(token: &str) -> JoinAck {
            JoinAck {
                reconnect_token: token.to_string(),
                session_state: json!({"turn": 3}),
            }
        }
    }

    #[async_trait]
    impl GameTransport for ScriptedTransport {
        async fn join(
            &self,
            _ws_url: &str,
            _room_id: &str,
            credentials: &JoinCredentials,
        ) -> Result<JoinAck, GameClientError> {
            let label = match credentials {
                JoinCredentials::RoomToken(t) => format!("room:{}", t),
                JoinCredentials::Reconnect(t) => format!("reconnect:{}", t),
            };
            self.seen_credentials.lock().unwrap().push(label);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GameClientError::Transport("script exhausted".to_string())))
        }
    }

    fn client(
        transport: Arc<ScriptedTransport>,
        endpoint: Arc<StaticEndpoint>,
    ) -> (SessionClient, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let client = SessionClient::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            endpoint,
            transport,
        )
        .with_reconnect_delay(Duration::from_millis(5));
        (client, store)
    }

    #[tokio::test]
    async fn test_join_room_stores_rotated_token() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(ScriptedTransport::ack(
            "rt-1",
        ))]));
        let (client, store) = client(Arc::clone(&transport), Arc::new(StaticEndpoint::always_ok()));

        let ack = client.join_room("room-1", "room-token").await.unwrap();

        assert_eq!(ack.reconnect_token, "rt-1");
        assert_eq!(client.state(), ConnectionState::Connected);
        assert_eq!(
            store.load().unwrap(),
            StoredSession {
                room_id: "room-1".to_string(),
                reconnect_token: "rt-1".to_string(),
            }
        );
        assert_eq!(
            transport.seen_credentials.lock().unwrap().as_slice(),
            ["room:room-token"]
        );
    }

    #[tokio::test]
    async fn test_disconnect_triggers_single_auto_reconnect() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(ScriptedTransport::ack("rt-1")),
            Ok(ScriptedTransport::ack("rt-2")),
        ]));
        let (client, store) = client(Arc::clone(&transport), Arc::new(StaticEndpoint::always_ok()));
        client.join_room("room-1", "room-token").await.unwrap();

        let ack = client.handle_disconnect().await.unwrap();

        assert_eq!(ack.reconnect_token, "rt-2");
        assert_eq!(client.state(), ConnectionState::Connected);
        // The old token was rotated out of the store.
        assert_eq!(store.load().unwrap().reconnect_token, "rt-2");
        assert_eq!(
            transport.seen_credentials.lock().unwrap().as_slice(),
            ["room:room-token", "reconnect:rt-1"]
        );
    }

    #[tokio::test]
    async fn test_rejected_reconnect_is_unrecoverable() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(ScriptedTransport::ack("rt-1")),
            Err(GameClientError::Rejected("expired_token".to_string())),
        ]));
        let (client, store) = client(Arc::clone(&transport), Arc::new(StaticEndpoint::always_ok()));
        client.join_room("room-1", "room-token").await.unwrap();

        let err = client.handle_disconnect().await.unwrap_err();

        assert!(matches!(err, GameClientError::SessionUnrecoverable(_)));
        assert_eq!(client.state(), ConnectionState::Idle);
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn test_transient_failure_keeps_session_for_manual_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(ScriptedTransport::ack("rt-1")),
            Err(GameClientError::Transport("connection refused".to_string())),
            Ok(ScriptedTransport::ack("rt-2")),
        ]));
        let (client, store) = client(Arc::clone(&transport), Arc::new(StaticEndpoint::always_ok()));
        client.join_room("room-1", "room-token").await.unwrap();

        let err = client.handle_disconnect().await.unwrap_err();
        assert!(matches!(err, GameClientError::Transport(_)));
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(store.load().unwrap().reconnect_token, "rt-1");

        let ack = client.retry_now().await.unwrap();
        assert_eq!(ack.reconnect_token, "rt-2");
        assert_eq!(client.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_reconnect_without_stored_session_is_unrecoverable() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (client, _store) = client(transport, Arc::new(StaticEndpoint::always_ok()));

        let err = client.retry_now().await.unwrap_err();

        assert!(matches!(err, GameClientError::SessionUnrecoverable(_)));
        assert_eq!(client.state(), ConnectionState::Idle);
    }

    #[tokio::test]
    async fn test_room_gone_clears_session() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(ScriptedTransport::ack(
            "rt-1",
        ))]));
        let endpoint = Arc::new(StaticEndpoint::with_replies(vec![
            Ok(StaticEndpoint::ok_reply()),
            Err(GameClientError::SessionUnrecoverable(
                "room no longer active".to_string(),
            )),
        ]));
        let (client, store) = client(transport, endpoint);
        client.join_room("room-1", "room-token").await.unwrap();

        let err = client.handle_disconnect().await.unwrap_err();

        assert!(matches!(err, GameClientError::SessionUnrecoverable(_)));
        assert!(store.load().is_none());
        assert_eq!(client.state(), ConnectionState::Idle);
    }
}
