use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{game_server_ws_url, ROOM_TOKEN_TTL_SECONDS};
use crate::models::active_game::ActiveGameRecord;
use crate::models::game_match::Match;
use crate::models::game_type::GameType;
use crate::models::matchmaking::RoomData;
use crate::models::room::Room;
use crate::models::room_command::{RoomCommandConfig, RoomCreationCommand};
use crate::models::token::{SessionTokenRecord, TokenPurpose};
use crate::repositories::active_game_repository::ActiveGameRepository;
use crate::repositories::room_command_repository::RoomCommandRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::repositories::session_token_repository::SessionTokenRepository;
use crate::services::errors::room_service_errors::RoomServiceError;
use crate::services::token_service::TokenService;

/// Builds everything a fresh match needs: the durable room, per-player room
/// tokens with their server-side mirrors, active-game pointers, and the
/// creation command the game server consumes.
pub struct RoomCreationService {
    room_repository: Arc<dyn RoomRepository + Send + Sync>,
    active_game_repository: Arc<dyn ActiveGameRepository + Send + Sync>,
    session_token_repository: Arc<dyn SessionTokenRepository + Send + Sync>,
    room_command_repository: Arc<dyn RoomCommandRepository + Send + Sync>,
    token_service: Arc<TokenService>,
    ws_url: String,
}

impl RoomCreationService {
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        active_game_repository: Arc<dyn ActiveGameRepository + Send + Sync>,
        session_token_repository: Arc<dyn SessionTokenRepository + Send + Sync>,
        room_command_repository: Arc<dyn RoomCommandRepository + Send + Sync>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            room_repository,
            active_game_repository,
            session_token_repository,
            room_command_repository,
            token_service,
            ws_url: game_server_ws_url(),
        }
    }

    /// Creates the room for a freshly formed match. Ordering matters for
    /// crash safety: the durable room lands first, then tokens and
    /// active-game pointers, and the creation command goes out last so the
    /// game server never sees a room whose players cannot authenticate.
    pub async fn create_room(
        &self,
        game_match: &Match,
        game_type: &GameType,
    ) -> Result<RoomData, RoomServiceError> {
        let room = Room::new(
            &game_match.game_type_id,
            game_type.player_count,
            &game_match.player_ids,
        );
        self.room_repository.create_room(&room).await?;

        let mut room_tokens = HashMap::new();
        for user_id in &game_match.player_ids {
            let token = self
                .token_service
                .mint_room_token(user_id, &room.room_id)?;
            let record = SessionTokenRecord {
                room_id: room.room_id.clone(),
                user_id: user_id.clone(),
                purpose: TokenPurpose::RoomToken,
            };
            self.session_token_repository
                .store(&token, &record, ROOM_TOKEN_TTL_SECONDS)
                .await?;

            self.active_game_repository
                .put(
                    user_id,
                    &ActiveGameRecord {
                        room_id: room.room_id.clone(),
                        room_token: token.clone(),
                        ws_url: self.ws_url.clone(),
                        game_type_id: room.game_type_id.clone(),
                        status: room.status.as_str().to_string(),
                    },
                )
                .await?;

            room_tokens.insert(user_id.clone(), token);
        }

        self.room_command_repository
            .push(&RoomCreationCommand {
                room_id: room.room_id.clone(),
                game_type_id: room.game_type_id.clone(),
                player_ids: room.player_ids(),
                config: RoomCommandConfig {
                    player_count: game_type.player_count,
                    turn_time_limit: game_type.turn_time_limit,
                },
                enqueued_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            room_id = %room.room_id,
            game_type_id = %room.game_type_id,
            players = room.players.len(),
            "Room created"
        );

        Ok(RoomData {
            room,
            room_tokens,
            ws_url: self.ws_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::active_game_repository::tests::InMemoryActiveGameRepository;
    use crate::repositories::room_command_repository::tests::InMemoryRoomCommandRepository;
    use crate::repositories::room_repository::tests::InMemoryRoomRepository;
    use crate::repositories::session_token_repository::tests::InMemorySessionTokenRepository;
    use crate::models::room::RoomStatus;

    fn game_type() -> GameType {
        GameType {
            game_type_id: "gt-1".to_string(),
            name: "Standard".to_string(),
            player_count: 2,
            turn_time_limit: 30,
            active: true,
        }
    }

    fn service(
        rooms: Arc<InMemoryRoomRepository>,
        active: Arc<InMemoryActiveGameRepository>,
        tokens: Arc<InMemorySessionTokenRepository>,
        commands: Arc<InMemoryRoomCommandRepository>,
    ) -> RoomCreationService {
        RoomCreationService::new(
            rooms,
            active,
            tokens,
            commands,
            Arc::new(TokenService::with_jwt_secret("test-secret".to_string())),
        )
    }

    #[tokio::test]
    async fn test_create_room_seeds_everything() {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let active = Arc::new(InMemoryActiveGameRepository::new());
        let tokens = Arc::new(InMemorySessionTokenRepository::new());
        let commands = Arc::new(InMemoryRoomCommandRepository::new());
        let service = service(
            Arc::clone(&rooms),
            Arc::clone(&active),
            Arc::clone(&tokens),
            Arc::clone(&commands),
        );

        let game_match = Match::matched("gt-1", vec!["a".to_string(), "b".to_string()]);
        let data = service.create_room(&game_match, &game_type()).await.unwrap();

        assert_eq!(data.room.status, RoomStatus::Preparing);
        assert_eq!(data.room_tokens.len(), 2);
        assert!(data.room_tokens.contains_key("a"));

        let stored = rooms.stored_room(&data.room.room_id).unwrap();
        assert_eq!(stored.players.len(), 2);

        assert!(active.contains("a"));
        assert!(active.contains("b"));
        assert_eq!(tokens.count(), 2);

        let pushed = commands.commands();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].room_id, data.room.room_id);
        assert_eq!(pushed[0].config.player_count, 2);
    }

    #[tokio::test]
    async fn test_room_tokens_are_scoped_to_the_room() {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let tokens = Arc::new(InMemorySessionTokenRepository::new());
        let service = service(
            Arc::clone(&rooms),
            Arc::new(InMemoryActiveGameRepository::new()),
            Arc::clone(&tokens),
            Arc::new(InMemoryRoomCommandRepository::new()),
        );

        let game_match = Match::matched("gt-1", vec!["a".to_string(), "b".to_string()]);
        let data = service.create_room(&game_match, &game_type()).await.unwrap();

        let verifier = TokenService::with_jwt_secret("test-secret".to_string());
        let claims = verifier
            .verify(&data.room_tokens["a"], TokenPurpose::RoomToken)
            .unwrap();
        assert_eq!(claims.sub, "a");
        assert_eq!(claims.room_id.as_deref(), Some(data.room.room_id.as_str()));
    }
}
