use chrono::Utc;
use std::sync::Arc;

use crate::config::ROOM_PREPARING_TIMEOUT_SECONDS;
use crate::models::callbacks::GameFinishedRequest;
use crate::models::game_match::MatchStatus;
use crate::models::game_result::GameResult;
use crate::models::persist_failure::PersistFailurePayload;
use crate::models::room::{PlayerResult, Room, RoomStatus};
use crate::repositories::active_game_repository::ActiveGameRepository;
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;
use crate::repositories::game_result_repository::GameResultRepository;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::persist_failure_repository::PersistFailureRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::services::audit::AuditSink;
use crate::services::errors::room_service_errors::RoomServiceError;

/// Drives rooms through their lifecycle from the game server's callbacks,
/// and runs the watchdog that fails rooms stuck in `preparing`. Every
/// transition is idempotent: replaying a callback acknowledges without
/// mutating terminal state.
pub struct RoomLifecycleService {
    room_repository: Arc<dyn RoomRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    game_result_repository: Arc<dyn GameResultRepository + Send + Sync>,
    active_game_repository: Arc<dyn ActiveGameRepository + Send + Sync>,
    persist_failure_repository: Arc<dyn PersistFailureRepository + Send + Sync>,
    audit: Arc<dyn AuditSink>,
}

impl RoomLifecycleService {
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        game_result_repository: Arc<dyn GameResultRepository + Send + Sync>,
        active_game_repository: Arc<dyn ActiveGameRepository + Send + Sync>,
        persist_failure_repository: Arc<dyn PersistFailureRepository + Send + Sync>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            room_repository,
            match_repository,
            game_result_repository,
            active_game_repository,
            persist_failure_repository,
            audit,
        }
    }

    async fn load_room(&self, room_id: &str) -> Result<Room, RoomServiceError> {
        self.room_repository
            .get_room(room_id)
            .await?
            .ok_or(RoomServiceError::RoomNotFound)
    }

    /// The game server finished preparing the room on `node_name`.
    pub async fn room_ready(
        &self,
        room_id: &str,
        node_name: &str,
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.load_room(room_id).await?;

        match room.status {
            RoomStatus::Preparing | RoomStatus::Ready => {}
            other => {
                return Err(RoomServiceError::InvalidTransition {
                    from: other.as_str().to_string(),
                    to: "ready".to_string(),
                })
            }
        }

        room.status = RoomStatus::Ready;
        room.node_name = Some(node_name.to_string());
        self.room_repository.update_room(&room).await?;
        self.set_active_statuses(&room).await?;

        self.audit.record("room_ready", room_id, node_name);
        Ok(room)
    }

    /// All players connected and the game began. The provided player set
    /// must equal the seated set, order-insensitively.
    pub async fn game_started(
        &self,
        room_id: &str,
        player_ids: &[String],
    ) -> Result<Room, RoomServiceError> {
        let mut room = self.load_room(room_id).await?;

        let mut expected = room.player_ids();
        expected.sort();
        let mut provided = player_ids.to_vec();
        provided.sort();
        provided.dedup();
        if expected != provided {
            return Err(RoomServiceError::PlayerMismatch { expected, provided });
        }

        match room.status {
            RoomStatus::Preparing | RoomStatus::Ready => {}
            RoomStatus::Playing => return Ok(room),
            other => {
                return Err(RoomServiceError::InvalidTransition {
                    from: other.as_str().to_string(),
                    to: "playing".to_string(),
                })
            }
        }

        room.status = RoomStatus::Playing;
        room.started_at = Some(Utc::now());
        self.room_repository.update_room(&room).await?;
        self.set_active_statuses(&room).await?;

        self.audit.record("game_started", room_id, "");
        Ok(room)
    }

    /// The game ended. Writes the finished room and its result atomically;
    /// a replayed callback returns the existing result untouched. When the
    /// durable write fails, the payload is parked in the persist-failure
    /// store for the recovery sweep and the error is surfaced so the game
    /// server retries.
    pub async fn game_finished(
        &self,
        room_id: &str,
        payload: &GameFinishedRequest,
    ) -> Result<GameResult, RoomServiceError> {
        let room = self.load_room(room_id).await?;

        if let Some(existing) = self.game_result_repository.get_by_room(room_id).await? {
            self.cleanup_active_games(&room).await?;
            return Ok(existing);
        }

        // A room can fail or abort before its result arrives; that outcome
        // stands.
        if room.status.is_terminal() {
            return Err(RoomServiceError::InvalidTransition {
                from: room.status.as_str().to_string(),
                to: "finished".to_string(),
            });
        }

        let finished = finished_room(&room, payload);
        let result = GameResult::new(
            room_id,
            payload.winner_id.clone(),
            payload.turns_played,
            payload.duration_seconds,
        );

        match self
            .room_repository
            .finish_with_result(&finished, &result)
            .await
        {
            Ok(()) => {
                self.cleanup_active_games(&finished).await?;
                self.audit.record("game_finished", room_id, "");
                Ok(result)
            }
            Err(RoomRepositoryError::ResultAlreadyExists) => {
                // Lost the race against a concurrent replay.
                let existing = self
                    .game_result_repository
                    .get_by_room(room_id)
                    .await?
                    .ok_or_else(|| {
                        RoomServiceError::RepositoryError(
                            "result row vanished after conflict".to_string(),
                        )
                    })?;
                self.cleanup_active_games(&room).await?;
                Ok(existing)
            }
            Err(err) => {
                tracing::error!(room_id, error = %err, "Terminal result write failed, parking payload");
                self.persist_failure_repository
                    .write(
                        room_id,
                        &PersistFailurePayload {
                            winner_id: payload.winner_id.clone(),
                            turns_played: payload.turns_played,
                            duration_seconds: payload.duration_seconds,
                            player_results: payload.player_results.clone(),
                            finished_at: Utc::now(),
                        },
                    )
                    .await?;
                Err(RoomServiceError::TerminalWriteFailed(err.to_string()))
            }
        }
    }

    /// The game server gave up on the room. Marks every seat aborted.
    /// Replaying against a room already terminal acknowledges as-is.
    pub async fn game_aborted(&self, room_id: &str) -> Result<Room, RoomServiceError> {
        let mut room = self.load_room(room_id).await?;
        if room.status.is_terminal() {
            return Ok(room);
        }

        room.status = RoomStatus::Aborted;
        room.finished_at = Some(Utc::now());
        for player in &mut room.players {
            player.result = Some(PlayerResult::Aborted);
        }
        self.room_repository.update_room(&room).await?;
        self.cleanup_active_games(&room).await?;

        self.audit.record("game_aborted", room_id, "");
        Ok(room)
    }

    /// Fails rooms stuck in `preparing` past the timeout: the room goes to
    /// `failed`, its match to `timeout`, and the players are released.
    pub async fn sweep_preparing_rooms(&self) -> Result<usize, RoomServiceError> {
        let now = Utc::now();
        let mut failed = 0;
        for mut room in self
            .room_repository
            .list_by_status(RoomStatus::Preparing)
            .await?
        {
            let age = now.signed_duration_since(room.created_at).num_seconds();
            if age <= ROOM_PREPARING_TIMEOUT_SECONDS {
                continue;
            }

            tracing::warn!(room_id = %room.room_id, age, "Failing room stuck in preparing");
            room.status = RoomStatus::Failed;
            self.room_repository.update_room(&room).await?;
            self.cleanup_active_games(&room).await?;

            if let Some(game_match) = self.match_repository.find_by_room(&room.room_id).await? {
                self.match_repository
                    .set_status(&game_match.match_id, MatchStatus::Timeout)
                    .await?;
            }

            self.audit.record("room_failed", &room.room_id, "preparing timeout");
            failed += 1;
        }
        Ok(failed)
    }

    /// Mirrors the room status into each player's active-game pointer.
    async fn set_active_statuses(&self, room: &Room) -> Result<(), RoomServiceError> {
        for player in &room.players {
            self.active_game_repository
                .set_status(&player.user_id, room.status.as_str())
                .await?;
        }
        Ok(())
    }

    /// Drops each seat's active-game pointer, but only when it still points
    /// at this room; a replayed terminal callback must not evict a pointer
    /// into a newer game.
    async fn cleanup_active_games(&self, room: &Room) -> Result<(), RoomServiceError> {
        for player in &room.players {
            if let Some(record) = self.active_game_repository.get(&player.user_id).await? {
                if record.room_id == room.room_id {
                    self.active_game_repository.delete(&player.user_id).await?;
                }
            }
        }
        Ok(())
    }
}

/// A copy of the room carrying the terminal state for the atomic write.
fn finished_room(room: &Room, payload: &GameFinishedRequest) -> Room {
    let mut finished = room.clone();
    finished.status = RoomStatus::Finished;
    finished.finished_at = Some(Utc::now());
    for player in &mut finished.players {
        if let Some(raw) = payload.player_results.get(&player.user_id) {
            // Unknown result strings are dropped, not rejected.
            player.result = PlayerResult::parse(raw);
        }
    }
    finished
}
