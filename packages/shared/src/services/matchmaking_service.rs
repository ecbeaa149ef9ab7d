use chrono::Utc;
use std::sync::Arc;

use crate::config::{MATCHMAKING_QUEUE_TIMEOUT_SECONDS, MATCHMAKING_USER_TTL_SECONDS};
use crate::models::game_match::Match;
use crate::models::game_type::GameType;
use crate::models::matchmaking::{JoinOutcome, QueueStatusOutcome};
use crate::models::queue::QueueEntry;
use crate::repositories::active_game_repository::ActiveGameRepository;
use crate::repositories::game_type_repository::GameTypeRepository;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::queue_repository::QueueRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::services::errors::matchmaking_service_errors::MatchmakingServiceError;
use crate::services::room_creation_service::RoomCreationService;

/// Queue membership, match formation and the self-healing active-game
/// check. One instance serves every game type.
pub struct MatchmakingService {
    queue_repository: Arc<dyn QueueRepository + Send + Sync>,
    active_game_repository: Arc<dyn ActiveGameRepository + Send + Sync>,
    game_type_repository: Arc<dyn GameTypeRepository + Send + Sync>,
    room_repository: Arc<dyn RoomRepository + Send + Sync>,
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    room_creation_service: Arc<RoomCreationService>,
}

impl MatchmakingService {
    pub fn new(
        queue_repository: Arc<dyn QueueRepository + Send + Sync>,
        active_game_repository: Arc<dyn ActiveGameRepository + Send + Sync>,
        game_type_repository: Arc<dyn GameTypeRepository + Send + Sync>,
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        room_creation_service: Arc<RoomCreationService>,
    ) -> Self {
        Self {
            queue_repository,
            active_game_repository,
            game_type_repository,
            room_repository,
            match_repository,
            room_creation_service,
        }
    }

    /// Joins the queue for a game type and immediately attempts to form a
    /// match. A user already pointing at a live room is bounced back to it;
    /// a pointer at a missing or finished room is stale and gets purged
    /// before the join proceeds.
    pub async fn join_queue(
        &self,
        user_id: &str,
        game_type_id: &str,
    ) -> Result<JoinOutcome, MatchmakingServiceError> {
        if let Some(active) = self.active_game_repository.get(user_id).await? {
            let room = self.room_repository.get_room(&active.room_id).await?;
            match room {
                Some(room) if !room.status.is_terminal() => {
                    return Ok(JoinOutcome::AlreadyInGame(active));
                }
                _ => {
                    tracing::warn!(user_id, room_id = %active.room_id, "Purging stale active game pointer");
                    self.active_game_repository.delete(user_id).await?;
                }
            }
        }

        let game_type = self
            .game_type_repository
            .get(game_type_id)
            .await?
            .filter(|gt| gt.active)
            .ok_or(MatchmakingServiceError::InvalidGameType)?;

        // One membership per user across all game types.
        if let Some(membership) = self.queue_repository.get_membership(user_id).await? {
            return Ok(JoinOutcome::AlreadyQueued {
                queued_at: membership.queued_at,
            });
        }

        let entry = QueueEntry::new(user_id);
        self.queue_repository
            .enqueue(game_type_id, &entry, MATCHMAKING_USER_TTL_SECONDS)
            .await?;

        if let Some(room_data) = self.try_form_match(&game_type).await? {
            if room_data.room.is_seated(user_id) {
                return Ok(JoinOutcome::Matched(room_data));
            }
        }

        Ok(JoinOutcome::Queued {
            game_type_id: game_type_id.to_string(),
            queued_at: entry.queued_at,
            timeout_seconds: MATCHMAKING_QUEUE_TIMEOUT_SECONDS,
        })
    }

    /// Pops a full complement of players if one is waiting and turns it into
    /// a match plus a room. Room creation happens before memberships are
    /// cleared: a crash in between leaves memberships that the next status
    /// poll resolves through the active-game pointer.
    async fn try_form_match(
        &self,
        game_type: &GameType,
    ) -> Result<Option<crate::models::matchmaking::RoomData>, MatchmakingServiceError> {
        let popped = self
            .queue_repository
            .pop_ready(&game_type.game_type_id, game_type.player_count as usize)
            .await?;
        if popped.is_empty() {
            return Ok(None);
        }

        let player_ids: Vec<String> = popped.into_iter().map(|e| e.user_id).collect();
        let game_match = Match::matched(&game_type.game_type_id, player_ids.clone());
        self.match_repository.create_match(&game_match).await?;

        let room_data = self
            .room_creation_service
            .create_room(&game_match, game_type)
            .await?;

        self.match_repository
            .set_room_id(&game_match.match_id, &room_data.room.room_id)
            .await?;
        for user_id in &player_ids {
            self.queue_repository.clear_membership(user_id).await?;
        }

        tracing::info!(
            match_id = %game_match.match_id,
            room_id = %room_data.room.room_id,
            game_type_id = %game_type.game_type_id,
            "Match formed"
        );

        Ok(Some(room_data))
    }

    /// Resolves a user's current matchmaking state. A queue entry older than
    /// the timeout is cancelled on the spot and reported as such.
    pub async fn queue_status(
        &self,
        user_id: &str,
    ) -> Result<QueueStatusOutcome, MatchmakingServiceError> {
        if let Some(active) = self.active_game_repository.get(user_id).await? {
            return Ok(QueueStatusOutcome::Matched(active));
        }

        let membership = match self.queue_repository.get_membership(user_id).await? {
            Some(membership) => membership,
            None => return Ok(QueueStatusOutcome::NotQueued),
        };

        let waited = Utc::now()
            .signed_duration_since(membership.queued_at)
            .num_seconds();
        if waited > MATCHMAKING_QUEUE_TIMEOUT_SECONDS {
            self.cancel_queue(user_id, Some(&membership.game_type_id))
                .await?;
            return Ok(QueueStatusOutcome::Timeout {
                queued_at: membership.queued_at,
            });
        }

        Ok(QueueStatusOutcome::Queued {
            game_type_id: membership.game_type_id,
            queued_at: membership.queued_at,
        })
    }

    /// Removes the user from the queue. Idempotent; with no game type given
    /// it is resolved from the membership record.
    pub async fn cancel_queue(
        &self,
        user_id: &str,
        game_type_id: Option<&str>,
    ) -> Result<(), MatchmakingServiceError> {
        let game_type_id = match game_type_id {
            Some(id) => Some(id.to_string()),
            None => self
                .queue_repository
                .get_membership(user_id)
                .await?
                .map(|m| m.game_type_id),
        };

        if let Some(game_type_id) = game_type_id {
            self.queue_repository
                .remove_entry(&game_type_id, user_id)
                .await?;
        }
        self.queue_repository.clear_membership(user_id).await?;
        Ok(())
    }

    /// Sweeps memberships past the queue timeout. The membership hash
    /// expires on its own; this clears the matching list entries so stale
    /// users can never be popped into a match.
    pub async fn cleanup_expired_entries(&self) -> Result<usize, MatchmakingServiceError> {
        let now = Utc::now();
        let mut removed = 0;
        for membership in self.queue_repository.scan_memberships().await? {
            let waited = now.signed_duration_since(membership.queued_at).num_seconds();
            if waited > MATCHMAKING_QUEUE_TIMEOUT_SECONDS {
                self.cancel_queue(&membership.user_id, Some(&membership.game_type_id))
                    .await?;
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!(removed, "Expired queue entries removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::game_match::MatchStatus;
    use crate::models::queue::QueueMembership;
    use crate::models::room::RoomStatus;
    use crate::repositories::active_game_repository::tests::InMemoryActiveGameRepository;
    use crate::repositories::game_type_repository::tests::InMemoryGameTypeRepository;
    use crate::repositories::match_repository::tests::InMemoryMatchRepository;
    use crate::repositories::queue_repository::tests::InMemoryQueueRepository;
    use crate::repositories::room_command_repository::tests::InMemoryRoomCommandRepository;
    use crate::repositories::room_repository::tests::InMemoryRoomRepository;
    use crate::repositories::session_token_repository::tests::InMemorySessionTokenRepository;
    use crate::services::token_service::TokenService;

    struct Fixture {
        queue: Arc<InMemoryQueueRepository>,
        active: Arc<InMemoryActiveGameRepository>,
        rooms: Arc<InMemoryRoomRepository>,
        matches: Arc<InMemoryMatchRepository>,
        service: MatchmakingService,
    }

    fn fixture_with(player_count: u32) -> Fixture {
        let queue = Arc::new(InMemoryQueueRepository::new());
        let active = Arc::new(InMemoryActiveGameRepository::new());
        let rooms = Arc::new(InMemoryRoomRepository::new());
        let matches = Arc::new(InMemoryMatchRepository::new());
        let game_types = Arc::new(InMemoryGameTypeRepository::new().with_game_type(GameType {
            game_type_id: "gt-1".to_string(),
            name: "Standard".to_string(),
            player_count,
            turn_time_limit: 30,
            active: true,
        }));

        let room_creation = Arc::new(RoomCreationService::new(
            Arc::clone(&rooms) as Arc<dyn RoomRepository + Send + Sync>,
            Arc::clone(&active) as Arc<dyn ActiveGameRepository + Send + Sync>,
            Arc::new(InMemorySessionTokenRepository::new()),
            Arc::new(InMemoryRoomCommandRepository::new()),
            Arc::new(TokenService::with_jwt_secret("test-secret".to_string())),
        ));

        let service = MatchmakingService::new(
            Arc::clone(&queue) as Arc<dyn QueueRepository + Send + Sync>,
            Arc::clone(&active) as Arc<dyn ActiveGameRepository + Send + Sync>,
            game_types,
            Arc::clone(&rooms) as Arc<dyn RoomRepository + Send + Sync>,
            Arc::clone(&matches) as Arc<dyn MatchRepository + Send + Sync>,
            room_creation,
        );

        Fixture {
            queue,
            active,
            rooms,
            matches,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(2)
    }

    #[tokio::test]
    async fn test_first_player_queues_second_player_matches() {
        let f = fixture();

        let first = f.service.join_queue("x", "gt-1").await.unwrap();
        assert!(matches!(first, JoinOutcome::Queued { .. }));

        let second = f.service.join_queue("y", "gt-1").await.unwrap();
        let room_data = match second {
            JoinOutcome::Matched(data) => data,
            other => panic!("expected Matched, got {:?}", other),
        };
        assert!(room_data.room.is_seated("x"));
        assert!(room_data.room.is_seated("y"));

        // The first player discovers the match via a status poll.
        let status = f.service.queue_status("x").await.unwrap();
        match status {
            QueueStatusOutcome::Matched(active) => {
                assert_eq!(active.room_id, room_data.room.room_id)
            }
            other => panic!("expected Matched, got {:?}", other),
        }

        // Memberships are gone and the match row points at the room.
        assert!(f.queue.queue_len("gt-1") == 0);
        let stored = &f.matches.all()[0];
        assert_eq!(stored.room_id.as_deref(), Some(room_data.room.room_id.as_str()));
        assert_eq!(stored.status, MatchStatus::Matched);
    }

    #[tokio::test]
    async fn test_concurrent_joins_form_exactly_one_match() {
        let f = fixture();

        let (a, b) = tokio::join!(
            f.service.join_queue("x", "gt-1"),
            f.service.join_queue("y", "gt-1")
        );
        let outcomes = [a.unwrap(), b.unwrap()];

        let matched = outcomes
            .iter()
            .filter(|o| matches!(o, JoinOutcome::Matched(_)))
            .count();
        assert_eq!(matched, 1);
        assert_eq!(f.matches.all().len(), 1);
        assert_eq!(f.matches.all()[0].player_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_join_with_unknown_game_type_is_rejected() {
        let f = fixture();

        let err = f.service.join_queue("x", "gt-missing").await.unwrap_err();
        assert!(matches!(err, MatchmakingServiceError::InvalidGameType));
    }

    #[tokio::test]
    async fn test_join_while_queued_reports_already_queued() {
        let f = fixture();

        f.service.join_queue("x", "gt-1").await.unwrap();
        let again = f.service.join_queue("x", "gt-1").await.unwrap();

        assert!(matches!(again, JoinOutcome::AlreadyQueued { .. }));
        assert_eq!(f.queue.queue_len("gt-1"), 1);
    }

    #[tokio::test]
    async fn test_short_queue_forms_no_match() {
        let f = fixture_with(4);

        f.service.join_queue("a", "gt-1").await.unwrap();
        f.service.join_queue("b", "gt-1").await.unwrap();
        let third = f.service.join_queue("c", "gt-1").await.unwrap();

        assert!(matches!(third, JoinOutcome::Queued { .. }));
        assert_eq!(f.queue.queue_len("gt-1"), 3);
        assert!(f.matches.all().is_empty());
    }

    #[tokio::test]
    async fn test_live_active_game_blocks_join() {
        let f = fixture();

        f.service.join_queue("x", "gt-1").await.unwrap();
        let data = match f.service.join_queue("y", "gt-1").await.unwrap() {
            JoinOutcome::Matched(data) => data,
            other => panic!("expected Matched, got {:?}", other),
        };

        let rejoin = f.service.join_queue("x", "gt-1").await.unwrap();
        match rejoin {
            JoinOutcome::AlreadyInGame(active) => assert_eq!(active.room_id, data.room.room_id),
            other => panic!("expected AlreadyInGame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_active_game_is_purged_on_join() {
        let f = fixture();

        // Seat the player in a room, then finish it behind the pointer's back.
        f.service.join_queue("x", "gt-1").await.unwrap();
        let data = match f.service.join_queue("y", "gt-1").await.unwrap() {
            JoinOutcome::Matched(data) => data,
            other => panic!("expected Matched, got {:?}", other),
        };
        let mut room = f.rooms.stored_room(&data.room.room_id).unwrap();
        room.status = RoomStatus::Finished;
        f.rooms.insert_room(room);

        let outcome = f.service.join_queue("x", "gt-1").await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Queued { .. }));
        assert!(!f.active.contains("x"));
    }

    #[tokio::test]
    async fn test_pointer_at_missing_room_is_purged_on_join() {
        let f = fixture();
        f.active
            .put(
                "x",
                &crate::models::active_game::ActiveGameRecord {
                    room_id: "room-gone".to_string(),
                    room_token: "t".to_string(),
                    ws_url: "ws://localhost:4000/socket".to_string(),
                    game_type_id: "gt-1".to_string(),
                    status: "preparing".to_string(),
                },
            )
            .await
            .unwrap();

        let outcome = f.service.join_queue("x", "gt-1").await.unwrap();
        assert!(matches!(outcome, JoinOutcome::Queued { .. }));
        assert!(!f.active.contains("x"));
    }

    #[tokio::test]
    async fn test_status_times_out_and_auto_cancels() {
        let f = fixture();
        let queued_at = Utc::now() - Duration::seconds(MATCHMAKING_QUEUE_TIMEOUT_SECONDS + 5);
        f.queue.insert_membership(QueueMembership {
            user_id: "x".to_string(),
            game_type_id: "gt-1".to_string(),
            queued_at,
        });

        let status = f.service.queue_status("x").await.unwrap();
        assert!(matches!(status, QueueStatusOutcome::Timeout { .. }));

        // Auto-cancel already ran; the next poll sees nothing.
        let after = f.service.queue_status("x").await.unwrap();
        assert!(matches!(after, QueueStatusOutcome::NotQueued));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let f = fixture();

        f.service.join_queue("x", "gt-1").await.unwrap();
        f.service.cancel_queue("x", Some("gt-1")).await.unwrap();
        f.service.cancel_queue("x", Some("gt-1")).await.unwrap();

        assert_eq!(f.queue.queue_len("gt-1"), 0);
        let status = f.service.queue_status("x").await.unwrap();
        assert!(matches!(status, QueueStatusOutcome::NotQueued));
    }

    #[tokio::test]
    async fn test_cancel_resolves_game_type_from_membership() {
        let f = fixture();

        f.service.join_queue("x", "gt-1").await.unwrap();
        f.service.cancel_queue("x", None).await.unwrap();

        assert_eq!(f.queue.queue_len("gt-1"), 0);
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_expired_entries() {
        let f = fixture_with(4);

        f.service.join_queue("fresh", "gt-1").await.unwrap();
        let queued_at = Utc::now() - Duration::seconds(MATCHMAKING_QUEUE_TIMEOUT_SECONDS + 30);
        f.queue.insert_membership(QueueMembership {
            user_id: "stale".to_string(),
            game_type_id: "gt-1".to_string(),
            queued_at,
        });

        let removed = f.service.cleanup_expired_entries().await.unwrap();

        assert_eq!(removed, 1);
        let fresh = f.service.queue_status("fresh").await.unwrap();
        assert!(matches!(fresh, QueueStatusOutcome::Queued { .. }));
    }
}
