use std::sync::Arc;

use crate::config::PERSIST_STALE_THRESHOLD_SECONDS;
use crate::models::game_result::GameResult;
use crate::models::persist_failure::PersistFailureRecord;
use crate::models::room::{PlayerResult, Room, RoomStatus};
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;
use crate::repositories::persist_failure_repository::PersistFailureRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::services::errors::recovery_service_errors::RecoveryServiceError;

/// Outcome counters for one recovery sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Parked results landed durably (or found already landed).
    pub recovered: usize,
    /// Records past the staleness threshold, logged and left alone.
    pub stale: usize,
    /// Records pointing at rooms that no longer exist.
    pub discarded: usize,
}

/// Replays parked terminal results that failed their durable write. Each
/// fresh record is replayed exactly once; staleness is a hard line past
/// which a record is only reported, never applied.
pub struct RecoveryService {
    persist_failure_repository: Arc<dyn PersistFailureRepository + Send + Sync>,
    room_repository: Arc<dyn RoomRepository + Send + Sync>,
}

impl RecoveryService {
    pub fn new(
        persist_failure_repository: Arc<dyn PersistFailureRepository + Send + Sync>,
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
    ) -> Self {
        Self {
            persist_failure_repository,
            room_repository,
        }
    }

    pub async fn run_sweep(&self) -> Result<RecoveryReport, RecoveryServiceError> {
        let mut report = RecoveryReport::default();
        for record in self.persist_failure_repository.scan().await? {
            if record.age_seconds > PERSIST_STALE_THRESHOLD_SECONDS {
                tracing::warn!(
                    room_id = %record.room_id,
                    age_seconds = record.age_seconds,
                    "Parked result too stale to replay"
                );
                report.stale += 1;
                continue;
            }

            match self.replay(&record).await {
                Ok(Replayed::Landed) => {
                    self.persist_failure_repository
                        .delete(&record.room_id)
                        .await?;
                    report.recovered += 1;
                }
                Ok(Replayed::RoomGone) => {
                    tracing::warn!(room_id = %record.room_id, "Parked result for missing room, discarding");
                    self.persist_failure_repository
                        .delete(&record.room_id)
                        .await?;
                    report.discarded += 1;
                }
                Err(err) => {
                    // Leave the record for the next sweep.
                    tracing::error!(room_id = %record.room_id, error = %err, "Replay failed");
                }
            }
        }

        tracing::info!(
            recovered = report.recovered,
            stale = report.stale,
            discarded = report.discarded,
            "Recovery sweep complete"
        );
        Ok(report)
    }

    async fn replay(&self, record: &PersistFailureRecord) -> Result<Replayed, RoomRepositoryError> {
        let room = match self.room_repository.get_room(&record.room_id).await? {
            Some(room) => room,
            None => return Ok(Replayed::RoomGone),
        };

        let finished = finished_from_record(&room, record);
        let result = GameResult::new(
            &record.room_id,
            record.payload.winner_id.clone(),
            record.payload.turns_played,
            record.payload.duration_seconds,
        );

        match self
            .room_repository
            .finish_with_result(&finished, &result)
            .await
        {
            Ok(()) => {
                tracing::info!(room_id = %record.room_id, "Parked result recovered");
                Ok(Replayed::Landed)
            }
            // A retry already landed it; the parked copy is redundant.
            Err(RoomRepositoryError::ResultAlreadyExists) => Ok(Replayed::Landed),
            Err(err) => Err(err),
        }
    }
}

enum Replayed {
    Landed,
    RoomGone,
}

fn finished_from_record(room: &Room, record: &PersistFailureRecord) -> Room {
    let mut finished = room.clone();
    finished.status = RoomStatus::Finished;
    finished.finished_at = Some(record.payload.finished_at);
    for player in &mut finished.players {
        if let Some(raw) = record.payload.player_results.get(&player.user_id) {
            player.result = PlayerResult::parse(raw);
        }
    }
    finished
}
