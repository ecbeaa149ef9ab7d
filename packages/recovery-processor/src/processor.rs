use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use lambda_runtime::Error;
use std::sync::Arc;
use tracing::{debug, error, info};

use shared::services::matchmaking_service::MatchmakingService;
use shared::services::recovery_service::RecoveryService;
use shared::services::room_lifecycle_service::RoomLifecycleService;

/// Scheduled janitor for the matchmaking core. Every tick runs three
/// independent sweeps; one sweep failing must not starve the others.
#[derive(Clone)]
pub struct RecoveryProcessor {
    recovery_service: Arc<RecoveryService>,
    matchmaking_service: Arc<MatchmakingService>,
    room_lifecycle_service: Arc<RoomLifecycleService>,
}

impl RecoveryProcessor {
    pub fn new(
        recovery_service: Arc<RecoveryService>,
        matchmaking_service: Arc<MatchmakingService>,
        room_lifecycle_service: Arc<RoomLifecycleService>,
    ) -> Self {
        Self {
            recovery_service,
            matchmaking_service,
            room_lifecycle_service,
        }
    }

    pub async fn process_event(&self, event: CloudWatchEvent) -> Result<(), Error> {
        debug!(
            "Recovery tick triggered by {:?} at {:?}",
            event.source, event.time
        );

        match self.recovery_service.run_sweep().await {
            Ok(report) => info!(
                recovered = report.recovered,
                stale = report.stale,
                discarded = report.discarded,
                "Persist-failure sweep done"
            ),
            Err(e) => error!("Persist-failure sweep failed: {}", e),
        }

        match self.matchmaking_service.cleanup_expired_entries().await {
            Ok(removed) => info!(removed, "Queue cleanup done"),
            Err(e) => error!("Queue cleanup failed: {}", e),
        }

        match self.room_lifecycle_service.sweep_preparing_rooms().await {
            Ok(failed) => info!(failed, "Preparing-room watchdog done"),
            Err(e) => error!("Preparing-room watchdog failed: {}", e),
        }

        Ok(())
    }
}
