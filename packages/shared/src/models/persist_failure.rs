use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Durable fallback written when the terminal result write could not be
/// committed (`persist_failed:{room_id}`). The recovery sweep replays it
/// exactly once while it is fresh; past the staleness threshold it is only
/// logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistFailurePayload {
    pub winner_id: Option<String>,
    pub turns_played: u32,
    pub duration_seconds: u32,
    pub player_results: HashMap<String, String>,
    pub finished_at: DateTime<Utc>,
}

/// A scanned record plus how long ago it was written, derived from the
/// remaining TTL.
#[derive(Debug, Clone)]
pub struct PersistFailureRecord {
    pub room_id: String,
    pub payload: PersistFailurePayload,
    pub age_seconds: i64,
}
