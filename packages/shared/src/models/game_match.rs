use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Queued,
    Matched,
    Cancelled,
    Timeout,
}

/// The outcome of gathering enough queued players for one game instance.
/// Immutable once matched, except for the room id backfill and a later
/// `Timeout` mark when room preparation fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    pub game_type_id: String,
    pub room_id: Option<String>,
    pub status: MatchStatus,
    pub player_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn matched(game_type_id: &str, player_ids: Vec<String>) -> Self {
        Match {
            match_id: Uuid::new_v4().to_string(),
            game_type_id: game_type_id.to_string(),
            room_id: None,
            status: MatchStatus::Matched,
            player_ids,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_constructor() {
        let m = Match::matched("gt-1", vec!["a".into(), "b".into()]);

        assert_eq!(m.status, MatchStatus::Matched);
        assert!(m.room_id.is_none());
        assert_eq!(m.player_ids, vec!["a".to_string(), "b".to_string()]);
    }
}
