use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a room. Transitions move forward only, except that
/// any non-terminal state may drop into `Aborted`, and `Preparing` may be
/// failed by the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Preparing,
    Ready,
    Playing,
    Finished,
    Aborted,
    Failed,
}

impl RoomStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RoomStatus::Finished | RoomStatus::Aborted | RoomStatus::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Preparing => "preparing",
            RoomStatus::Ready => "ready",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
            RoomStatus::Aborted => "aborted",
            RoomStatus::Failed => "failed",
        }
    }
}

/// Per-seat outcome, written exactly once at finish/abort time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerResult {
    Winner,
    Loser,
    Draw,
    Aborted,
}

impl PlayerResult {
    /// Parses a result string from the game server's `finished` callback.
    /// Unknown values yield `None` and are dropped by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "winner" | "win" => Some(PlayerResult::Winner),
            "loser" | "lose" => Some(PlayerResult::Loser),
            "draw" => Some(PlayerResult::Draw),
            "aborted" => Some(PlayerResult::Aborted),
            _ => None,
        }
    }
}

/// One seat in a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPlayer {
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
    pub result: Option<PlayerResult>,
}

/// The lifecycle container for one played game instance. Seats are embedded
/// so the room is a single durable item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub game_type_id: String,
    pub status: RoomStatus,
    pub node_name: Option<String>,
    pub player_count: u32,
    pub players: Vec<RoomPlayer>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Room {
    pub fn new(game_type_id: &str, player_count: u32, user_ids: &[String]) -> Self {
        let now = Utc::now();
        Room {
            room_id: Uuid::new_v4().to_string(),
            game_type_id: game_type_id.to_string(),
            status: RoomStatus::Preparing,
            node_name: None,
            player_count,
            players: user_ids
                .iter()
                .map(|user_id| RoomPlayer {
                    user_id: user_id.clone(),
                    joined_at: now,
                    result: None,
                })
                .collect(),
            created_at: now,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players.iter().map(|p| p.user_id.clone()).collect()
    }

    pub fn is_seated(&self, user_id: &str) -> bool {
        self.players.iter().any(|p| p.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_starts_preparing() {
        let room = Room::new("gt-1", 2, &["a".to_string(), "b".to_string()]);

        assert_eq!(room.status, RoomStatus::Preparing);
        assert_eq!(room.players.len(), 2);
        assert!(room.players.iter().all(|p| p.result.is_none()));
        assert!(room.node_name.is_none());
        assert!(!room.room_id.is_empty());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RoomStatus::Finished.is_terminal());
        assert!(RoomStatus::Aborted.is_terminal());
        assert!(RoomStatus::Failed.is_terminal());
        assert!(!RoomStatus::Preparing.is_terminal());
        assert!(!RoomStatus::Ready.is_terminal());
        assert!(!RoomStatus::Playing.is_terminal());
    }

    #[test]
    fn test_player_result_parse_is_lenient() {
        assert_eq!(PlayerResult::parse("win"), Some(PlayerResult::Winner));
        assert_eq!(PlayerResult::parse("winner"), Some(PlayerResult::Winner));
        assert_eq!(PlayerResult::parse("lose"), Some(PlayerResult::Loser));
        assert_eq!(PlayerResult::parse("draw"), Some(PlayerResult::Draw));
        assert_eq!(PlayerResult::parse("rage_quit"), None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&RoomStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
    }
}
