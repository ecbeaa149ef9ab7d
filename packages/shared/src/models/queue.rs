use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload stored in a per-game-type queue list. Serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub user_id: String,
    pub queued_at: DateTime<Utc>,
}

impl QueueEntry {
    pub fn new(user_id: &str) -> Self {
        QueueEntry {
            user_id: user_id.to_string(),
            queued_at: Utc::now(),
        }
    }
}

/// Per-user membership record (`matchmaking:user:{user_id}` hash). Carries a
/// TTL in the store; a user holds at most one across all game types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMembership {
    pub user_id: String,
    pub game_type_id: String,
    pub queued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_entry_round_trip() {
        let entry = QueueEntry::new("user-1");
        let json = serde_json::to_string(&entry).unwrap();
        let back: QueueEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(back, entry);
    }
}
