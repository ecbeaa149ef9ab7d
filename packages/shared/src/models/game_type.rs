use serde::{Deserialize, Serialize};

/// A playable game configuration. Owned by an external CRUD surface; the
/// core only reads it to size matches and configure rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameType {
    pub game_type_id: String,
    pub name: String,
    pub player_count: u32,
    pub turn_time_limit: u32,
    pub active: bool,
}
