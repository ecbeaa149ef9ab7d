pub mod active_game;
pub mod callbacks;
pub mod game_match;
pub mod game_result;
pub mod game_type;
pub mod matchmaking;
pub mod persist_failure;
pub mod queue;
pub mod room;
pub mod room_command;
pub mod token;
