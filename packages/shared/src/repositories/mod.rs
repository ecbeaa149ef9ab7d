pub mod active_game_repository;
pub mod errors;
pub mod game_result_repository;
pub mod game_type_repository;
pub mod match_repository;
pub mod persist_failure_repository;
pub mod queue_repository;
pub mod room_command_repository;
pub mod room_repository;
pub mod session_token_repository;
