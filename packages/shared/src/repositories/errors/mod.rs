pub mod game_result_repository_errors;
pub mod game_type_repository_errors;
pub mod match_repository_errors;
pub mod room_repository_errors;
pub mod store_errors;
