pub mod matchmaking_service_errors;
pub mod recovery_service_errors;
pub mod room_service_errors;
pub mod token_service_errors;
