pub mod audit;
pub mod errors;
pub mod matchmaking_service;
pub mod recovery_service;
pub mod room_creation_service;
pub mod room_lifecycle_service;
pub mod token_service;
