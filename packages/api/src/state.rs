use std::sync::Arc;

use shared::repositories::room_repository::RoomRepository;
use shared::repositories::session_token_repository::SessionTokenRepository;
use shared::services::matchmaking_service::MatchmakingService;
use shared::services::room_lifecycle_service::RoomLifecycleService;
use shared::services::token_service::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub matchmaking_service: Arc<MatchmakingService>,
    pub room_lifecycle_service: Arc<RoomLifecycleService>,
    pub room_repository: Arc<dyn RoomRepository + Send + Sync>,
    pub session_token_repository: Arc<dyn SessionTokenRepository + Send + Sync>,
    /// Shared secret the game server presents on `/internal` calls.
    pub internal_api_key: String,
}
