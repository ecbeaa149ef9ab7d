use axum::{routing::get, Router};
use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use shared::repositories::active_game_repository::RedisActiveGameRepository;
use shared::repositories::game_result_repository::DynamoDbGameResultRepository;
use shared::repositories::game_type_repository::DynamoDbGameTypeRepository;
use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::persist_failure_repository::RedisPersistFailureRepository;
use shared::repositories::queue_repository::RedisQueueRepository;
use shared::repositories::room_command_repository::RedisRoomCommandRepository;
use shared::repositories::room_repository::DynamoDbRoomRepository;
use shared::repositories::session_token_repository::RedisSessionTokenRepository;
use shared::services::audit::TracingAuditSink;
use shared::services::matchmaking_service::MatchmakingService;
use shared::services::room_creation_service::RoomCreationService;
use shared::services::room_lifecycle_service::RoomLifecycleService;
use shared::services::token_service::TokenService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let redis_client = redis::Client::open(redis_url)?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;

    let internal_api_key = std::env::var("INTERNAL_API_KEY")?;

    let queue_repository = Arc::new(RedisQueueRepository::new(redis_conn.clone()));
    let active_game_repository = Arc::new(RedisActiveGameRepository::new(redis_conn.clone()));
    let session_token_repository = Arc::new(RedisSessionTokenRepository::new(redis_conn.clone()));
    let room_command_repository = Arc::new(RedisRoomCommandRepository::new(redis_conn.clone()));
    let persist_failure_repository = Arc::new(RedisPersistFailureRepository::new(redis_conn));

    let room_repository = Arc::new(DynamoDbRoomRepository::new(client.clone()));
    let match_repository = Arc::new(DynamoDbMatchRepository::new(client.clone()));
    let game_result_repository = Arc::new(DynamoDbGameResultRepository::new(client.clone()));
    let game_type_repository = Arc::new(DynamoDbGameTypeRepository::new(client));

    let token_service = Arc::new(TokenService::new());

    let room_creation_service = Arc::new(RoomCreationService::new(
        room_repository.clone(),
        active_game_repository.clone(),
        session_token_repository.clone(),
        room_command_repository,
        token_service.clone(),
    ));

    let matchmaking_service = Arc::new(MatchmakingService::new(
        queue_repository,
        active_game_repository.clone(),
        game_type_repository,
        room_repository.clone(),
        match_repository.clone(),
        room_creation_service,
    ));

    let room_lifecycle_service = Arc::new(RoomLifecycleService::new(
        room_repository.clone(),
        match_repository,
        game_result_repository,
        active_game_repository,
        persist_failure_repository,
        Arc::new(TracingAuditSink),
    ));

    let app_state = state::AppState {
        token_service,
        matchmaking_service,
        room_lifecycle_service,
        room_repository,
        session_token_repository,
        internal_api_key,
    };

    // Configure CORS
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/health", get(routes::health::health_check))
                .merge(routes::matchmaking::routes())
                .merge(routes::rooms::routes()),
        )
        .nest(
            "/internal",
            Router::new()
                .merge(routes::internal_rooms::routes())
                .merge(routes::internal_auth::routes()),
        )
        .layer(cors)
        .with_state(app_state);

    run(app).await
}
