//! Application-wide constants. Values shared with the game server or the
//! client are called out and must be kept in sync with those codebases.

/// TTL on a user's `matchmaking:user:{user_id}` membership record.
pub const MATCHMAKING_USER_TTL_SECONDS: i64 = 120;

/// How long a player may sit in a queue before a status poll auto-cancels
/// them. The client shows the same value as its lobby countdown fallback.
pub const MATCHMAKING_QUEUE_TIMEOUT_SECONDS: i64 = 60;

/// Lifetime of a room token (first join credential).
pub const ROOM_TOKEN_TTL_SECONDS: i64 = 300;

/// Lifetime of a reconnect token. Rotated on every successful (re)join.
pub const RECONNECT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Grace period for a room to leave `preparing` before the watchdog marks
/// it failed. Matches the game server's room boot budget.
pub const ROOM_PREPARING_TIMEOUT_SECONDS: i64 = 15;

/// Hard TTL on a `persist_failed:{room_id}` record. After this the result
/// is considered permanently lost.
pub const PERSIST_FAILED_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Persist-failure records older than this are skipped by the recovery
/// sweep and left for alerted follow-up.
pub const PERSIST_STALE_THRESHOLD_SECONDS: i64 = 30 * 60;

/// Delay before the client's single automatic reconnection attempt.
pub const AUTO_RECONNECT_DELAY_MS: u64 = 2000;

/// Port the game server exposes websockets on when a room reports only a
/// node name.
pub const DEFAULT_GAME_SERVER_WS_PORT: u16 = 4000;

/// Fallback websocket endpoint when a room has not reported its node yet.
pub fn game_server_ws_url() -> String {
    std::env::var("GAME_SERVER_WS_URL").unwrap_or_else(|_| "ws://localhost:4000/socket".to_string())
}
