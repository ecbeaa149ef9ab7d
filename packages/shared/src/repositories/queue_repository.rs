use async_trait::async_trait;
use chrono::DateTime;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::models::queue::{QueueEntry, QueueMembership};
use crate::repositories::errors::store_errors::QueueStoreError;

fn queue_key(game_type_id: &str) -> String {
    format!("matchmaking:queue:{}", game_type_id)
}

fn user_key(user_id: &str) -> String {
    format!("matchmaking:user:{}", user_id)
}

const USER_KEY_PREFIX: &str = "matchmaking:user:";

/// Pops `count` entries from the tail of the queue, or nothing at all when
/// fewer are waiting. The length check runs inside the script so two
/// concurrent matchers can never both observe "just enough" players.
const POP_READY_SCRIPT: &str = r#"
local queue_key = KEYS[1]
local count = tonumber(ARGV[1])
if redis.call('LLEN', queue_key) < count then
  return {}
end
local entries = {}
for i = 1, count do
  table.insert(entries, redis.call('RPOP', queue_key))
end
return entries
"#;

#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Appends a queue entry and writes the TTL-bearing membership record.
    async fn enqueue(
        &self,
        game_type_id: &str,
        entry: &QueueEntry,
        ttl_seconds: i64,
    ) -> Result<(), QueueStoreError>;

    /// Atomically pops `required_players` entries, oldest first.
    /// All-or-nothing: a short queue pops nothing.
    async fn pop_ready(
        &self,
        game_type_id: &str,
        required_players: usize,
    ) -> Result<Vec<QueueEntry>, QueueStoreError>;

    /// Removes a single user's entry from a queue, if present.
    async fn remove_entry(&self, game_type_id: &str, user_id: &str)
        -> Result<(), QueueStoreError>;

    async fn get_membership(&self, user_id: &str)
        -> Result<Option<QueueMembership>, QueueStoreError>;

    async fn clear_membership(&self, user_id: &str) -> Result<(), QueueStoreError>;

    /// All live membership records, for the expiry sweep.
    async fn scan_memberships(&self) -> Result<Vec<QueueMembership>, QueueStoreError>;
}

pub struct RedisQueueRepository {
    conn: ConnectionManager,
}

impl RedisQueueRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

fn membership_from_hash(
    user_id: &str,
    fields: std::collections::HashMap<String, String>,
) -> Result<Option<QueueMembership>, QueueStoreError> {
    if fields.is_empty() {
        return Ok(None);
    }
    let game_type_id = match fields.get("game_type_id") {
        Some(v) => v.clone(),
        None => return Ok(None),
    };
    let queued_at = fields
        .get("queued_at")
        .ok_or_else(|| QueueStoreError::Serialization("queued_at missing".to_string()))?;
    let queued_at = DateTime::parse_from_rfc3339(queued_at)
        .map_err(|e| QueueStoreError::Serialization(e.to_string()))?
        .with_timezone(&chrono::Utc);

    Ok(Some(QueueMembership {
        user_id: user_id.to_string(),
        game_type_id,
        queued_at,
    }))
}

#[async_trait]
impl QueueRepository for RedisQueueRepository {
    async fn enqueue(
        &self,
        game_type_id: &str,
        entry: &QueueEntry,
        ttl_seconds: i64,
    ) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let json =
            serde_json::to_string(entry).map_err(|e| QueueStoreError::Serialization(e.to_string()))?;

        let _: () = conn.lpush(queue_key(game_type_id), json).await?;

        let key = user_key(&entry.user_id);
        let queued_at = entry.queued_at.to_rfc3339();
        let _: () = conn
            .hset_multiple(
                &key,
                &[
                    ("game_type_id", game_type_id),
                    ("queued_at", queued_at.as_str()),
                ],
            )
            .await?;
        let _: () = conn.expire(&key, ttl_seconds).await?;

        Ok(())
    }

    async fn pop_ready(
        &self,
        game_type_id: &str,
        required_players: usize,
    ) -> Result<Vec<QueueEntry>, QueueStoreError> {
        let mut conn = self.conn.clone();
        let script = redis::Script::new(POP_READY_SCRIPT);
        let raw: Vec<String> = script
            .key(queue_key(game_type_id))
            .arg(required_players)
            .invoke_async(&mut conn)
            .await?;

        raw.iter()
            .map(|json| {
                serde_json::from_str(json).map_err(|e| QueueStoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn remove_entry(
        &self,
        game_type_id: &str,
        user_id: &str,
    ) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let key = queue_key(game_type_id);
        let entries: Vec<String> = conn.lrange(&key, 0, -1).await?;

        for raw in entries {
            let parsed: QueueEntry = match serde_json::from_str(&raw) {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if parsed.user_id == user_id {
                let _: () = conn.lrem(&key, 1, raw).await?;
                break;
            }
        }

        Ok(())
    }

    async fn get_membership(
        &self,
        user_id: &str,
    ) -> Result<Option<QueueMembership>, QueueStoreError> {
        let mut conn = self.conn.clone();
        let fields: std::collections::HashMap<String, String> =
            conn.hgetall(user_key(user_id)).await?;
        membership_from_hash(user_id, fields)
    }

    async fn clear_membership(&self, user_id: &str) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(user_key(user_id)).await?;
        Ok(())
    }

    async fn scan_memberships(&self) -> Result<Vec<QueueMembership>, QueueStoreError> {
        let mut scan_conn = self.conn.clone();
        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = scan_conn
                .scan_match::<_, String>(format!("{}*", USER_KEY_PREFIX))
                .await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        let mut memberships = Vec::new();
        for key in keys {
            let user_id = key.trim_start_matches(USER_KEY_PREFIX).to_string();
            let mut conn = self.conn.clone();
            let fields: std::collections::HashMap<String, String> = conn.hgetall(&key).await?;
            if let Some(membership) = membership_from_hash(&user_id, fields)? {
                memberships.push(membership);
            }
        }

        Ok(memberships)
    }
}
