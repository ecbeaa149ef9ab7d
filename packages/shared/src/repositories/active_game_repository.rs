use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::models::active_game::ActiveGameRecord;
use crate::repositories::errors::store_errors::QueueStoreError;

fn active_game_key(user_id: &str) -> String {
    format!("active_game:{}", user_id)
}

#[async_trait]
pub trait ActiveGameRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<ActiveGameRecord>, QueueStoreError>;

    /// No TTL: the record lives exactly as long as the room and is deleted
    /// on every terminal transition.
    async fn put(&self, user_id: &str, record: &ActiveGameRecord) -> Result<(), QueueStoreError>;

    /// Updates the mirrored room status, only when the record still exists.
    async fn set_status(&self, user_id: &str, status: &str) -> Result<(), QueueStoreError>;

    async fn delete(&self, user_id: &str) -> Result<(), QueueStoreError>;
}

pub struct RedisActiveGameRepository {
    conn: ConnectionManager,
}

impl RedisActiveGameRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ActiveGameRepository for RedisActiveGameRepository {
    async fn get(&self, user_id: &str) -> Result<Option<ActiveGameRecord>, QueueStoreError> {
        let mut conn = self.conn.clone();
        let fields: std::collections::HashMap<String, String> =
            conn.hgetall(active_game_key(user_id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        let get = |name: &str| -> Result<String, QueueStoreError> {
            fields
                .get(name)
                .cloned()
                .ok_or_else(|| QueueStoreError::Serialization(format!("{} missing", name)))
        };

        Ok(Some(ActiveGameRecord {
            room_id: get("room_id")?,
            room_token: get("room_token")?,
            ws_url: get("ws_url")?,
            game_type_id: get("game_type_id")?,
            status: get("status")?,
        }))
    }

    async fn put(&self, user_id: &str, record: &ActiveGameRecord) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(
                active_game_key(user_id),
                &[
                    ("room_id", record.room_id.as_str()),
                    ("room_token", record.room_token.as_str()),
                    ("ws_url", record.ws_url.as_str()),
                    ("game_type_id", record.game_type_id.as_str()),
                    ("status", record.status.as_str()),
                ],
            )
            .await?;
        Ok(())
    }

    async fn set_status(&self, user_id: &str, status: &str) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let key = active_game_key(user_id);
        let exists: bool = conn.exists(&key).await?;
        if exists {
            let _: () = conn.hset(&key, "status", status).await?;
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(active_game_key(user_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryActiveGameRepository {
        records: Mutex<HashMap<String, ActiveGameRecord>>,
    }

    impl InMemoryActiveGameRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn contains(&self, user_id: &str) -> bool {
            self.records.lock().unwrap().contains_key(user_id)
        }
    }

    #[async_trait]
    impl ActiveGameRepository for InMemoryActiveGameRepository {
        async fn get(&self, user_id: &str) -> Result<Option<ActiveGameRecord>, QueueStoreError> {
            Ok(self.records.lock().unwrap().get(user_id).cloned())
        }

        async fn put(
            &self,
            user_id: &str,
            record: &ActiveGameRecord,
        ) -> Result<(), QueueStoreError> {
            self.records
                .lock()
                .unwrap()
                .insert(user_id.to_string(), record.clone());
            Ok(())
        }

        async fn set_status(&self, user_id: &str, status: &str) -> Result<(), QueueStoreError> {
            if let Some(record) = self.records.lock().unwrap().get_mut(user_id) {
                record.status = status.to_string();
            }
            Ok(())
        }

        async fn delete(&self, user_id: &str) -> Result<(), QueueStoreError> {
            self.records.lock().unwrap().remove(user_id);
            Ok(())
        }
    }
}
