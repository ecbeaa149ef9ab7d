use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::models::token::{SessionTokenRecord, TokenPurpose};
use crate::repositories::errors::store_errors::QueueStoreError;

fn session_token_key(token: &str) -> String {
    format!("session_token:{}", token)
}

#[async_trait]
pub trait SessionTokenRepository: Send + Sync {
    async fn store(
        &self,
        token: &str,
        record: &SessionTokenRecord,
        ttl_seconds: i64,
    ) -> Result<(), QueueStoreError>;

    async fn get(&self, token: &str) -> Result<Option<SessionTokenRecord>, QueueStoreError>;

    async fn delete(&self, token: &str) -> Result<(), QueueStoreError>;
}

pub struct RedisSessionTokenRepository {
    conn: ConnectionManager,
}

impl RedisSessionTokenRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionTokenRepository for RedisSessionTokenRepository {
    async fn store(
        &self,
        token: &str,
        record: &SessionTokenRecord,
        ttl_seconds: i64,
    ) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let key = session_token_key(token);
        let _: () = conn
            .hset_multiple(
                &key,
                &[
                    ("room_id", record.room_id.as_str()),
                    ("user_id", record.user_id.as_str()),
                    ("purpose", record.purpose.as_str()),
                ],
            )
            .await?;
        let _: () = conn.expire(&key, ttl_seconds).await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionTokenRecord>, QueueStoreError> {
        let mut conn = self.conn.clone();
        let fields: std::collections::HashMap<String, String> =
            conn.hgetall(session_token_key(token)).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        let get = |name: &str| -> Result<String, QueueStoreError> {
            fields
                .get(name)
                .cloned()
                .ok_or_else(|| QueueStoreError::Serialization(format!("{} missing", name)))
        };
        let purpose = TokenPurpose::parse(&get("purpose")?)
            .ok_or_else(|| QueueStoreError::Serialization("unknown purpose".to_string()))?;

        Ok(Some(SessionTokenRecord {
            room_id: get("room_id")?,
            user_id: get("user_id")?,
            purpose,
        }))
    }

    async fn delete(&self, token: &str) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(session_token_key(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemorySessionTokenRepository {
        records: Mutex<HashMap<String, SessionTokenRecord>>,
    }

    impl InMemorySessionTokenRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SessionTokenRepository for InMemorySessionTokenRepository {
        async fn store(
            &self,
            token: &str,
            record: &SessionTokenRecord,
            _ttl_seconds: i64,
        ) -> Result<(), QueueStoreError> {
            self.records
                .lock()
                .unwrap()
                .insert(token.to_string(), record.clone());
            Ok(())
        }

        async fn get(&self, token: &str) -> Result<Option<SessionTokenRecord>, QueueStoreError> {
            Ok(self.records.lock().unwrap().get(token).cloned())
        }

        async fn delete(&self, token: &str) -> Result<(), QueueStoreError> {
            self.records.lock().unwrap().remove(token);
            Ok(())
        }
    }
}
