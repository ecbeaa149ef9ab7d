use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::config::PERSIST_FAILED_TTL_SECONDS;
use crate::models::persist_failure::{PersistFailurePayload, PersistFailureRecord};
use crate::repositories::errors::store_errors::QueueStoreError;

fn persist_failed_key(room_id: &str) -> String {
    format!("persist_failed:{}", room_id)
}

const PERSIST_FAILED_PREFIX: &str = "persist_failed:";

#[async_trait]
pub trait PersistFailureRepository: Send + Sync {
    async fn write(
        &self,
        room_id: &str,
        payload: &PersistFailurePayload,
    ) -> Result<(), QueueStoreError>;

    /// All live records, each with its age derived from the remaining TTL.
    async fn scan(&self) -> Result<Vec<PersistFailureRecord>, QueueStoreError>;

    async fn delete(&self, room_id: &str) -> Result<(), QueueStoreError>;
}

pub struct RedisPersistFailureRepository {
    conn: ConnectionManager,
}

impl RedisPersistFailureRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PersistFailureRepository for RedisPersistFailureRepository {
    async fn write(
        &self,
        room_id: &str,
        payload: &PersistFailurePayload,
    ) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(payload)
            .map_err(|e| QueueStoreError::Serialization(e.to_string()))?;
        let _: () = conn
            .set_ex(
                persist_failed_key(room_id),
                json,
                PERSIST_FAILED_TTL_SECONDS as u64,
            )
            .await?;
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<PersistFailureRecord>, QueueStoreError> {
        let mut scan_conn = self.conn.clone();
        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = scan_conn
                .scan_match::<_, String>(format!("{}*", PERSIST_FAILED_PREFIX))
                .await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        let mut records = Vec::new();
        for key in keys {
            let mut conn = self.conn.clone();
            let raw: Option<String> = conn.get(&key).await?;
            let raw = match raw {
                Some(raw) => raw,
                None => continue, // expired between scan and get
            };
            let payload: PersistFailurePayload = serde_json::from_str(&raw)
                .map_err(|e| QueueStoreError::Serialization(e.to_string()))?;

            let ttl: i64 = conn.ttl(&key).await?;
            let age_seconds = if ttl >= 0 {
                PERSIST_FAILED_TTL_SECONDS - ttl
            } else {
                0
            };

            records.push(PersistFailureRecord {
                room_id: key.trim_start_matches(PERSIST_FAILED_PREFIX).to_string(),
                payload,
                age_seconds,
            });
        }

        Ok(records)
    }

    async fn delete(&self, room_id: &str) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(persist_failed_key(room_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory stand-in; record ages are injected per room so sweeps can
    /// be tested against the staleness threshold.
    #[derive(Default)]
    pub struct InMemoryPersistFailureRepository {
        records: Mutex<HashMap<String, (PersistFailurePayload, i64)>>,
    }

    impl InMemoryPersistFailureRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert_with_age(
            &self,
            room_id: &str,
            payload: PersistFailurePayload,
            age_seconds: i64,
        ) {
            self.records
                .lock()
                .unwrap()
                .insert(room_id.to_string(), (payload, age_seconds));
        }

        pub fn contains(&self, room_id: &str) -> bool {
            self.records.lock().unwrap().contains_key(room_id)
        }
    }

    #[async_trait]
    impl PersistFailureRepository for InMemoryPersistFailureRepository {
        async fn write(
            &self,
            room_id: &str,
            payload: &PersistFailurePayload,
        ) -> Result<(), QueueStoreError> {
            self.records
                .lock()
                .unwrap()
                .insert(room_id.to_string(), (payload.clone(), 0));
            Ok(())
        }

        async fn scan(&self) -> Result<Vec<PersistFailureRecord>, QueueStoreError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .map(|(room_id, (payload, age_seconds))| PersistFailureRecord {
                    room_id: room_id.clone(),
                    payload: payload.clone(),
                    age_seconds: *age_seconds,
                })
                .collect())
        }

        async fn delete(&self, room_id: &str) -> Result<(), QueueStoreError> {
            self.records.lock().unwrap().remove(room_id);
            Ok(())
        }
    }
}
