use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::models::room_command::RoomCreationCommand;
use crate::repositories::errors::store_errors::QueueStoreError;

const ROOM_CREATION_QUEUE_KEY: &str = "room_creation_queue";

/// Producer side of the room-creation command queue. The game server is the
/// only consumer.
#[async_trait]
pub trait RoomCommandRepository: Send + Sync {
    async fn push(&self, command: &RoomCreationCommand) -> Result<(), QueueStoreError>;

    async fn len(&self) -> Result<usize, QueueStoreError>;
}

pub struct RedisRoomCommandRepository {
    conn: ConnectionManager,
}

impl RedisRoomCommandRepository {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RoomCommandRepository for RedisRoomCommandRepository {
    async fn push(&self, command: &RoomCreationCommand) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(command)
            .map_err(|e| QueueStoreError::Serialization(e.to_string()))?;
        let _: () = conn.lpush(ROOM_CREATION_QUEUE_KEY, json).await?;
        Ok(())
    }

    async fn len(&self) -> Result<usize, QueueStoreError> {
        let mut conn = self.conn.clone();
        let len: usize = conn.llen(ROOM_CREATION_QUEUE_KEY).await?;
        Ok(len)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryRoomCommandRepository {
        commands: Mutex<Vec<RoomCreationCommand>>,
    }

    impl InMemoryRoomCommandRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn commands(&self) -> Vec<RoomCreationCommand> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RoomCommandRepository for InMemoryRoomCommandRepository {
        async fn push(&self, command: &RoomCreationCommand) -> Result<(), QueueStoreError> {
            self.commands.lock().unwrap().push(command.clone());
            Ok(())
        }

        async fn len(&self) -> Result<usize, QueueStoreError> {
            Ok(self.commands.lock().unwrap().len())
        }
    }
}
