use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

use crate::models::game_result::GameResult;
use crate::models::room::{Room, RoomStatus};
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError>;

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, RoomRepositoryError>;

    /// Full-item write; the room must already exist.
    async fn update_room(&self, room: &Room) -> Result<(), RoomRepositoryError>;

    /// Rooms currently in the given status, for the preparing watchdog.
    async fn list_by_status(&self, status: RoomStatus) -> Result<Vec<Room>, RoomRepositoryError>;

    /// Writes the finished room and its GameResult as one atomic unit.
    /// Fails with `ResultAlreadyExists` when a result row is already
    /// present for the room, leaving the stored room untouched.
    async fn finish_with_result(
        &self,
        room: &Room,
        result: &GameResult,
    ) -> Result<(), RoomRepositoryError>;
}

pub struct DynamoDbRoomRepository {
    pub client: Client,
    pub table_name: String,
    pub game_results_table: String,
}

impl DynamoDbRoomRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("ROOMS_TABLE").expect("ROOMS_TABLE environment variable must be set");
        let game_results_table = std::env::var("GAME_RESULTS_TABLE")
            .expect("GAME_RESULTS_TABLE environment variable must be set");
        Self {
            client,
            table_name,
            game_results_table,
        }
    }
}

#[async_trait]
impl RoomRepository for DynamoDbRoomRepository {
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let item =
            to_item(room).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, RoomRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("room_id", AttributeValue::S(room_id.to_string()))
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let room: Room =
                from_item(item).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(room))
        } else {
            Ok(None)
        }
    }

    async fn update_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let item =
            to_item(room).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(room_id)")
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false)
                {
                    RoomRepositoryError::NotFound
                } else {
                    RoomRepositoryError::DynamoDb(e.to_string())
                }
            })?;

        Ok(())
    }

    async fn list_by_status(&self, status: RoomStatus) -> Result<Vec<Room>, RoomRepositoryError> {
        // "status" is a DynamoDB reserved word.
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#s = :status")
            .expression_attribute_names("#s", "status")
            .expression_attribute_values(":status", AttributeValue::S(status.as_str().to_string()))
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        result
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                from_item(item).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn finish_with_result(
        &self,
        room: &Room,
        result: &GameResult,
    ) -> Result<(), RoomRepositoryError> {
        let room_item =
            to_item(room).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;
        let result_item =
            to_item(result).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        let room_put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(room_item))
            .build()
            .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;
        let result_put = Put::builder()
            .table_name(&self.game_results_table)
            .set_item(Some(result_item))
            .condition_expression("attribute_not_exists(room_id)")
            .build()
            .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        self.client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(room_put).build())
            .transact_items(TransactWriteItem::builder().put(result_put).build())
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .map(|se| se.is_transaction_canceled_exception())
                    .unwrap_or(false)
                {
                    RoomRepositoryError::ResultAlreadyExists
                } else {
                    RoomRepositoryError::DynamoDb(e.to_string())
                }
            })?;

        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Shared result store so the room repository's transactional finish
    /// and the game-result repository observe the same rows.
    pub type ResultStore = Arc<Mutex<HashMap<String, GameResult>>>;

    #[derive(Default)]
    pub struct InMemoryRoomRepository {
        rooms: Mutex<HashMap<String, Room>>,
        results: ResultStore,
        fail_finish: AtomicBool,
    }

    impl InMemoryRoomRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn results_store(&self) -> ResultStore {
            Arc::clone(&self.results)
        }

        /// Makes the next `finish_with_result` calls fail as a transient
        /// store error, for persist-failure capture tests.
        pub fn fail_next_finish(&self, fail: bool) {
            self.fail_finish.store(fail, Ordering::SeqCst);
        }

        pub fn insert_room(&self, room: Room) {
            self.rooms.lock().unwrap().insert(room.room_id.clone(), room);
        }

        pub fn stored_room(&self, room_id: &str) -> Option<Room> {
            self.rooms.lock().unwrap().get(room_id).cloned()
        }
    }

    #[async_trait]
    impl RoomRepository for InMemoryRoomRepository {
        async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
            self.rooms
                .lock()
                .unwrap()
                .insert(room.room_id.clone(), room.clone());
            Ok(())
        }

        async fn get_room(&self, room_id: &str) -> Result<Option<Room>, RoomRepositoryError> {
            Ok(self.rooms.lock().unwrap().get(room_id).cloned())
        }

        async fn update_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
            let mut rooms = self.rooms.lock().unwrap();
            if !rooms.contains_key(&room.room_id) {
                return Err(RoomRepositoryError::NotFound);
            }
            rooms.insert(room.room_id.clone(), room.clone());
            Ok(())
        }

        async fn list_by_status(
            &self,
            status: RoomStatus,
        ) -> Result<Vec<Room>, RoomRepositoryError> {
            Ok(self
                .rooms
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.status == status)
                .cloned()
                .collect())
        }

        async fn finish_with_result(
            &self,
            room: &Room,
            result: &GameResult,
        ) -> Result<(), RoomRepositoryError> {
            if self.fail_finish.load(Ordering::SeqCst) {
                return Err(RoomRepositoryError::DynamoDb(
                    "transact_write_items unavailable".to_string(),
                ));
            }
            let mut results = self.results.lock().unwrap();
            if results.contains_key(&room.room_id) {
                return Err(RoomRepositoryError::ResultAlreadyExists);
            }
            results.insert(room.room_id.clone(), result.clone());
            drop(results);

            self.rooms
                .lock()
                .unwrap()
                .insert(room.room_id.clone(), room.clone());
            Ok(())
        }
    }
}
