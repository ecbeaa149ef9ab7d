use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

use crate::models::game_result::GameResult;
use crate::repositories::errors::game_result_repository_errors::GameResultRepositoryError;

/// Game results are keyed by room id, which is what makes the `finished`
/// callback idempotent: a second create for the same room fails the
/// condition instead of writing a duplicate row.
#[async_trait]
pub trait GameResultRepository: Send + Sync {
    async fn create(&self, result: &GameResult) -> Result<(), GameResultRepositoryError>;

    async fn get_by_room(
        &self,
        room_id: &str,
    ) -> Result<Option<GameResult>, GameResultRepositoryError>;
}

pub struct DynamoDbGameResultRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameResultRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("GAME_RESULTS_TABLE")
            .expect("GAME_RESULTS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl GameResultRepository for DynamoDbGameResultRepository {
    async fn create(&self, result: &GameResult) -> Result<(), GameResultRepositoryError> {
        let item =
            to_item(result).map_err(|e| GameResultRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(room_id)")
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false)
                {
                    GameResultRepositoryError::AlreadyExists
                } else {
                    GameResultRepositoryError::DynamoDb(e.to_string())
                }
            })?;

        Ok(())
    }

    async fn get_by_room(
        &self,
        room_id: &str,
    ) -> Result<Option<GameResult>, GameResultRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("room_id", AttributeValue::S(room_id.to_string()))
            .send()
            .await
            .map_err(|e| GameResultRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let game_result: GameResult = from_item(item)
                .map_err(|e| GameResultRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(game_result))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::repositories::room_repository::tests::ResultStore;

    /// Shares its row store with `InMemoryRoomRepository` so results
    /// written through the transactional finish are visible here.
    pub struct InMemoryGameResultRepository {
        results: ResultStore,
    }

    impl InMemoryGameResultRepository {
        pub fn with_store(results: ResultStore) -> Self {
            Self { results }
        }
    }

    #[async_trait]
    impl GameResultRepository for InMemoryGameResultRepository {
        async fn create(&self, result: &GameResult) -> Result<(), GameResultRepositoryError> {
            let mut results = self.results.lock().unwrap();
            if results.contains_key(&result.room_id) {
                return Err(GameResultRepositoryError::AlreadyExists);
            }
            results.insert(result.room_id.clone(), result.clone());
            Ok(())
        }

        async fn get_by_room(
            &self,
            room_id: &str,
        ) -> Result<Option<GameResult>, GameResultRepositoryError> {
            Ok(self.results.lock().unwrap().get(room_id).cloned())
        }
    }
}
