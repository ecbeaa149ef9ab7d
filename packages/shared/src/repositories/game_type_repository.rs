use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::from_item;

use crate::models::game_type::GameType;
use crate::repositories::errors::game_type_repository_errors::GameTypeRepositoryError;

/// Read-only view of the game-type catalogue (owned by an external CRUD
/// surface).
#[async_trait]
pub trait GameTypeRepository: Send + Sync {
    async fn get(&self, game_type_id: &str) -> Result<Option<GameType>, GameTypeRepositoryError>;
}

pub struct DynamoDbGameTypeRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameTypeRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("GAME_TYPES_TABLE")
            .expect("GAME_TYPES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl GameTypeRepository for DynamoDbGameTypeRepository {
    async fn get(&self, game_type_id: &str) -> Result<Option<GameType>, GameTypeRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("game_type_id", AttributeValue::S(game_type_id.to_string()))
            .send()
            .await
            .map_err(|e| GameTypeRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let game_type: GameType = from_item(item)
                .map_err(|e| GameTypeRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(game_type))
        } else {
            Ok(None)
        }
    }
}
