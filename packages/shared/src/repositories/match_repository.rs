use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};

use crate::models::game_match::{Match, MatchStatus};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError>;

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError>;

    /// Backfills the room id once the room exists.
    async fn set_room_id(&self, match_id: &str, room_id: &str) -> Result<(), MatchRepositoryError>;

    async fn set_status(
        &self,
        match_id: &str,
        status: MatchStatus,
    ) -> Result<(), MatchRepositoryError>;

    /// The match that spawned a room, for the preparing watchdog.
    async fn find_by_room(&self, room_id: &str) -> Result<Option<Match>, MatchRepositoryError>;
}

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client) -> Self {
        let table_name =
            std::env::var("MATCHES_TABLE").expect("MATCHES_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

fn status_value(status: MatchStatus) -> Result<AttributeValue, MatchRepositoryError> {
    let json = serde_json::to_value(status)
        .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
    match json {
        serde_json::Value::String(s) => Ok(AttributeValue::S(s)),
        _ => Err(MatchRepositoryError::Serialization(
            "match status must serialize to a string".to_string(),
        )),
    }
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
        let item = to_item(game_match)
            .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("match_id", AttributeValue::S(match_id.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let game_match: Match =
                from_item(item).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(game_match))
        } else {
            Ok(None)
        }
    }

    async fn set_room_id(&self, match_id: &str, room_id: &str) -> Result<(), MatchRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("match_id", AttributeValue::S(match_id.to_string()))
            .update_expression("SET room_id = :room_id")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .condition_expression("attribute_exists(match_id)")
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false)
                {
                    MatchRepositoryError::NotFound
                } else {
                    MatchRepositoryError::DynamoDb(e.to_string())
                }
            })?;

        Ok(())
    }

    async fn set_status(
        &self,
        match_id: &str,
        status: MatchStatus,
    ) -> Result<(), MatchRepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("match_id", AttributeValue::S(match_id.to_string()))
            .update_expression("SET #s = :status")
            .expression_attribute_names("#s", "status")
            .expression_attribute_values(":status", status_value(status)?)
            .condition_expression("attribute_exists(match_id)")
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false)
                {
                    MatchRepositoryError::NotFound
                } else {
                    MatchRepositoryError::DynamoDb(e.to_string())
                }
            })?;

        Ok(())
    }

    async fn find_by_room(&self, room_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("room_id = :room_id")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        match result.items.unwrap_or_default().into_iter().next() {
            Some(item) => {
                let game_match: Match = from_item(item)
                    .map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
                Ok(Some(game_match))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryMatchRepository {
        matches: Mutex<HashMap<String, Match>>,
    }

    impl InMemoryMatchRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn all(&self) -> Vec<Match> {
            self.matches.lock().unwrap().values().cloned().collect()
        }
    }

    #[async_trait]
    impl MatchRepository for InMemoryMatchRepository {
        async fn create_match(&self, game_match: &Match) -> Result<(), MatchRepositoryError> {
            self.matches
                .lock()
                .unwrap()
                .insert(game_match.match_id.clone(), game_match.clone());
            Ok(())
        }

        async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
            Ok(self.matches.lock().unwrap().get(match_id).cloned())
        }

        async fn set_room_id(
            &self,
            match_id: &str,
            room_id: &str,
        ) -> Result<(), MatchRepositoryError> {
            let mut matches = self.matches.lock().unwrap();
            let game_match = matches
                .get_mut(match_id)
                .ok_or(MatchRepositoryError::NotFound)?;
            game_match.room_id = Some(room_id.to_string());
            Ok(())
        }

        async fn set_status(
            &self,
            match_id: &str,
            status: MatchStatus,
        ) -> Result<(), MatchRepositoryError> {
            let mut matches = self.matches.lock().unwrap();
            let game_match = matches
                .get_mut(match_id)
                .ok_or(MatchRepositoryError::NotFound)?;
            game_match.status = status;
            Ok(())
        }

        async fn find_by_room(&self, room_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
            Ok(self
                .matches
                .lock()
                .unwrap()
                .values()
                .find(|m| m.room_id.as_deref() == Some(room_id))
                .cloned())
        }
    }
}
