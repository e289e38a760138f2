use serde_json::Value;

use super::StatusChange;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::QueryParams;
use crate::types::{Group, Paginated, Transaction, User, UserStatus};

#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: Option<QueryParams>) -> Result<Paginated<User>, ApiError> {
        self.client.get_json("users", params).await
    }

    pub async fn get(&self, id: u64) -> Result<User, ApiError> {
        self.client.get_json(&format!("/users/{id}"), None).await
    }

    pub async fn update_status(&self, id: u64, status: UserStatus) -> Result<User, ApiError> {
        let body = StatusChange {
            status: status.as_str(),
        };
        self.client
            .patch_json(&format!("/users/{id}/status"), &body, None)
            .await
    }

    pub async fn groups(&self, user_id: u64) -> Result<Vec<Group>, ApiError> {
        self.client
            .get_json(&format!("/users/{user_id}/groups"), None)
            .await
    }

    pub async fn transactions(
        &self,
        user_id: u64,
        params: Option<QueryParams>,
    ) -> Result<Paginated<Transaction>, ApiError> {
        self.client
            .get_json(&format!("/users/{user_id}/transactions"), params)
            .await
    }

    pub async fn stats(&self, user_id: u64) -> Result<Value, ApiError> {
        self.client
            .get_json(&format!("/users/{user_id}/stats"), None)
            .await
    }
}
