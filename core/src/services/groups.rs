use serde_json::{json, Value};

use super::{Rejection, StatusChange};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::QueryParams;
use crate::types::{DataEnvelope, Group, GroupMember, GroupStatus, Paginated};

#[derive(Debug, Clone, Copy)]
pub struct GroupService<'a> {
    client: &'a ApiClient,
}

impl<'a> GroupService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: Option<QueryParams>) -> Result<Paginated<Group>, ApiError> {
        self.client.get_json("groups", params).await
    }

    /// Groups awaiting an approval decision.
    pub async fn pending(&self) -> Result<Paginated<Group>, ApiError> {
        self.client.get_json("/groups?status=PENDING", None).await
    }

    pub async fn get(&self, id: u64) -> Result<Group, ApiError> {
        self.client.get_json(&format!("/groups/{id}"), None).await
    }

    pub async fn members(&self, group_id: u64) -> Result<Vec<GroupMember>, ApiError> {
        self.client
            .get_json(&format!("/groups/{group_id}/members"), None)
            .await
    }

    pub async fn approve(&self, id: u64) -> Result<Group, ApiError> {
        let body: Value = json!({});
        let response: DataEnvelope<Group> = self
            .client
            .patch_json(&format!("/groups/{id}/approve"), &body, None)
            .await?;
        Ok(response.data)
    }

    pub async fn reject(&self, id: u64, reason: Option<&str>) -> Result<Group, ApiError> {
        let response: DataEnvelope<Group> = self
            .client
            .patch_json(&format!("/groups/{id}/reject"), &Rejection { reason }, None)
            .await?;
        Ok(response.data)
    }

    pub async fn update_status(&self, id: u64, status: GroupStatus) -> Result<Group, ApiError> {
        let body = StatusChange {
            status: status.as_str(),
        };
        let response: DataEnvelope<Group> = self
            .client
            .patch_json(&format!("/groups/{id}/status"), &body, None)
            .await?;
        Ok(response.data)
    }
}
