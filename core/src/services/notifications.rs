use serde_json::{json, Value};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::QueryParams;
use crate::types::{Count, NewNotification, Notification, NotificationList};

/// Page size used by [`NotificationService::recent`].
const RECENT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct NotificationService<'a> {
    client: &'a ApiClient,
}

impl<'a> NotificationService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: Option<QueryParams>) -> Result<NotificationList, ApiError> {
        self.client.get_json("/notifications", params).await
    }

    pub async fn unread_count(&self) -> Result<Count, ApiError> {
        self.client
            .get_json("/notifications/unread-count", None)
            .await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, ApiError> {
        let body: Value = json!({});
        self.client
            .patch_json(&format!("/notifications/{id}/read"), &body, None)
            .await
    }

    pub async fn mark_all_read(&self) -> Result<Count, ApiError> {
        let body: Value = json!({});
        self.client
            .patch_json("/notifications/mark-all-read", &body, None)
            .await
    }

    pub async fn create(&self, input: &NewNotification) -> Result<Notification, ApiError> {
        self.client
            .post_json("/notifications", Some(input), None)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .delete::<Value>(&format!("/notifications/{id}"), None, None)
            .await
    }

    pub async fn recent(&self) -> Result<NotificationList, ApiError> {
        self.list(Some(
            QueryParams::new()
                .with("limit", RECENT_LIMIT)
                .with("offset", 0),
        ))
        .await
    }

    pub async fn unread(&self) -> Result<NotificationList, ApiError> {
        self.list(Some(QueryParams::new().with("read", false)))
            .await
    }
}
