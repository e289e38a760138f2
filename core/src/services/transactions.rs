use serde_json::{json, Value};

use super::Rejection;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::QueryParams;
use crate::types::{DataEnvelope, Paginated, Transaction, TransactionType};

#[derive(Debug, Clone, Copy)]
pub struct TransactionService<'a> {
    client: &'a ApiClient,
}

impl<'a> TransactionService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        params: Option<QueryParams>,
    ) -> Result<Paginated<Transaction>, ApiError> {
        self.client.get_json("transactions", params).await
    }

    pub async fn pending(&self) -> Result<Paginated<Transaction>, ApiError> {
        self.list(Some(QueryParams::new().with("status", "PENDING")))
            .await
    }

    pub async fn deposits(
        &self,
        params: Option<QueryParams>,
    ) -> Result<Paginated<Transaction>, ApiError> {
        self.list(Some(of_type(params, TransactionType::Deposit)))
            .await
    }

    pub async fn withdrawals(
        &self,
        params: Option<QueryParams>,
    ) -> Result<Paginated<Transaction>, ApiError> {
        self.list(Some(of_type(params, TransactionType::Withdrawal)))
            .await
    }

    pub async fn get(&self, id: u64) -> Result<Transaction, ApiError> {
        self.client
            .get_json(&format!("/transactions/{id}"), None)
            .await
    }

    pub async fn approve(&self, id: u64) -> Result<Transaction, ApiError> {
        let body: Value = json!({});
        self.client
            .patch_json(&format!("/transactions/{id}/approve"), &body, None)
            .await
    }

    pub async fn reject(&self, id: u64, reason: Option<&str>) -> Result<Transaction, ApiError> {
        self.client
            .patch_json(
                &format!("/transactions/{id}/reject"),
                &Rejection { reason },
                None,
            )
            .await
    }

    /// Aggregates for the dashboard; the shape is owned by the server.
    pub async fn stats(&self, params: Option<QueryParams>) -> Result<Value, ApiError> {
        let response: DataEnvelope<Value> =
            self.client.get_json("/transactions/stats", params).await?;
        Ok(response.data)
    }
}

/// Caller params with `type` forced to `kind`.
fn of_type(params: Option<QueryParams>, kind: TransactionType) -> QueryParams {
    params
        .unwrap_or_default()
        .with("type", kind.as_str())
}
