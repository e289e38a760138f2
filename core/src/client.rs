//! Request executor and verb façade for the admin API.
//!
//! # Design
//! `ApiClient` is an explicit value: construct one at startup and share it
//! (`Arc<ApiClient>` or `&ApiClient`). It owns the resolved base URL and the
//! event hub, and borrows the auth capability and the transport through
//! trait objects so tests can swap either.
//!
//! Every verb funnels into [`ApiClient::execute`], which runs one call
//! through `beforeRequest` → build → send → `afterRequest` → interpret. A
//! failure to reach the server publishes `serverClash` when it looks like a
//! network outage and always surfaces as the generic internal error, with
//! the transport failure attached as its source.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{request_headers, AuthProvider};
use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorCause};
use crate::events::{ApiEvent, EventHub, EventPayload, Subscription};
use crate::http::{HttpMethod, HttpRequest, QueryParams};
use crate::response::interpret;
use crate::transport::{ReqwestTransport, Transport, TransportError};
use crate::url::build_url;

/// Substrings (matched case-insensitively) that mark a transport failure as
/// "the API is unreachable".
const NETWORK_FAILURE_MARKERS: [&str; 2] = ["networkerror", "failed to fetch"];

pub struct ApiClient {
    base_url: String,
    auth: Arc<dyn AuthProvider>,
    transport: Arc<dyn Transport>,
    events: EventHub,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        auth: Arc<dyn AuthProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            auth,
            transport,
            events: EventHub::new(),
        }
    }

    /// Client over the default `reqwest` transport.
    pub fn with_reqwest(
        config: &ClientConfig,
        auth: Arc<dyn AuthProvider>,
    ) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(config, auth, Arc::new(transport)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn on<F>(&self, event: ApiEvent, listener: F) -> Subscription
    where
        F: Fn(Option<&EventPayload>) + Send + Sync + 'static,
    {
        self.events.subscribe(event, listener)
    }

    pub fn off(&self, subscription: Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        uri: &str,
        params: Option<QueryParams>,
    ) -> Result<T, ApiError> {
        let value = self.execute(HttpMethod::Get, uri, params, None).await?;
        decode(value)
    }

    pub async fn post_json<T, B>(
        &self,
        uri: &str,
        data: Option<&B>,
        params: Option<QueryParams>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = data.map(encode).transpose()?;
        let value = self.execute(HttpMethod::Post, uri, params, data).await?;
        decode(value)
    }

    pub async fn put_json<T, B>(
        &self,
        uri: &str,
        data: &B,
        params: Option<QueryParams>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = encode(data)?;
        let value = self.execute(HttpMethod::Put, uri, params, Some(data)).await?;
        decode(value)
    }

    pub async fn patch_json<T, B>(
        &self,
        uri: &str,
        data: &B,
        params: Option<QueryParams>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let data = encode(data)?;
        let value = self.execute(HttpMethod::Patch, uri, params, Some(data)).await?;
        decode(value)
    }

    /// DELETE, discarding whatever the server returns on success.
    pub async fn delete<B>(
        &self,
        uri: &str,
        params: Option<QueryParams>,
        data: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let data = data.map(encode).transpose()?;
        self.execute(HttpMethod::Delete, uri, params, data).await?;
        Ok(())
    }

    /// Build the outgoing request without sending it.
    ///
    /// A body is attached only when `data` is present and not `null`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        uri: &str,
        params: Option<&QueryParams>,
        data: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let body = match data.filter(|d| !d.is_null()) {
            Some(data) => Some(
                serde_json::to_string(data)
                    .map_err(|e| ApiError::internal().caused_by(ErrorCause::Encode(e)))?,
            ),
            None => None,
        };
        Ok(HttpRequest {
            method,
            url: build_url(&self.base_url, uri, params),
            headers: request_headers(self.auth.as_ref()),
            body,
        })
    }

    /// Run one call through the full lifecycle and return the raw payload.
    pub async fn execute(
        &self,
        method: HttpMethod,
        uri: &str,
        params: Option<QueryParams>,
        data: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut payload = EventPayload {
            uri: uri.to_string(),
            method,
            params,
            data,
            response: None,
        };
        self.events.publish(ApiEvent::BeforeRequest, Some(&payload));

        let request = self.build_request(
            method,
            uri,
            payload.params.as_ref(),
            payload.data.as_ref(),
        )?;
        tracing::debug!(method = %method, url = %request.url, "dispatching api request");

        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(
                    method = %method,
                    uri,
                    status = response.status,
                    "api response received"
                );
                payload.response = Some(response);
                self.events.publish(ApiEvent::AfterRequest, Some(&payload));
                let outcome = interpret(payload.response.as_ref());
                if let Err(err) = &outcome {
                    tracing::debug!(
                        method = %method,
                        uri,
                        kind = %err.kind(),
                        error = %err,
                        "api call failed"
                    );
                }
                outcome
            }
            Err(failure) => {
                let unreachable = is_network_failure(&failure.to_string());
                tracing::warn!(
                    method = %method,
                    uri,
                    error = %failure,
                    unreachable,
                    "api request failed before a response was received"
                );
                if unreachable {
                    self.events.publish(ApiEvent::ServerClash, None);
                }
                interpret(None).map_err(|err| err.caused_by(failure))
            }
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.auth.is_authenticated())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

/// Whether a transport failure's text says the server could not be reached.
pub fn is_network_failure(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    NETWORK_FAILURE_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

fn encode<B: Serialize + ?Sized>(data: &B) -> Result<Value, ApiError> {
    serde_json::to_value(data).map_err(|e| ApiError::internal().caused_by(ErrorCause::Encode(e)))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::internal().caused_by(ErrorCause::Decode(e)))
}
