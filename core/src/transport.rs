//! The I/O boundary between the client and the network.
//!
//! # Design
//! The executor never performs I/O itself. It hands an [`HttpRequest`] to a
//! [`Transport`] and interprets whatever comes back. `Ok` means the server
//! answered (with any status); `Err` means no response was received.

use std::error::Error as StdError;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderName, HeaderValue};

use crate::config::ClientConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset: the server was not reached.
    Network,
    Timeout,
    Other,
}

/// A failure before any HTTP response was received.
///
/// `Network` failures render with a `NetworkError` prefix; the executor keys
/// the `serverClash` event off that text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("NetworkError: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match kind {
            TransportErrorKind::Network => TransportError::Network(detail),
            TransportErrorKind::Timeout => TransportError::Timeout(detail),
            TransportErrorKind::Other => TransportError::Other(detail),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::Network(_) => TransportErrorKind::Network,
            TransportError::Timeout(_) => TransportErrorKind::Timeout,
            TransportError::Other(_) => TransportErrorKind::Other,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            TransportError::Network(detail)
            | TransportError::Timeout(detail)
            | TransportError::Other(detail) => detail,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Network
        } else {
            TransportErrorKind::Other
        };
        // reqwest's top-level message hides the root cause; walk the chain.
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            detail.push_str(": ");
            detail.push_str(&inner.to_string());
            source = inner.source();
        }
        TransportError::new(kind, detail)
    }
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honouring the configured timeout. Without one the
    /// reqwest default (no timeout) applies.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        // hyper keeps a non-canonical reason phrase as a response extension.
        let status_text = match response.extensions().get::<ReasonPhrase>() {
            Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        };
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}
