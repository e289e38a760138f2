//! Shared helpers for the client tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use admin_api_core::{
    ApiClient, ApiEvent, AuthProvider, ClientConfig, HttpRequest, HttpResponse, Transport,
    TransportError, TransportErrorKind,
};
use async_trait::async_trait;

pub const BASE_URL: &str = "http://localhost:5000/api/";

/// Transport that answers from a queue and remembers what it was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, status_text: &str, body: &str) {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            status_text: status_text.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, kind: TransportErrorKind, detail: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(TransportError::new(kind, detail)));
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::new(
                TransportErrorKind::Other,
                "no scripted reply left",
            ))
        })
    }
}

pub fn client(auth: Arc<dyn AuthProvider>, transport: Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new(&ClientConfig::new(BASE_URL), auth, transport)
}

/// Record every event the client publishes, in order.
pub fn record_events(client: &ApiClient) -> Arc<Mutex<Vec<ApiEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for event in ApiEvent::ALL {
        let sink = Arc::clone(&log);
        client.on(event, move |_| sink.lock().unwrap().push(event));
    }
    log
}
