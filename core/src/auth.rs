//! The authentication capability the client consults on every request.

use crate::http::HttpRequest;

/// Source of the bearer token. Queried per request; the client never caches
/// the answer, so a login or logout takes effect on the next call.
pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn token(&self) -> String;
}

/// Never authenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl AuthProvider for Anonymous {
    fn is_authenticated(&self) -> bool {
        false
    }

    fn token(&self) -> String {
        String::new()
    }
}

/// A fixed token, e.g. a service credential.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AuthProvider for StaticToken {
    fn is_authenticated(&self) -> bool {
        !self.0.is_empty()
    }

    fn token(&self) -> String {
        self.0.clone()
    }
}

/// Headers sent with every request.
pub fn request_headers(auth: &dyn AuthProvider) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    if auth.is_authenticated() {
        headers.push((
            "Authorization".to_string(),
            format!("Bearer {}", auth.token()),
        ));
    }
    headers
}

/// Bearer token carried by `request`, if any.
pub fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request.header("authorization")?.strip_prefix("Bearer ")
}
