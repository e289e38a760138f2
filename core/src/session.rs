//! In-memory login session that doubles as the client's auth capability.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::AuthProvider;
use crate::client::ApiClient;
use crate::error::ApiError;

const LOGIN_PATH: &str = "auth/login/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: u64,
    pub name: String,
    pub display_name: String,
}

/// The signed-in console operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    #[serde(default)]
    pub deactivated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: SessionUser,
    pub token: String,
}

#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<Option<AuthSession>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously stored session.
    pub fn restored(auth: AuthSession) -> Self {
        Self {
            state: RwLock::new(Some(auth)),
        }
    }

    /// Sign in with an email address or a phone number.
    ///
    /// Identifiers containing `@` are sent as `email`, anything else as
    /// `phoneNumber`. The session is left untouched when the call fails.
    pub async fn login(
        &self,
        client: &ApiClient,
        identifier: &str,
        password: &str,
    ) -> Result<SessionUser, ApiError> {
        let mut payload = Map::new();
        payload.insert("password".to_string(), Value::from(password));
        let field = if identifier.contains('@') {
            "email"
        } else {
            "phoneNumber"
        };
        payload.insert(field.to_string(), Value::from(identifier));

        let auth: AuthSession = client.post_json(LOGIN_PATH, Some(&payload), None).await?;
        tracing::info!(user_id = auth.user.id, "signed in");
        let user = auth.user.clone();
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(auth);
        Ok(user)
    }

    pub fn logout(&self) {
        if self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            tracing::info!("signed out");
        }
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.read(|auth| auth.map(|a| a.user.clone()))
    }

    /// Snapshot suitable for persisting and later [`Session::restored`].
    pub fn snapshot(&self) -> Option<AuthSession> {
        self.read(|auth| auth.cloned())
    }

    /// Name, else email, else `"User"`.
    pub fn display_name(&self) -> String {
        self.read(|auth| match auth.map(|a| &a.user) {
            Some(user) if !user.name.is_empty() => user.name.clone(),
            Some(user) if !user.email.is_empty() => user.email.clone(),
            _ => "User".to_string(),
        })
    }

    fn read<R>(&self, f: impl FnOnce(Option<&AuthSession>) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(guard.as_ref())
    }
}

impl AuthProvider for Session {
    fn is_authenticated(&self) -> bool {
        self.read(|auth| auth.is_some_and(|a| !a.token.is_empty()))
    }

    fn token(&self) -> String {
        self.read(|auth| auth.map(|a| a.token.clone()).unwrap_or_default())
    }
}
