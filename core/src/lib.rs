//! Async API client core for the savings-group admin console.
//!
//! # Overview
//! Every network call the console makes goes through [`ApiClient`]: it
//! resolves the endpoint URL, attaches the bearer token, publishes lifecycle
//! events and turns the outcome into either a decoded payload or one of the
//! seven [`ApiError`] kinds screens branch on.
//!
//! # Design
//! - The client is an explicit value, built once from [`ClientConfig`] with
//!   an injected [`AuthProvider`] and [`Transport`].
//! - I/O lives behind [`Transport`]; [`ReqwestTransport`] is the production
//!   implementation, tests plug in scripted ones.
//! - Listeners subscribe to [`ApiEvent`] topics and get a [`Subscription`]
//!   handle back for removal.
//! - Resource services in [`services`] are thin typed projections of the
//!   verb methods.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod response;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;
pub mod url;

pub use auth::{Anonymous, AuthProvider, StaticToken};
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorCause, ErrorKind};
pub use events::{ApiEvent, EventHub, EventPayload, Subscription};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ParamValue, QueryParams};
pub use response::interpret;
pub use session::{AuthSession, Session, SessionUser};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportErrorKind};
