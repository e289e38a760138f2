//! Typed wrappers over [`ApiClient`](crate::ApiClient), one per resource.
//!
//! Each service borrows the client; construct them on demand.

mod groups;
mod notifications;
mod transactions;
mod users;

pub use groups::GroupService;
pub use notifications::NotificationService;
pub use transactions::TransactionService;
pub use users::UserService;

use serde::Serialize;

/// Body of the reject endpoints; `reason` is left out when absent.
#[derive(Debug, Serialize)]
struct Rejection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct StatusChange<'a> {
    status: &'a str,
}
