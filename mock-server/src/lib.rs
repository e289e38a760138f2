//! In-process stand-in for the admin API, served under `/api`.
//!
//! Every protected route requires `Authorization: Bearer <ADMIN_TOKEN>`, the
//! token handed out by `POST /api/auth/login`. Failures answer with a JSON
//! body carrying an `errors` field, in the shapes the console client reads.

pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use hyper::ext::ReasonPhrase;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

use store::{Notification, Store, ACTED_AT, CREATED_AT};

/// Token issued to the seeded operator.
pub const ADMIN_TOKEN: &str = "mock-admin-token";

const DEFAULT_PER_PAGE: usize = 15;

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/login/", post(login))
        .route("/groups", get(list_groups))
        .route("/groups/{id}", get(get_group))
        .route("/groups/{id}/members", get(group_members))
        .route("/groups/{id}/approve", patch(approve_group))
        .route("/groups/{id}/reject", patch(reject_group))
        .route("/groups/{id}/status", patch(update_group_status))
        .route("/transactions", get(list_transactions))
        .route("/transactions/stats", get(transaction_stats))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}/approve", patch(approve_transaction))
        .route("/transactions/{id}/reject", patch(reject_transaction))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/status", patch(update_user_status))
        .route("/users/{id}/groups", get(user_groups))
        .route("/users/{id}/transactions", get(user_transactions))
        .route("/users/{id}/stats", get(user_stats))
        .route("/notifications", get(list_notifications).post(create_notification))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/mark-all-read", patch(mark_all_read))
        .route("/notifications/{id}", axum::routing::delete(delete_notification))
        .route("/notifications/{id}/read", patch(mark_read))
        .route("/reports/upstream", get(upstream_report))
        .route("/reports/ledger", get(ledger_report))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Failures and auth
// ---------------------------------------------------------------------------

/// A non-2xx answer with an optional `errors` payload.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    errors: Option<Value>,
    reason: Option<&'static str>,
}

impl ApiFailure {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            errors: None,
            reason: None,
        }
    }

    fn with_errors(status: StatusCode, errors: Value) -> Self {
        Self {
            status,
            errors: Some(errors),
            reason: None,
        }
    }

    /// Replace the canonical reason phrase on the status line.
    fn reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = match self.errors {
            Some(errors) => json!({ "errors": errors }),
            None => json!({ "message": self.status.canonical_reason().unwrap_or_default() }),
        };
        let mut response = (self.status, Json(body)).into_response();
        if let Some(reason) = self.reason {
            response
                .extensions_mut()
                .insert(ReasonPhrase::from_static(reason.as_bytes()));
        }
        response
    }
}

/// Extractor that admits only requests bearing [`ADMIN_TOKEN`].
pub struct Authorized;

impl<S: Send + Sync> FromRequestParts<S> for Authorized {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match token {
            Some(ADMIN_TOKEN) => Ok(Authorized),
            _ => Err(ApiFailure::new(StatusCode::UNAUTHORIZED)),
        }
    }
}

type Params = Query<HashMap<String, String>>;

fn paginate<T: Serialize>(items: Vec<T>, path: &str, params: &HashMap<String, String>) -> Value {
    let parse = |key: &str| {
        params
            .get(key)
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
    };
    let per_page = parse("per_page").unwrap_or(DEFAULT_PER_PAGE);
    let page = parse("page").unwrap_or(1);
    let total = items.len();
    let last_page = total.div_ceil(per_page).max(1);
    let start = (page - 1).saturating_mul(per_page);
    let data: Vec<T> = items.into_iter().skip(start).take(per_page).collect();
    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (Some(start + 1), Some(start + data.len()))
    };
    let page_url = |n: usize| format!("{path}?page={n}");
    json!({
        "data": data,
        "current_page": page,
        "first_page_url": page_url(1),
        "from": from,
        "last_page": last_page,
        "last_page_url": page_url(last_page),
        "links": [],
        "next_page_url": (page < last_page).then(|| page_url(page + 1)),
        "path": path,
        "per_page": per_page,
        "prev_page_url": (page > 1).then(|| page_url(page - 1)),
        "to": to,
        "total": total,
    })
}

fn required_fields(body: &Value, fields: &[&str]) -> Result<(), ApiFailure> {
    let mut errors = Map::new();
    for field in fields {
        let present = body
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|v| !v.is_empty());
        if !present {
            errors.insert(field.to_string(), json!(["required"]));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiFailure::with_errors(
            StatusCode::UNPROCESSABLE_ENTITY,
            Value::Object(errors),
        ))
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn login(State(db): State<Db>, Json(body): Json<Value>) -> Result<Json<Value>, ApiFailure> {
    let email = body.get("email").and_then(Value::as_str);
    let phone = body.get("phoneNumber").and_then(Value::as_str);
    if email.is_none() && phone.is_none() {
        return Err(ApiFailure::with_errors(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "email": ["email or phoneNumber is required"] }),
        ));
    }
    required_fields(&body, &["password"])?;

    let store = db.read().await;
    let known = email == Some(store.operator.email.as_str())
        || phone == Some(store.operator_phone.as_str());
    let password = body.get("password").and_then(Value::as_str);
    if !known || password != Some(store.operator_password.as_str()) {
        tracing::info!("rejected login");
        return Err(ApiFailure::new(StatusCode::UNAUTHORIZED));
    }
    Ok(Json(json!({ "token": ADMIN_TOKEN, "user": store.operator })))
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

const GROUP_STATUSES: [&str; 5] = ["PENDING", "APPROVED", "REJECTED", "ACTIVE", "INACTIVE"];

async fn list_groups(_: Authorized, State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let store = db.read().await;
    let groups: Vec<_> = store
        .groups
        .iter()
        .filter(|g| params.get("status").map_or(true, |s| g.status == *s))
        .cloned()
        .collect();
    Json(paginate(groups, "/api/groups", &params))
}

async fn get_group(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    let group = store.groups.iter().find(|g| g.id == id).ok_or_else(ApiFailure::not_found)?;
    Ok(Json(json!(group)))
}

async fn group_members(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    if !store.groups.iter().any(|g| g.id == id) {
        return Err(ApiFailure::not_found());
    }
    let members: Vec<_> = store.members.iter().filter(|m| m.group_id == id).collect();
    Ok(Json(json!(members)))
}

/// Move a pending group to `next`; anything not pending is a conflict.
async fn decide_group(db: &Db, id: u64, next: &str) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    let group = store
        .groups
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    if group.status != "PENDING" {
        return Err(ApiFailure::with_errors(
            StatusCode::CONFLICT,
            json!([format!("group {id} is already {}", group.status)]),
        ));
    }
    group.status = next.to_string();
    group.updated_at = ACTED_AT.to_string();
    tracing::info!(group_id = id, status = next, "group decided");
    Ok(Json(json!({ "data": group })))
}

async fn approve_group(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    decide_group(&db, id, "APPROVED").await
}

async fn reject_group(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    decide_group(&db, id, "REJECTED").await
}

async fn update_group_status(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiFailure> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
    if !GROUP_STATUSES.contains(&status) {
        return Err(ApiFailure::with_errors(
            StatusCode::BAD_REQUEST,
            json!({ "status": [format!("unknown status {status:?}")] }),
        ));
    }
    let mut store = db.write().await;
    let group = store
        .groups
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    group.status = status.to_string();
    group.updated_at = ACTED_AT.to_string();
    Ok(Json(json!({ "data": group })))
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

async fn list_transactions(
    _: Authorized,
    State(db): State<Db>,
    Query(params): Params,
) -> Json<Value> {
    let store = db.read().await;
    let txs: Vec<_> = store
        .transactions
        .iter()
        .filter(|t| params.get("status").map_or(true, |s| t.status == *s))
        .filter(|t| params.get("type").map_or(true, |k| t.kind == *k))
        .cloned()
        .collect();
    Json(paginate(txs, "/api/transactions", &params))
}

async fn transaction_stats(
    _: Authorized,
    State(db): State<Db>,
    Query(params): Params,
) -> Json<Value> {
    let store = db.read().await;
    let txs: Vec<_> = store
        .transactions
        .iter()
        .filter(|t| params.get("type").map_or(true, |k| t.kind == *k))
        .collect();
    let pending = txs.iter().filter(|t| t.status == "PENDING").count();
    let volume: f64 = txs.iter().map(|t| t.amount).sum();
    Json(json!({ "data": { "total": txs.len(), "pending": pending, "volume": volume } }))
}

async fn get_transaction(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    let tx = store
        .transactions
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    Ok(Json(json!(tx)))
}

async fn decide_transaction(
    db: &Db,
    id: u64,
    next: &str,
    reason: Option<String>,
) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    let operator_id = store.operator.id;
    let tx = store
        .transactions
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    if tx.status != "PENDING" {
        return Err(ApiFailure::with_errors(
            StatusCode::CONFLICT,
            json!([format!("transaction {id} is already {}", tx.status)]),
        ));
    }
    tx.status = next.to_string();
    tx.updated_at = ACTED_AT.to_string();
    tx.approved_by = Some(operator_id);
    tx.approved_at = Some(ACTED_AT.to_string());
    tx.rejection_reason = reason;
    tracing::info!(transaction_id = id, status = next, "transaction decided");
    Ok(Json(json!(tx)))
}

async fn approve_transaction(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    decide_transaction(&db, id, "APPROVED", None).await
}

async fn reject_transaction(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiFailure> {
    let reason = body.get("reason").and_then(Value::as_str).map(str::to_string);
    decide_transaction(&db, id, "REJECTED", reason).await
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

const USER_STATUSES: [&str; 3] = ["ACTIVE", "INACTIVE", "SUSPENDED"];

async fn list_users(_: Authorized, State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let store = db.read().await;
    let users: Vec<_> = store
        .users
        .iter()
        .filter(|u| params.get("status").map_or(true, |s| u.status == *s))
        .cloned()
        .collect();
    Json(paginate(users, "/api/users", &params))
}

async fn get_user(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    let user = store.users.iter().find(|u| u.id == id).ok_or_else(ApiFailure::not_found)?;
    Ok(Json(json!(user)))
}

async fn update_user_status(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiFailure> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
    if !USER_STATUSES.contains(&status) {
        return Err(ApiFailure::with_errors(
            StatusCode::BAD_REQUEST,
            json!({ "status": [format!("unknown status {status:?}")] }),
        ));
    }
    let mut store = db.write().await;
    let user = store
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    user.status = status.to_string();
    user.updated_at = ACTED_AT.to_string();
    Ok(Json(json!(user)))
}

async fn user_groups(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    if !store.users.iter().any(|u| u.id == id) {
        return Err(ApiFailure::not_found());
    }
    let groups: Vec<_> = store
        .groups
        .iter()
        .filter(|g| {
            g.owner_id == id
                || store
                    .members
                    .iter()
                    .any(|m| m.group_id == g.id && m.user_id == id)
        })
        .collect();
    Ok(Json(json!(groups)))
}

async fn user_transactions(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(params): Params,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    if !store.users.iter().any(|u| u.id == id) {
        return Err(ApiFailure::not_found());
    }
    let txs: Vec<_> = store
        .transactions
        .iter()
        .filter(|t| t.account_id == id)
        .cloned()
        .collect();
    Ok(Json(paginate(txs, &format!("/api/users/{id}/transactions"), &params)))
}

async fn user_stats(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiFailure> {
    let store = db.read().await;
    if !store.users.iter().any(|u| u.id == id) {
        return Err(ApiFailure::not_found());
    }
    let txs: Vec<_> = store.transactions.iter().filter(|t| t.account_id == id).collect();
    let deposited: f64 = txs.iter().filter(|t| t.kind == "DEPOSIT").map(|t| t.amount).sum();
    Ok(Json(json!({ "transactions": txs.len(), "deposited": deposited })))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

async fn list_notifications(
    _: Authorized,
    State(db): State<Db>,
    Query(params): Params,
) -> Json<Value> {
    let store = db.read().await;
    let read_filter = params.get("read").and_then(|v| v.parse::<bool>().ok());
    let offset = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(usize::MAX);
    let data: Vec<_> = store
        .notifications
        .iter()
        .filter(|n| read_filter.map_or(true, |r| n.read == r))
        .skip(offset)
        .take(limit)
        .collect();
    let unread = store.notifications.iter().filter(|n| !n.read).count();
    Json(json!({ "data": data, "unreadCount": unread }))
}

async fn unread_count(_: Authorized, State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let count = store.notifications.iter().filter(|n| !n.read).count();
    Json(json!({ "count": count }))
}

async fn mark_read(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    let notification = store
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    notification.read = true;
    notification.updated_at = ACTED_AT.to_string();
    Ok(Json(json!(notification)))
}

async fn mark_all_read(_: Authorized, State(db): State<Db>) -> Json<Value> {
    let mut store = db.write().await;
    let mut count = 0;
    for notification in store.notifications.iter_mut().filter(|n| !n.read) {
        notification.read = true;
        notification.updated_at = ACTED_AT.to_string();
        count += 1;
    }
    Json(json!({ "count": count }))
}

const NOTIFICATION_TYPES: [&str; 5] = [
    "SAVINGS_REMINDER",
    "LOAN_APPROVAL",
    "REPAYMENT_DUE",
    "GROUP_UPDATE",
    "DONOR_REPORT",
];

async fn create_notification(
    _: Authorized,
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    required_fields(&body, &["userId", "title", "message", "type"])?;
    let field = |key: &str| body[key].as_str().unwrap_or_default().to_string();
    let kind = field("type");
    if !NOTIFICATION_TYPES.contains(&kind.as_str()) {
        return Err(ApiFailure::with_errors(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "type": [format!("unknown type {kind:?}")] }),
        ));
    }
    let notification = Notification {
        id: Uuid::new_v4(),
        title: field("title"),
        message: field("message"),
        kind,
        read: false,
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        user_id: field("userId"),
    };
    db.write().await.notifications.push(notification.clone());
    Ok((StatusCode::CREATED, Json(json!(notification))))
}

async fn delete_notification(
    _: Authorized,
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiFailure> {
    let mut store = db.write().await;
    let index = store
        .notifications
        .iter()
        .position(|n| n.id == id)
        .ok_or_else(ApiFailure::not_found)?;
    store.notifications.remove(index);
    Ok(Json(json!({ "message": "Notification deleted" })))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Stands in for a report backed by an unavailable upstream service.
async fn upstream_report(_: Authorized) -> ApiFailure {
    ApiFailure::with_errors(StatusCode::BAD_GATEWAY, json!("ledger service unavailable"))
}

/// Ledger totals for a `from`..`to` date range. Both bounds are required.
async fn ledger_report(_: Authorized, Query(params): Params) -> Result<Json<Value>, ApiFailure> {
    match (params.get("from"), params.get("to")) {
        (Some(from), Some(to)) => Ok(Json(json!({
            "from": from,
            "to": to,
            "total_deposits": 0.0,
            "total_withdrawals": 0.0,
        }))),
        _ => Err(ApiFailure::with_errors(
            StatusCode::BAD_REQUEST,
            json!({ "range": ["from and to are required"] }),
        )
        .reason("Invalid Filter")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_reports_page_bounds() {
        let params = HashMap::from([("per_page".to_string(), "2".to_string())]);
        let page = paginate(vec![1, 2, 3], "/api/things", &params);
        assert_eq!(page["data"], json!([1, 2]));
        assert_eq!(page["last_page"], 2);
        assert_eq!(page["from"], 1);
        assert_eq!(page["to"], 2);
        assert_eq!(page["next_page_url"], "/api/things?page=2");
        assert!(page["prev_page_url"].is_null());
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let params = HashMap::from([("page".to_string(), usize::MAX.to_string())]);
        let page = paginate(vec![1, 2, 3], "/api/things", &params);
        assert_eq!(page["data"], json!([]));
        assert!(page["from"].is_null());
        assert_eq!(page["last_page"], 1);
    }

    #[test]
    fn paginate_empty_listing_has_one_page() {
        let page = paginate(Vec::<u8>::new(), "/api/things", &HashMap::new());
        assert_eq!(page["total"], 0);
        assert_eq!(page["last_page"], 1);
        assert!(page["from"].is_null());
    }

    #[test]
    fn required_fields_lists_every_missing_field() {
        let body = json!({"title": "x", "message": ""});
        let err = required_fields(&body, &["title", "message", "type"]).unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.errors,
            Some(json!({"message": ["required"], "type": ["required"]}))
        );
    }

    #[test]
    fn failure_without_errors_uses_reason_phrase() {
        let failure = ApiFailure::new(StatusCode::NOT_FOUND);
        assert!(failure.errors.is_none());
        assert_eq!(failure.status.canonical_reason(), Some("Not Found"));
    }

    #[test]
    fn seeded_store_has_pending_groups() {
        let store = Store::seeded();
        assert_eq!(store.groups.iter().filter(|g| g.status == "PENDING").count(), 2);
    }
}
