use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ADMIN_TOKEN};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str, body: Option<&str>) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(body.unwrap_or_default().to_string())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn login_with_email_returns_token() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login/",
            r#"{"email":"admin@example.com","password":"secret"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["token"], ADMIN_TOKEN);
    assert_eq!(body["user"]["email"], "admin@example.com");
}

#[tokio::test]
async fn login_with_phone_number_returns_token() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            r#"{"phoneNumber":"+254700000000","password":"secret"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_returns_401() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/auth/login/",
            r#"{"email":"admin@example.com","password":"guess"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_identifier_returns_422_with_errors() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login/", r#"{"password":"secret"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/groups").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- groups ---

#[tokio::test]
async fn list_groups_filters_by_status() {
    let resp = app()
        .oneshot(authed("GET", "/api/groups?status=PENDING", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["current_page"], 1);
    for group in body["data"].as_array().unwrap() {
        assert_eq!(group["status"], "PENDING");
    }
}

#[tokio::test]
async fn get_group_not_found() {
    let resp = app()
        .oneshot(authed("GET", "/api/groups/999", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approving_active_group_conflicts() {
    let resp = app()
        .oneshot(authed("PATCH", "/api/groups/1/approve", Some("{}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn unknown_group_status_returns_400() {
    let resp = app()
        .oneshot(authed("PATCH", "/api/groups/2/status", Some(r#"{"status":"ARCHIVED"}"#)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["errors"]["status"].is_array());
}

// --- transactions ---

#[tokio::test]
async fn transactions_filter_by_status_and_type() {
    let resp = app()
        .oneshot(authed("GET", "/api/transactions?status=PENDING&type=DEPOSIT", None))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["type"], "DEPOSIT");
}

#[tokio::test]
async fn transaction_stats_are_wrapped_in_data() {
    let resp = app()
        .oneshot(authed("GET", "/api/transactions/stats", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["total"], 4);
}

// --- notifications ---

#[tokio::test]
async fn create_notification_missing_fields_returns_422() {
    let resp = app()
        .oneshot(authed("POST", "/api/notifications", Some(r#"{"title":"Hi"}"#)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["errors"]["message"], json!(["required"]));
}

#[tokio::test]
async fn delete_unknown_notification_returns_404() {
    let resp = app()
        .oneshot(authed(
            "DELETE",
            "/api/notifications/00000000-0000-0000-0000-000000000000",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- reports ---

#[tokio::test]
async fn upstream_report_returns_502_with_errors() {
    let resp = app()
        .oneshot(authed("GET", "/api/reports/upstream", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(resp).await;
    assert_eq!(body["errors"], "ledger service unavailable");
}

#[tokio::test]
async fn ledger_report_without_range_uses_custom_reason() {
    let resp = app()
        .oneshot(authed("GET", "/api/reports/ledger", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let reason = resp.extensions().get::<hyper::ext::ReasonPhrase>().unwrap();
    assert_eq!(reason.as_bytes(), b"Invalid Filter");
    let body = body_json(resp).await;
    assert_eq!(body["errors"]["range"], json!(["from and to are required"]));
}

#[tokio::test]
async fn ledger_report_with_range_succeeds() {
    let resp = app()
        .oneshot(authed("GET", "/api/reports/ledger?from=2024-01-01&to=2024-01-31", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.extensions().get::<hyper::ext::ReasonPhrase>().is_none());
    let body = body_json(resp).await;
    assert_eq!(body["from"], "2024-01-01");
}

// --- full approval flow ---

#[tokio::test]
async fn approval_flow() {
    use tower::Service;

    let mut app = app().into_service();

    // Approve a pending transaction.
    let req = authed("PATCH", "/api/transactions/2/approve", Some("{}"));
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let tx = body_json(resp).await;
    assert_eq!(tx["status"], "APPROVED");
    assert_eq!(tx["approvedBy"], 1);

    // A second decision on the same transaction conflicts.
    let req = authed("PATCH", "/api/transactions/2/reject", Some(r#"{"reason":"late"}"#));
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Reject the other pending one with a reason.
    let req = authed("PATCH", "/api/transactions/3/reject", Some(r#"{"reason":"duplicate"}"#));
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let tx = body_json(resp).await;
    assert_eq!(tx["rejectionReason"], "duplicate");

    // Nothing is pending any more.
    let req = authed("GET", "/api/transactions?status=PENDING", None);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let bytes = body_bytes(resp).await;
    let page: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(page["total"], 0);
}
