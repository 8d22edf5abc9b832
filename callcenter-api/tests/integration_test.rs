/// Router integration tests
///
/// The first group needs no database: the requests are rejected before any
/// query runs, or exercise middleware only. The second group runs against
/// PostgreSQL and is skipped when `DATABASE_URL` is unset.
///
/// Run with: cargo test -p callcenter-api --test integration_test

mod common;

use axum::http::{header, Method, StatusCode};
use common::{body_bytes, offline_app, read_json, send, unique, TestContext};
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let app = offline_app(&[]);

    let (status, body) = read_json(send(&app, Method::GET, "/health", None).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = offline_app(&[]);

    let response = send(&app, Method::POST, "/auth/logout", None).await;
    let headers = response.headers();

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    assert!(!headers["x-request-id"].is_empty());
}

#[tokio::test]
async fn test_production_adds_hsts() {
    let app = offline_app(&[("APP_ENV", "production")]);

    let response = send(&app, Method::POST, "/auth/logout", None).await;

    assert!(response
        .headers()
        .get(header::STRICT_TRANSPORT_SECURITY)
        .is_some());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = offline_app(&[]);

    let response = send(&app, Method::POST, "/auth/logout", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = offline_app(&[]);

    let (status, body) =
        read_json(send(&app, Method::POST, "/auth/login", Some(json!({}))).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["password", "username"]);
}

async fn assert_bad_request(method: Method, uri: &str, body: Value, message: &str) {
    let app = offline_app(&[]);

    let (status, json) = read_json(send(&app, method, uri, Some(body)).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, json);
    assert_eq!(json["error"], "bad_request");
    assert_eq!(json["message"], message);
}

#[tokio::test]
async fn test_customer_request_validation() {
    assert_bad_request(Method::POST, "/customers", json!({}), "Phone number is required").await;
    assert_bad_request(
        Method::POST,
        "/customers",
        json!({ "phone_number": "0901", "status": "open" }),
        "Invalid status value",
    )
    .await;
    assert_bad_request(
        Method::PUT,
        "/customers/abc",
        json!({ "phone_number": "0901", "status": "1", "updated_by": 1 }),
        "Invalid customer ID",
    )
    .await;
    assert_bad_request(
        Method::PUT,
        "/customers/5",
        json!({ "phone_number": "0901", "status": "1" }),
        "Updated by is required",
    )
    .await;
    assert_bad_request(
        Method::PUT,
        "/customers/5",
        json!({ "phone_number": "0901", "updated_by": "3" }),
        "Status is required",
    )
    .await;
    assert_bad_request(
        Method::DELETE,
        "/customers/0",
        json!({}),
        "Invalid customer ID",
    )
    .await;
}

#[tokio::test]
async fn test_status_request_validation() {
    assert_bad_request(
        Method::PUT,
        "/customers",
        json!({ "id": 1, "status": "1" }),
        "Missing required fields",
    )
    .await;
    assert_bad_request(
        Method::PUT,
        "/customers",
        json!({ "id": 1, "status": "closed", "updated_by": 1 }),
        "Invalid updated_by or status value",
    )
    .await;
    assert_bad_request(
        Method::PUT,
        "/customers",
        json!({ "id": 1, "status": "1", "updated_by": "me" }),
        "Invalid updated_by or status value",
    )
    .await;
}

#[tokio::test]
async fn test_employee_and_team_request_validation() {
    assert_bad_request(
        Method::POST,
        "/employees",
        json!({ "username": "op", "name": "Operator" }),
        "Username, name, and team_id are required",
    )
    .await;
    assert_bad_request(
        Method::POST,
        "/employees",
        json!({ "username": "op", "name": "Operator", "team_id": "one" }),
        "Invalid team_id, it must be an integer",
    )
    .await;
    assert_bad_request(Method::PUT, "/employees", json!({}), "User ID is required").await;
    assert_bad_request(Method::POST, "/teams", json!({ "team_name": " " }), "Team name is required")
        .await;
    assert_bad_request(
        Method::PUT,
        "/teams/x",
        json!({ "team_name": "A" }),
        "Invalid team ID",
    )
    .await;
}

#[tokio::test]
async fn test_mistyped_body_gets_json_error() {
    let app = offline_app(&[]);

    for (method, uri, body) in [
        (
            Method::PUT,
            "/customers",
            json!({ "id": 1, "status": "1", "updated_by": 1, "is_admin": "true" }),
        ),
        (Method::POST, "/teams", json!({ "team_name": 5 })),
        (
            Method::POST,
            "/employees",
            json!({ "username": "op", "name": "Operator", "team_id": 1.5 }),
        ),
        (Method::POST, "/auth/login", json!("operator1:secret")),
    ] {
        let response = send(&app, method, uri, Some(body)).await;
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json",
            "{}",
            uri
        );

        let (status, json) = read_json(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, json);
        assert_eq!(json["error"], "bad_request");
        assert!(json["message"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_json_gets_json_error() {
    let app = offline_app(&[]);
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/customers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"phone_number\": "))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    let (status, json) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
}

// Database-backed tests

/// Creates a team and returns its id
async fn create_team(ctx: &TestContext, name: &str) -> i64 {
    let (status, _) = read_json(
        ctx.send(Method::POST, "/teams", Some(json!({ "team_name": name })))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, teams) = read_json(ctx.send(Method::GET, "/teams", None).await).await;
    teams["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["team_name"] == name)
        .and_then(|t| t["id"].as_i64())
        .unwrap()
}

/// Creates an employee and returns its id; the password is the username
async fn create_employee(ctx: &TestContext, team_id: i64, role: &str) -> (i64, String) {
    let username = unique("user");
    let (status, body) = read_json(
        ctx.send(
            Method::POST,
            "/employees",
            Some(json!({
                "username": username,
                "name": "Test Employee",
                "user_role": role,
                "team_id": team_id.to_string(),
            })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["team_id"], team_id);

    let id = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE username = $1")
        .bind(&username)
        .fetch_one(&ctx.db)
        .await
        .unwrap()
        .0;

    (id, username)
}

#[tokio::test]
async fn test_login_sets_cookie_and_failures_match() {
    let Some(ctx) = TestContext::new(&[]).await else { return };
    let team_id = create_team(&ctx, "Alpha").await;
    let (_, username) = create_employee(&ctx, team_id, "2").await;

    let response = ctx
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": username, "password": username })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"));

    let (_, body) = read_json(response).await;
    assert_eq!(body["message"], "Logged in successfully");
    assert_eq!(body["data"]["is_first_login"], true);
    assert!(cookie.contains(body["data"]["token"].as_str().unwrap()));

    let unknown = ctx
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": unique("ghost"), "password": "x" })),
        )
        .await;
    let wrong = ctx
        .send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": username, "password": "wrong" })),
        )
        .await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(unknown).await, body_bytes(wrong).await);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_password_reset_then_change() {
    let Some(ctx) = TestContext::new(&[]).await else { return };
    let team_id = create_team(&ctx, "Alpha").await;
    let (_, username) = create_employee(&ctx, team_id, "2").await;

    let response = ctx
        .send(
            Method::PUT,
            "/auth/update-password",
            Some(json!({ "username": username, "password": "reset-pass" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let (status, _) = read_json(
        ctx.send(
            Method::POST,
            "/auth/update-password",
            Some(json!({ "username": username, "password": "nope", "newPassword": "next" })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = read_json(
        ctx.send(
            Method::POST,
            "/auth/update-password",
            Some(json!({ "username": username, "password": "reset-pass", "newPassword": "next" })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully");

    let (status, body) = read_json(
        ctx.send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": username, "password": "next" })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_first_login"], false);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_legacy_guard_mode_reports_success_without_change() {
    let Some(ctx) = TestContext::new(&[("PASSWORD_CHANGE_MODE", "legacy_guard")]).await else {
        return;
    };
    let team_id = create_team(&ctx, "Alpha").await;
    let (_, username) = create_employee(&ctx, team_id, "2").await;

    let (status, _) = read_json(
        ctx.send(
            Method::POST,
            "/auth/update-password",
            Some(json!({ "username": username, "password": username, "newPassword": "next" })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = read_json(
        ctx.send(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": username, "password": username })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_customer_lifecycle() {
    let Some(ctx) = TestContext::new(&[]).await else { return };
    let team_id = create_team(&ctx, "Alpha").await;
    let (operator, _) = create_employee(&ctx, team_id, "2").await;
    let (admin, _) = create_employee(&ctx, team_id, "0").await;

    let new_customer = json!({
        "full_name": "Nguyen Van A",
        "year_of_birth": "1990",
        "phone_number": "0901234567",
        "role_note": "sales",
        "team_id": team_id,
        "updated_by": operator,
    });

    let (status, body) =
        read_json(ctx.send(Method::POST, "/customers", Some(new_customer.clone())).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "0");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) =
        read_json(ctx.send(Method::POST, "/customers", Some(new_customer)).await).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Phone number already exists");

    // 0 -> 2
    let (status, _) = read_json(
        ctx.send(
            Method::PUT,
            "/customers",
            Some(json!({ "id": id, "status": "2", "updated_by": operator })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 2 -> 1 needs an admin
    let (status, body) = read_json(
        ctx.send(
            Method::PUT,
            "/customers",
            Some(json!({ "id": id, "status": 1, "updated_by": operator, "is_admin": false })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");

    let (status, _) = read_json(
        ctx.send(
            Method::PUT,
            "/customers",
            Some(json!({ "id": id, "status": 1, "updated_by": admin, "is_admin": true })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = read_json(
        ctx.send(
            Method::PUT,
            "/customers",
            Some(json!({ "id": 999_999, "status": 1, "updated_by": admin })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Numeric but unknown status
    let (status, body) = read_json(
        ctx.send(
            Method::PUT,
            "/customers",
            Some(json!({ "id": id, "status": "3", "updated_by": admin, "is_admin": true })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");
    assert_eq!(body["message"], "Invalid status transition from 1 to 3");

    let (status, _) = read_json(
        ctx.send(
            Method::PUT,
            "/customers",
            Some(json!({ "id": 999_999, "status": "3", "updated_by": admin })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = read_json(ctx.send(Method::GET, "/customers?page=1&limit=10", None).await).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["totalPages"], 1);
    assert_eq!(page["data"][0]["status"], "1");
    assert_eq!(page["data"][0]["updated_by"], Value::Null);

    let (_, stats) =
        read_json(ctx.send(Method::GET, "/statistical?role_note=null", None).await).await;
    assert_eq!(stats["data"][0]["call_count"], 1);
    assert_eq!(stats["data"][0]["caller"], "sales");

    let (status, _) =
        read_json(ctx.send(Method::DELETE, &format!("/customers/{}", id), None).await).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        read_json(ctx.send(Method::DELETE, &format!("/customers/{}", id), None).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_teams_and_employees_listing() {
    let Some(ctx) = TestContext::new(&[]).await else { return };
    let alpha = create_team(&ctx, "Alpha").await;
    create_team(&ctx, "Beta").await;
    let (editor, _) = create_employee(&ctx, alpha, "0").await;
    create_employee(&ctx, alpha, "2").await;

    let (status, _) = read_json(
        ctx.send(Method::POST, "/teams", Some(json!({ "team_name": "Alpha" })))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = read_json(
        ctx.send(
            Method::PUT,
            &format!("/teams/{}", alpha),
            Some(json!({ "team_name": "Alpha Night", "updated_by": editor })),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["team_name"], "Alpha Night");
    assert_eq!(body["data"]["updated_by"], editor);

    let (_, all) = read_json(ctx.send(Method::GET, "/teams?page=&limit=", None).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let (_, paged) = read_json(ctx.send(Method::GET, "/teams?page=2&limit=1", None).await).await;
    assert_eq!(paged["data"].as_array().unwrap().len(), 1);
    assert_eq!(paged["data"][0]["team_name"], "Beta");

    // Admins are not listed
    let (_, employees) = read_json(ctx.send(Method::GET, "/employees", None).await).await;
    assert_eq!(employees["total"], 1);

    ctx.cleanup().await;
}
