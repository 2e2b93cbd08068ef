use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use roster::api::AppState;
use roster::config::Config;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 256;
    config.security.argon2_time_cost = 1;

    let state = roster::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (roster::api::router(state.clone()).await, state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(app: &Router, name: &str, email: &str, password: &str, roles: &str) -> Response {
    send(
        app,
        "POST",
        "/userinfos/new",
        None,
        Some(json!({ "name": name, "email": email, "password": password, "roles": roles })),
    )
    .await
}

/// Logs in and returns the `name=value` part of the session cookie.
async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn admin_session(app: &Router) -> String {
    let response = register(app, "Admin", "admin@a.com", "1234", "ROLE_ADMIN,ROLE_USER").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    login(app, "admin@a.com", "1234").await
}

#[tokio::test]
async fn test_public_and_protected_routes() {
    let (app, _) = spawn_app().await;

    let response = send(&app, "GET", "/api/users/welcome", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    for uri in ["/api/users", "/api/customers", "/api/students", "/api/auth/me"] {
        let response = send(&app, "GET", uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let json = body_json(response).await;
        assert_eq!(json["success"], false, "{uri}");
        assert_eq!(json["error"], "Not authenticated", "{uri}");
    }
}

#[tokio::test]
async fn test_stale_session_cookie_gets_json_401() {
    let (app, _) = spawn_app().await;

    let response = send(&app, "GET", "/api/auth/me", Some("id=bogus"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
    assert_eq!(body_json(response).await["error"], "Not authenticated");
}

#[tokio::test]
async fn test_register_login_and_current_principal() {
    let (app, _) = spawn_app().await;

    let response = register(&app, "Spring", "spring@a.com", "1234", "ROLE_ADMIN,ROLE_USER").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Spring user added");
    assert_eq!(json["data"]["name"], "Spring");

    let cookie = login(&app, "spring@a.com", "1234").await;

    let response = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let principal = &json["data"];
    assert_eq!(principal["username"], "spring@a.com");
    assert_eq!(principal["authorities"], json!(["ROLE_ADMIN", "ROLE_USER"]));
    assert_eq!(principal["enabled"], true);
    assert_eq!(principal["account_non_locked"], true);
    assert!(principal.get("password_hash").is_none());
    assert!(!json.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_form_login_sets_session() {
    let (app, _) = spawn_app().await;
    register(&app, "Form", "form@a.com", "1234", "ROLE_USER").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(
                    header::CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(Body::from("username=form%40a.com&password=1234"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let (app, _) = spawn_app().await;
    register(&app, "Spring", "spring@a.com", "1234", "ROLE_USER").await;

    let unknown = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody@x.com", "password": "1234" })),
    )
    .await;
    let wrong = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "spring@a.com", "password": "12345" })),
    )
    .await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(unknown).await, body_json(wrong).await);
}

#[tokio::test]
async fn test_duplicate_registration_keeps_one_account() {
    let (app, state) = spawn_app().await;

    let first = register(&app, "First", "dup@a.com", "1234", "ROLE_USER").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register(&app, "Second", "dup@a.com", "5678", "ROLE_USER").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    assert_eq!(
        state.store().count_accounts_with_email("dup@a.com").await.unwrap(),
        1
    );

    // The first secret still works, the second never took effect
    login(&app, "dup@a.com", "1234").await;
}

#[tokio::test]
async fn test_invalid_registration_reports_fields() {
    let (app, state) = spawn_app().await;

    let response = register(&app, "", "not-an-email", "12", "ROLE_USER").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["errors"]["name"].is_string());
    assert!(json["errors"]["email"].is_string());
    assert!(json["errors"]["password"].is_string());

    assert_eq!(
        state.store().count_accounts_with_email("not-an-email").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _) = spawn_app().await;
    let cookie = admin_session(&app).await;

    let response = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_endpoints() {
    let (app, _) = spawn_app().await;
    let cookie = admin_session(&app).await;

    let response = send(
        &app,
        "POST",
        "/api/users",
        Some(&cookie),
        Some(json!({ "name": "Kim", "email": "kim@a.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(created["data"]["created_at"].is_string());

    let response = send(
        &app,
        "POST",
        "/api/users",
        Some(&cookie),
        Some(json!({ "name": "Kim Again", "email": "kim@a.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        "PUT",
        "/api/users/email/kim@a.com",
        Some(&cookie),
        Some(json!({ "name": "Kim Lee" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", "/api/users/email/kim@a.com", Some(&cookie), None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Kim Lee");
    assert_eq!(json["data"]["created_at"], created["data"]["created_at"]);

    let response = send(&app, "GET", "/api/users", Some(&cookie), None).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/users/{id}");
    let response = send(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &uri, Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/api/users/0", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_delete_requires_admin_and_sees_role_changes() {
    let (app, state) = spawn_app().await;
    let admin = admin_session(&app).await;

    let response = send(
        &app,
        "POST",
        "/api/users",
        Some(&admin),
        Some(json!({ "name": "Target", "email": "target@a.com" })),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/users/{id}");

    register(&app, "Plain", "plain@a.com", "1234", "ROLE_USER").await;
    let plain = login(&app, "plain@a.com", "1234").await;

    let response = send(&app, "DELETE", &uri, Some(&plain), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Each request resolves a fresh principal, so the new role applies at once
    state
        .store()
        .update_account_roles("plain@a.com", "ROLE_USER,ROLE_ADMIN")
        .await
        .unwrap()
        .expect("account exists");

    let response = send(&app, "DELETE", &uri, Some(&plain), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_customer_endpoints() {
    let (app, _) = spawn_app().await;
    let cookie = admin_session(&app).await;

    for (code, name) in [("C001", "Acme Corp"), ("C002", "Globex"), ("C003", "Acme Labs")] {
        let response = send(
            &app,
            "POST",
            "/api/customers",
            Some(&cookie),
            Some(json!({ "customer_id": code, "customer_name": name })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &app,
        "POST",
        "/api/customers",
        Some(&cookie),
        Some(json!({ "customer_id": "C001", "customer_name": "Other" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        "POST",
        "/api/customers",
        Some(&cookie),
        Some(json!({ "customer_id": "", "customer_name": "" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["errors"]["customer_id"].is_string());
    assert!(json["errors"]["customer_name"].is_string());

    let response = send(&app, "GET", "/api/customers?name=Acme", Some(&cookie), None).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = send(&app, "GET", "/api/customers/code/C002", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["customer_name"], "Globex");
    let id = json["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/customers/{id}");
    let response = send(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/api/customers", Some(&cookie), None).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_student_endpoints() {
    let (app, _) = spawn_app().await;
    let cookie = admin_session(&app).await;

    let response = send(
        &app,
        "POST",
        "/api/students",
        Some(&cookie),
        Some(json!({
            "name": "Dooly",
            "student_number": "S-100",
            "detail": {
                "address": "Seoul",
                "phone_number": "010-1234-5678",
                "email": "dooly@a.com",
                "date_of_birth": "2001-02-03"
            }
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["detail"]["address"], "Seoul");
    assert_eq!(json["data"]["detail"]["date_of_birth"], "2001-02-03");

    let response = send(
        &app,
        "POST",
        "/api/students",
        Some(&cookie),
        Some(json!({ "name": "Copy", "student_number": "S-100" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let uri = format!("/api/students/{id}");
    let response = send(
        &app,
        "PUT",
        &uri,
        Some(&cookie),
        Some(json!({ "name": "Dooly Kim", "student_number": "S-100" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Dooly Kim");
    assert_eq!(json["data"]["detail"]["address"], "Seoul");

    let response = send(&app, "GET", "/api/students/number/S-100", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "DELETE", &uri, Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &uri, Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_disabled_message() {
    let (app, _) = spawn_app().await;

    let response = send(&app, "GET", "/metrics", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
