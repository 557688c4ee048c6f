//! Integration tests driving the HTTP router

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{sample_book, sample_client, test_state};

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(router: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
async fn health_endpoint_needs_no_auth() {
    let state = test_state().await;
    let router = libra_server::create_router(state);

    let (status, body) = send(&router, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn library_name_is_visible_before_login() {
    let state = test_state().await;
    let router = libra_server::create_router(state);

    let (status, body) = send(&router, "GET", "/api/v1/library", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Librarie");
}

#[tokio::test]
async fn login_and_me_roundtrip() {
    let state = test_state().await;
    let router = libra_server::create_router(state);

    let token = login(&router, "admin", "admin").await;

    let (status, body) = send(&router, "GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
    // The password hash never leaves the server
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn wrong_credentials_and_missing_token_are_unauthorized() {
    let state = test_state().await;
    let router = libra_server::create_router(state);

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&router, "GET", "/api/v1/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn book_crud_over_http() {
    let state = test_state().await;
    let router = libra_server::create_router(state);
    let token = login(&router, "admin", "admin").await;

    let payload = json!({
        "isbn": "9780306406157",
        "title": "The Name of the Rose",
        "author": "Umberto Eco",
        "items": 2
    });
    let (status, body) = send(&router, "POST", "/api/v1/books", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isbn"], "9780306406157");

    // Duplicate ISBN conflicts
    let (status, body) = send(&router, "POST", "/api/v1/books", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());

    let (status, body) = send(&router, "GET", "/api/v1/books/9780306406157", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], 2);

    let (status, body) = send(
        &router,
        "PUT",
        "/api/v1/books/9780306406157",
        Some(&token),
        Some(json!({ "title": "Il nome della rosa", "author": "Umberto Eco", "items": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Il nome della rosa");

    let (status, _) = send(&router, "DELETE", "/api/v1/books/9780306406157", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", "/api/v1/books/9780306406157", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_isbn_is_a_validation_error() {
    let state = test_state().await;
    let router = libra_server::create_router(state);
    let token = login(&router, "admin", "admin").await;

    let (status, _) = send(
        &router,
        "POST",
        "/api/v1/books",
        Some(&token),
        Some(json!({ "isbn": "not-an-isbn", "title": "X", "author": "Y", "items": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clients_are_reachable_by_short_code() {
    let state = test_state().await;
    let client = state
        .services
        .clients
        .create_client(sample_client("short@example.com", "0721777777"))
        .await
        .unwrap();
    let code = state.services.clients.short_code(client.id);
    let router = libra_server::create_router(state);
    let token = login(&router, "admin", "admin").await;

    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/v1/clients/{}", code),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], client.id.to_string());

    let (status, _) = send(&router, "GET", "/api/v1/clients/garbage", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn borrow_lifecycle_over_http() {
    let state = test_state().await;
    state
        .services
        .catalog
        .create_book(sample_book("9780306406157", 1))
        .await
        .unwrap();
    let client = state
        .services
        .clients
        .create_client(sample_client("loan@example.com", "0721888888"))
        .await
        .unwrap();
    let router = libra_server::create_router(state);
    let token = login(&router, "admin", "admin").await;

    let (status, created) = send(
        &router,
        "POST",
        &format!("/api/v1/clients/{}/borrows", client.id),
        Some(&token),
        Some(json!({ "isbn": "9780306406157" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let borrow_id = created["id"].as_i64().unwrap();

    // The single copy is out now
    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/v1/books/9780306406157/availability?client_id={}", client.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert!(body["reason"].is_string());

    let (status, extended) = send(
        &router,
        "POST",
        &format!("/api/v1/borrows/{}/extend", borrow_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(extended["endDate"].as_str().unwrap() > created["endDate"].as_str().unwrap());

    let (status, returned) = send(
        &router,
        "POST",
        &format!("/api/v1/borrows/{}/return", borrow_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["returned"], true);

    // Returning again hits the terminal state
    let (status, _) = send(
        &router,
        "POST",
        &format!("/api/v1/borrows/{}/return", borrow_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Revocation is idempotent
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/v1/borrows/{}", borrow_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/v1/borrows/{}", borrow_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn user_management_requires_admin() {
    let state = test_state().await;
    state
        .services
        .users
        .create_user(libra_server::models::user::CreateUser {
            username: "clerk".to_string(),
            password: "clerkpass".to_string(),
            first_name: "Clerk".to_string(),
            last_name: "Person".to_string(),
            role: libra_server::models::user::Role::User,
        })
        .await
        .unwrap();
    let router = libra_server::create_router(state);
    let token = login(&router, "clerk", "clerkpass").await;

    let (status, _) = send(&router, "GET", "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        "PUT",
        "/api/v1/settings",
        Some(&token),
        Some(json!({ "libraryName": "Hijacked", "cameraDeviceId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Regular staff still read the catalog
    let (status, _) = send(&router, "GET", "/api/v1/books", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn settings_are_replaced_wholesale() {
    let state = test_state().await;
    let router = libra_server::create_router(state);
    let token = login(&router, "admin", "admin").await;

    let (status, body) = send(
        &router,
        "PUT",
        "/api/v1/settings",
        Some(&token),
        Some(json!({ "libraryName": "Biblioteca Centrala", "cameraDeviceId": "cam-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["libraryName"], "Biblioteca Centrala");

    // A save without a camera id clears the stored one
    let (status, body) = send(
        &router,
        "PUT",
        "/api/v1/settings",
        Some(&token),
        Some(json!({ "libraryName": "Biblioteca Centrala", "cameraDeviceId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["cameraDeviceId"].is_null());

    let (status, body) = send(&router, "GET", "/api/v1/settings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["libraryName"], "Biblioteca Centrala");
}
