//! Login, logout and account deletion through the session store

mod common;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer};

use blogdesk::api::LoginRequest;
use blogdesk::session::FileStorage;
use blogdesk::{ErrorCode, Session};
use common::{client_for, error, success};

fn credentials(password: &str) -> LoginRequest {
    LoginRequest {
        username_email: "ada@example.com".to_string(),
        password: password.to_string(),
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username_email": "ada@example.com", "password": "engine1"})))
        .respond_with(success("Login successful", json!({"access_token": "tok-abc"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username_email": "ada@example.com", "password": "wrong-pass"})))
        .respond_with(error(401, "UNAUTHORIZED", "Invalid username/email or password"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let session = Session::restore(Box::new(FileStorage::new(&path))).unwrap();
    let client = client_for(&server, &session);

    let response = session.login(&client, &credentials("engine1")).await.unwrap();
    assert_eq!(response.message, "Login successful");
    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("tok-abc"));

    // A fresh process picks the session back up
    let restored = Session::restore(Box::new(FileStorage::new(&path))).unwrap();
    assert_eq!(restored.token().as_deref(), Some("tok-abc"));
}

#[tokio::test]
async fn test_invalid_login_leaves_token_unset() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let session = Session::in_memory();
    let client = client_for(&server, &session);

    let err = session.login(&client, &credentials("wrong-pass")).await.unwrap_err();
    let api = err.api_error().expect("backend error");
    assert_eq!(api.message, "Invalid username/email or password");
    assert_eq!(err.user_message(), "Invalid username/email or password");
    assert!(!session.is_authenticated());
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn test_login_then_requests_carry_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("Authorization", "Bearer tok-abc"))
        .respond_with(success(
            "ok",
            json!({"id": 1, "username": "ada", "name": "Ada", "email": "ada@example.com"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, &session);
    session.login(&client, &credentials("engine1")).await.unwrap();

    let me = client.current_user().await.unwrap().data.unwrap();
    assert_eq!(me.id, 1);
}

#[tokio::test]
async fn test_logout_removes_stored_token() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    let session = Session::restore(Box::new(FileStorage::new(&path))).unwrap();
    session.set_token("tok").unwrap();

    session.logout().unwrap();
    assert!(!session.is_authenticated());
    let restored = Session::restore(Box::new(FileStorage::new(&path))).unwrap();
    assert!(!restored.is_authenticated());
}

async fn mount_delete(server: &MockServer, wrong_status: u16, wrong_code: &str) {
    Mock::given(method("DELETE"))
        .and(path("/user"))
        .and(header("X-Password", "engine1"))
        .respond_with(success("Account deleted", json!(null)))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/user"))
        .and(header("X-Password", "nope-nope"))
        .respond_with(error(wrong_status, wrong_code, "Incorrect password"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_delete_user_sends_password_header() {
    let server = MockServer::start().await;
    mount_delete(&server, 403, "FORBIDDEN").await;

    let session = Session::in_memory();
    session.set_token("tok").unwrap();
    let client = client_for(&server, &session);

    let response = client.delete_user("engine1").await.unwrap();
    assert_eq!(response.message, "Account deleted");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("x-password").unwrap().to_str().unwrap(),
        "engine1"
    );
}

#[tokio::test]
async fn test_delete_user_wrong_password_forbidden_keeps_session() {
    let server = MockServer::start().await;
    mount_delete(&server, 403, "FORBIDDEN").await;

    let session = Session::in_memory();
    session.set_token("tok").unwrap();
    let client = client_for(&server, &session);

    let err = client.delete_user("nope-nope").await.unwrap_err();
    assert_eq!(err.api_error().unwrap().code, ErrorCode::Forbidden);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_delete_user_wrong_password_unauthorized_clears_session() {
    let server = MockServer::start().await;
    mount_delete(&server, 401, "UNAUTHORIZED").await;

    let session = Session::in_memory();
    session.set_token("tok").unwrap();
    let client = client_for(&server, &session);

    let err = client.delete_user("nope-nope").await.unwrap_err();
    assert_eq!(err.api_error().unwrap().code, ErrorCode::Unauthorized);
    assert!(!session.is_authenticated());
}
