//! Session lifecycle and the 403 interceptor against a mocked backend.

mod common;

use common::{bare_poll, harness, page_json, user_json};
use polling_app::domain::{PollId, Registration, Route, UserId, ROLE_ADMIN, ROLE_USER};
use polling_app::infrastructure::api::EMAIL_TAKEN_MESSAGE;
use polling_app::infrastructure::storage::{LocalStorage, SESSION_KEY};
use polling_errors::AppError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer, user_id: i64, role_id: i64, token: &str) {
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(user_id, role_id),
            "token": token,
        })))
        .mount(server)
        .await;
}

fn registration() -> Registration {
    Registration {
        first_name: "Grace".into(),
        last_name: "Hopper".into(),
        email: "grace@example.com".into(),
        password: "Cobol#1959".into(),
        confirm_password: "Cobol#1959".into(),
        role_id: Some(ROLE_USER),
    }
}

// ── login ────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_persists_session_and_token_is_sent_afterwards() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({ "email": "user5@example.com", "password": "Secret#123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(5, 2),
            "token": "abc123",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/poll/list/1"))
        .and(header("token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![bare_poll(1)], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    let session = h
        .ctx
        .auth
        .login(" user5@example.com ", "Secret#123")
        .await
        .unwrap();

    assert_eq!(session.user_id, UserId(5));
    assert_eq!(session.token, "abc123");
    assert!(h.ctx.auth.is_authenticated());
    assert!(!h.ctx.auth.is_loading());
    assert_eq!(h.ctx.navigator.current(), Route::LANDING);

    let stored: serde_json::Value =
        serde_json::from_str(&h.storage.get(SESSION_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored["token"], "abc123");
    assert_eq!(stored["roleId"], 2);

    h.ctx.polls.fetch_polls(1).await.unwrap();
}

#[tokio::test]
async fn login_failure_keeps_previous_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    let previous = h.sign_in_user(9);

    let err = h
        .ctx
        .auth
        .login("user9@example.com", "Wrong#pass1")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(h.ctx.auth.error().as_deref(), Some("Invalid credentials"));
    assert_eq!(h.ctx.auth.session(), Some(previous));
    assert!(!h.ctx.auth.is_loading());
}

#[tokio::test]
async fn login_403_does_not_revoke_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Account locked" })))
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    h.sign_in_user(9);

    let err = h
        .ctx
        .auth
        .login("user9@example.com", "Secret#123")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Account locked");
    assert!(!err.is_forbidden());
    assert!(h.ctx.auth.is_authenticated());
}

#[tokio::test]
async fn login_rejects_malformed_email_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    let err = h.ctx.auth.login("not-an-email", "Secret#123").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.ctx.auth.error().as_deref(), Some("Enter a valid email"));

    h.ctx.auth.reset_error();
    assert_eq!(h.ctx.auth.error(), None);
}

#[tokio::test]
async fn login_returns_to_the_interrupted_location() {
    let server = MockServer::start().await;
    mount_login(&server, 1, 1, "admin-token").await;

    let h = harness(&server, 10);
    let reached = h.ctx.guard.navigate(Route::EditPoll(PollId(4)));
    assert_eq!(reached, Route::Login);
    assert_eq!(h.ctx.navigator.return_to(), Some(Route::EditPoll(PollId(4))));

    h.ctx
        .auth
        .login("user1@example.com", "Secret#123")
        .await
        .unwrap();
    assert_eq!(h.ctx.navigator.current(), Route::EditPoll(PollId(4)));
    assert_eq!(h.ctx.navigator.return_to(), None);
}

// ── 403 interceptor ──────────────────────────────────────────────────

#[tokio::test]
async fn forbidden_from_any_store_ends_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/list/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Token expired" })))
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    h.sign_in_admin();
    assert_eq!(h.ctx.guard.navigate(Route::ListUsers), Route::ListUsers);

    let err = h.ctx.users.fetch_users(1, 10).await.unwrap_err();
    assert_eq!(err, AppError::Forbidden("Token expired".into()));

    assert!(!h.ctx.auth.is_authenticated());
    assert_eq!(h.storage.get(SESSION_KEY).unwrap(), None);
    assert_eq!(h.ctx.navigator.current(), Route::Login);
    assert_eq!(h.ctx.navigator.return_to(), Some(Route::ListUsers));
    assert_eq!(h.ctx.guard.navigate(Route::Polls), Route::Login);
}

#[tokio::test]
async fn forbidden_notifies_navigation_subscribers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/poll/list/1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    h.sign_in_user(3);
    h.ctx.guard.navigate(Route::Polls);
    let mut rx = h.ctx.navigator.subscribe();

    let err = h.ctx.polls.fetch_polls(1).await.unwrap_err();
    assert!(err.is_forbidden());
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().route, Route::Login);
}

// ── signup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_registers_then_signs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/register"))
        .and(body_json(json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "password": "Cobol#1959",
            "roleId": 2
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "user": user_json(12, 2) })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({ "email": "grace@example.com", "password": "Cobol#1959" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(12, 2),
            "token": "fresh",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    let session = h.ctx.auth.signup(&registration()).await.unwrap();
    assert_eq!(session.user_id, UserId(12));
    assert_eq!(h.ctx.auth.session().unwrap().token, "fresh");
    assert_eq!(h.ctx.navigator.current(), Route::Polls);
}

#[tokio::test]
async fn signup_with_taken_email_reports_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/register"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User already exists"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    let err = h.ctx.auth.signup(&registration()).await.unwrap_err();
    assert_eq!(err.user_message(), EMAIL_TAKEN_MESSAGE);
    assert_eq!(h.ctx.auth.error().as_deref(), Some(EMAIL_TAKEN_MESSAGE));
    assert!(!h.ctx.auth.is_authenticated());
}

#[tokio::test]
async fn signup_password_mismatch_is_caught_locally() {
    let server = MockServer::start().await;
    let h = harness(&server, 10);
    let mut form = registration();
    form.confirm_password = "Cobol#1960".into();

    let err = h.ctx.auth.signup(&form).await.unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match");
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── logout and roles ─────────────────────────────────────────────────

#[tokio::test]
async fn logout_clears_session_and_returns_to_login() {
    let server = MockServer::start().await;
    let h = harness(&server, 10);
    h.sign_in_admin();
    h.ctx.guard.navigate(Route::AddPoll);

    h.ctx.auth.logout();
    assert!(!h.ctx.auth.is_authenticated());
    assert_eq!(h.ctx.navigator.current(), Route::Login);
    assert_eq!(h.ctx.auth.snapshot().role_id, None);
}

#[tokio::test]
async fn fetch_roles_loads_role_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/role/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Admin" },
            { "id": 2, "name": "User" }
        ])))
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    let roles = h.ctx.auth.fetch_roles().await.unwrap();
    assert_eq!(roles.len(), 2);
    assert_eq!(roles[0].id, ROLE_ADMIN);
    assert_eq!(h.ctx.auth.roles()[1].name, "User");
    assert!(!h.ctx.auth.roles_loading());
}

#[tokio::test]
async fn fetch_roles_is_sent_without_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/role/list"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Nope" })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, 10);
    h.sign_in_admin();

    let err = h.ctx.auth.fetch_roles().await.unwrap_err();
    assert_eq!(err.user_message(), "Nope");
    assert!(h.ctx.auth.is_authenticated());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("token").is_none());
}
