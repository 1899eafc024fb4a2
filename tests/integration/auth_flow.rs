//! Integration tests for authentication against a live in-process backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use taskdeck::remote::{ApiClient, ApiError};
use taskdeck_server::server;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts an in-process backend on an OS-assigned port.
async fn start_backend() -> std::net::SocketAddr {
    let (addr, _handle) = server::start_server("127.0.0.1:0")
        .await
        .expect("failed to start test backend");
    addr
}

/// Creates an API client pointed at the test backend.
fn make_client(addr: std::net::SocketAddr) -> ApiClient {
    ApiClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_up_sign_in_and_me() {
    let addr = start_backend().await;
    let mut client = make_client(addr);

    let user = client.sign_up("alice@example.com", "hunter22").await.unwrap();
    assert_eq!(user.email, "alice@example.com");

    let session = client.sign_in("alice@example.com", "hunter22").await.unwrap();
    assert_eq!(session.user, user);
    assert!(!session.token.is_empty());

    let me = client.current_user().await.unwrap().unwrap();
    assert_eq!(me, user);
}

#[tokio::test]
async fn sign_in_wrong_password_is_unauthorized() {
    let addr = start_backend().await;
    let mut client = make_client(addr);

    client.sign_up("alice@example.com", "hunter22").await.unwrap();
    let err = client
        .sign_in("alice@example.com", "wrong-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn sign_in_unknown_account_is_unauthorized() {
    let addr = start_backend().await;
    let mut client = make_client(addr);

    let err = client
        .sign_in("ghost@example.com", "whatever42")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected() {
    let addr = start_backend().await;
    let client = make_client(addr);

    client.sign_up("alice@example.com", "hunter22").await.unwrap();
    let err = client
        .sign_up("alice@example.com", "other-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 409, .. }));
}

#[tokio::test]
async fn short_password_is_rejected() {
    let addr = start_backend().await;
    let client = make_client(addr);

    let err = client.sign_up("bob@example.com", "12345").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let addr = start_backend().await;
    let client = make_client(addr);

    let err = client.sign_up("not-an-email", "hunter22").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
}

#[tokio::test]
async fn sign_out_revokes_the_token() {
    let addr = start_backend().await;
    let mut client = make_client(addr);

    client.sign_up("alice@example.com", "hunter22").await.unwrap();
    let session = client.sign_in("alice@example.com", "hunter22").await.unwrap();

    client.sign_out().await.unwrap();

    // A fresh client presenting the revoked token is no longer anyone.
    let mut stale = make_client(addr);
    stale.set_token(Some(session.token));
    assert!(stale.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn task_calls_require_authentication() {
    let addr = start_backend().await;
    let client = make_client(addr);

    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn stale_token_resolves_to_no_user() {
    let addr = start_backend().await;
    let mut client = make_client(addr);
    client.set_token(Some("made-up-token".to_string()));

    // Not an error: a stale remembered session just means "sign in again".
    assert!(client.current_user().await.unwrap().is_none());
}
