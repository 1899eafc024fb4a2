//! Integration tests for the rollback discipline: when the backend refuses
//! a mutation mid-session (here: the token is revoked from another client,
//! exactly what an expired session looks like), the optimistic local change
//! is rolled back and the store stays usable.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use taskdeck::remote::ApiClient;
use taskdeck::store::{StoreError, TaskStore};
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

/// Registers `email` (if needed), signs in, and builds a remote-backed store.
async fn signed_in_store(addr: std::net::SocketAddr, email: &str) -> TaskStore {
    let mut client = make_client(addr);
    // Ignore "already exists" so a test can sign the same account in twice.
    let _ = client.sign_up(email, "hunter22").await;
    let session = client.sign_in(email, "hunter22").await.unwrap();
    TaskStore::with_remote(session, client)
}

/// Revokes the store's token from a second client, simulating an expired
/// session. Subsequent mutations through the store fail server-side.
async fn revoke_session(addr: std::net::SocketAddr, store: &TaskStore) {
    let mut revoker = make_client(addr);
    revoker.set_token(Some(store.session().token.clone()));
    revoker.sign_out().await.unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rolls_back_after_revocation() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;
    revoke_session(addr, &store).await;

    let err = store.create_task("Never persisted", None).await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));
    assert!(store.tasks().is_empty());

    // The backend never saw it either: a fresh session of the same account
    // lists nothing.
    let mut fresh = signed_in_store(addr, "alice@example.com").await;
    fresh.refresh().await.unwrap();
    assert!(fresh.tasks().is_empty());
}

#[tokio::test]
async fn toggle_rolls_back_after_revocation() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;
    let task = store.create_task("Stays open", None).await.unwrap();

    revoke_session(addr, &store).await;

    let err = store.toggle_task(&task.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));

    // The optimistic flip was undone: still open, no stamp.
    let local = &store.tasks()[0];
    assert!(!local.completed);
    assert!(local.completed_at.is_none());
}

#[tokio::test]
async fn remove_rolls_back_after_revocation() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;
    let first = store.create_task("First", None).await.unwrap();
    let second = store.create_task("Second", None).await.unwrap();

    revoke_session(addr, &store).await;

    let err = store.remove_task(&first.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));

    // Reinserted at its original position.
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0].id, first.id);
    assert_eq!(store.tasks()[1].id, second.id);
}

#[tokio::test]
async fn refresh_failure_leaves_the_list_unchanged() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;
    store.create_task("Still listed", None).await.unwrap();

    revoke_session(addr, &store).await;

    let err = store.refresh().await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].text, "Still listed");
}

#[tokio::test]
async fn store_stays_usable_after_repeated_failures() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;
    let task = store.create_task("Resilient", None).await.unwrap();

    revoke_session(addr, &store).await;

    // Each attempt fails independently; none of them corrupts the list and
    // the completion invariant holds throughout.
    for _ in 0..3 {
        assert!(store.toggle_task(&task.id).await.is_err());
        let t = &store.tasks()[0];
        assert_eq!(t.completed, t.completed_at.is_some());
    }
    assert_eq!(store.tasks().len(), 1);

    // Validation still happens before any remote call.
    let err = store.create_task("   ", None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidText(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_recoverable_transport_error() {
    // Nothing listens on this port; the connect fails fast and the store
    // reports it without touching the (empty) list.
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let session = taskdeck_proto::auth::Session {
        token: "tok".to_string(),
        user: taskdeck_proto::auth::User {
            id: "user-1".to_string(),
            email: "alice@example.com".to_string(),
        },
    };
    let mut store = TaskStore::with_remote(session, client);

    let err = store.create_task("Unreachable", None).await.unwrap_err();
    assert!(matches!(err, StoreError::Remote(_)));
    assert!(store.tasks().is_empty());
}
