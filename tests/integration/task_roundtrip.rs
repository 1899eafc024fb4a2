//! Integration tests for task round trips: the client store driving a live
//! in-process backend, plus reconciliation between two sessions of the same
//! account.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::Utc;
use taskdeck::remote::{ApiClient, ApiError};
use taskdeck::store::TaskStore;
use taskdeck_proto::task::{NewTask, Priority, TaskId};
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
    // Ignore "already exists" so two sessions can share one account.
    let _ = client.sign_up(email, "hunter22").await;
    let session = client.sign_in(email, "hunter22").await.unwrap();
    TaskStore::with_remote(session, client)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_task_is_persisted_and_trimmed() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;

    let task = store.create_task("  Buy milk  ", None).await.unwrap();
    assert_eq!(task.text, "Buy milk");

    // A second session of the same account sees the task after refresh.
    let mut other = signed_in_store(addr, "alice@example.com").await;
    other.refresh().await.unwrap();
    assert_eq!(other.tasks().len(), 1);
    assert_eq!(other.tasks()[0].text, "Buy milk");
    assert_eq!(other.tasks()[0].id, task.id);
}

#[tokio::test]
async fn create_adopts_backend_owner() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;
    let owner_id = store.session().user.id.clone();

    let task = store.create_task("Owned", None).await.unwrap();
    assert_eq!(task.owner_id, owner_id);
}

#[tokio::test]
async fn toggle_round_trips_and_adopts_server_stamp() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;

    let task = store.create_task("Finish report", None).await.unwrap();
    store.toggle_task(&task.id).await.unwrap();

    let local = store.tasks()[0].clone();
    assert!(local.completed);
    assert!(local.completed_at.is_some());

    // The backend's record matches what the store adopted.
    let mut other = signed_in_store(addr, "alice@example.com").await;
    other.refresh().await.unwrap();
    let remote = other.tasks()[0].clone();
    assert_eq!(remote.completed_at, local.completed_at);
    assert!(remote.completed);
}

#[tokio::test]
async fn toggle_twice_round_trips_to_open() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;

    let task = store.create_task("Round trip", None).await.unwrap();
    store.toggle_task(&task.id).await.unwrap();
    store.toggle_task(&task.id).await.unwrap();

    let mut other = signed_in_store(addr, "alice@example.com").await;
    other.refresh().await.unwrap();
    assert!(!other.tasks()[0].completed);
    assert!(other.tasks()[0].completed_at.is_none());
}

#[tokio::test]
async fn removed_task_is_gone_remotely() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;

    let keep = store.create_task("Keep", None).await.unwrap();
    let doomed = store.create_task("Doomed", None).await.unwrap();
    store.remove_task(&doomed.id).await.unwrap();

    let mut other = signed_in_store(addr, "alice@example.com").await;
    other.refresh().await.unwrap();
    assert_eq!(other.tasks().len(), 1);
    assert_eq!(other.tasks()[0].id, keep.id);
}

#[tokio::test]
async fn backend_lists_newest_first_and_refresh_restores_insertion_order() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;

    store.create_task("first", None).await.unwrap();
    store.create_task("second", None).await.unwrap();
    store.create_task("third", None).await.unwrap();

    // Raw listing is newest-first.
    let mut client = make_client(addr);
    client.sign_up("alice@example.com", "hunter22").await.ok();
    client.sign_in("alice@example.com", "hunter22").await.unwrap();
    let listed = client.list().await.unwrap();
    let texts: Vec<&str> = listed.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);

    // The store's refresh restores insertion (oldest-first) order.
    let mut other = signed_in_store(addr, "alice@example.com").await;
    other.refresh().await.unwrap();
    let texts: Vec<&str> = other.tasks().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn priority_survives_the_round_trip() {
    let addr = start_backend().await;
    let mut store = signed_in_store(addr, "alice@example.com").await;

    store
        .create_task("Urgent", Some(Priority::High))
        .await
        .unwrap();

    let mut other = signed_in_store(addr, "alice@example.com").await;
    other.refresh().await.unwrap();
    assert_eq!(other.tasks()[0].priority, Priority::High);
}

#[tokio::test]
async fn duplicate_insert_is_rejected() {
    let addr = start_backend().await;
    let mut client = make_client(addr);
    client.sign_up("alice@example.com", "hunter22").await.unwrap();
    client.sign_in("alice@example.com", "hunter22").await.unwrap();

    let new = NewTask {
        id: TaskId::new(),
        text: "Once only".to_string(),
        priority: Priority::Medium,
        completed: false,
        created_at: Utc::now(),
    };
    client.insert(&new).await.unwrap();
    let err = client.insert(&new).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 409, .. }));
}

#[tokio::test]
async fn update_of_unknown_task_is_not_found() {
    let addr = start_backend().await;
    let mut client = make_client(addr);
    client.sign_up("alice@example.com", "hunter22").await.unwrap();
    client.sign_in("alice@example.com", "hunter22").await.unwrap();

    let err = client
        .update(&TaskId::new(), &taskdeck_proto::task::TaskPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
}

#[tokio::test]
async fn owners_see_only_their_own_tasks() {
    let addr = start_backend().await;
    let mut alice = signed_in_store(addr, "alice@example.com").await;
    let mut bob = signed_in_store(addr, "bob@example.com").await;

    alice.create_task("Alice's task", None).await.unwrap();
    bob.create_task("Bob's task", None).await.unwrap();

    alice.refresh().await.unwrap();
    bob.refresh().await.unwrap();

    assert_eq!(alice.tasks().len(), 1);
    assert_eq!(alice.tasks()[0].text, "Alice's task");
    assert_eq!(bob.tasks().len(), 1);
    assert_eq!(bob.tasks()[0].text, "Bob's task");
}

#[tokio::test]
async fn over_long_text_is_rejected_by_the_backend_too() {
    let addr = start_backend().await;
    let mut client = make_client(addr);
    client.sign_up("alice@example.com", "hunter22").await.unwrap();
    client.sign_in("alice@example.com", "hunter22").await.unwrap();

    let new = NewTask {
        id: TaskId::new(),
        text: "x".repeat(300),
        priority: Priority::Medium,
        completed: false,
        created_at: Utc::now(),
    };
    let err = client.insert(&new).await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 400, .. }));
}
