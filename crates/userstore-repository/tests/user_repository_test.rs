//! Integration tests for MySqlUserRepository.
//!
//! These tests run against a real MySQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use common::TestDatabase;
use std::collections::HashSet;
use std::sync::Arc;
use userstore_config::TracingConfig;
use userstore_core::{StoreError, User};
use userstore_repository::{MySqlUserRepository, UserRepository};

#[tokio::test]
async fn test_create_assigns_new_positive_id() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let first = repo.create("alice").await.expect("Failed to create user");
    let second = repo.create("bob").await.expect("Failed to create user");

    assert!(first.id > 0);
    assert!(second.id > 0);
    assert_ne!(first.id, second.id);
    assert_eq!(first.name, "alice");
    assert_eq!(second.name, "bob");
}

#[tokio::test]
async fn test_create_allows_repeated_names_without_unique_index() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let first = repo.create("alice").await.expect("Failed to create user");
    let second = repo.create("alice").await.expect("Failed to create user");

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_create_duplicate_name_with_unique_index() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;
    db.enforce_unique_names().await;

    repo.create("alice").await.expect("Failed to create user");
    let err = repo.create("alice").await.expect_err("Duplicate insert succeeded");

    assert!(matches!(err, StoreError::Duplicate), "unexpected error: {err:?}");
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_create_empty_name_is_not_rejected() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let user = repo.create("").await.expect("Failed to create user");
    assert_eq!(user.name, "");

    let found = repo.get(user.id).await.expect("Failed to get user");
    assert_eq!(found, user);
}

#[tokio::test]
async fn test_create_name_too_long_is_opaque_error() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let err = repo
        .create(&"x".repeat(101))
        .await
        .expect_err("Over-long name accepted");

    assert!(matches!(err, StoreError::Database(_)), "unexpected error: {err:?}");
    assert!(!err.is_taxonomy());
}

#[tokio::test]
async fn test_list_empty() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let users = repo.list().await.expect("Failed to list users");
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_list_returns_created_users() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let mut created = HashSet::new();
    for name in ["alice", "bob", "carol"] {
        created.insert(repo.create(name).await.expect("Failed to create user"));
    }

    let listed: HashSet<User> = repo
        .list()
        .await
        .expect("Failed to list users")
        .into_iter()
        .collect();

    assert_eq!(listed.len(), 3);
    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_get_after_create() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let created = repo.create("dave").await.expect("Failed to create user");
    let found = repo.get(created.id).await.expect("Failed to get user");

    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "dave");
}

#[tokio::test]
async fn test_get_unknown_id_is_not_exists() {
    let db = TestDatabase::new().await;
    let repo = db.repository().await;

    let err = repo.get(987_654).await.expect_err("Unknown id found");

    assert!(matches!(err, StoreError::NotExists), "unexpected error: {err:?}");
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_repository_construction_is_repeatable() {
    let db = TestDatabase::new().await;

    let first = db.repository().await;
    let created = first.create("erin").await.expect("Failed to create user");

    // Simulates a second process start against the existing schema.
    let manager = db.new_manager(TracingConfig::default());
    let second = MySqlUserRepository::new(&manager)
        .await
        .expect("Second construction failed");

    let found = second.get(created.id).await.expect("Existing row lost");
    assert_eq!(found, created);

    let third = MySqlUserRepository::new(&manager)
        .await
        .expect("Third construction failed");
    assert!(Arc::ptr_eq(second.handle(), third.handle()));
}

#[tokio::test]
async fn test_repositories_share_manager_handle() {
    let db = TestDatabase::new().await;
    let manager = db.manager();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { MySqlUserRepository::new(&manager).await })
        })
        .collect();

    let repos: Vec<MySqlUserRepository> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("Task panicked").expect("Construction failed"))
        .collect();

    let first = repos[0].handle();
    assert!(repos.iter().all(|r| Arc::ptr_eq(first, r.handle())));
}

#[tokio::test]
async fn test_instrumented_handle_runs_statements() {
    let db = TestDatabase::new().await;
    let manager = db.new_manager(TracingConfig {
        service_name: Some("user-service".to_string()),
        otlp_endpoint: Some("http://127.0.0.1:4317".to_string()),
    });

    let repo = MySqlUserRepository::new(&manager)
        .await
        .expect("Failed to create repository");
    assert!(repo.handle().is_instrumented());

    let created = repo.create("frank").await.expect("Failed to create user");
    let found = repo.get(created.id).await.expect("Failed to get user");
    assert_eq!(found, created);
    assert_eq!(repo.list().await.expect("Failed to list users"), vec![created]);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let db = TestDatabase::new().await;
    let repo: Arc<dyn UserRepository> = Arc::new(db.repository().await);

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.create(&format!("user{i}")).await })
        })
        .collect();

    let ids: HashSet<i64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("Task panicked").expect("Create failed").id)
        .collect();

    assert_eq!(ids.len(), 20);
    assert_eq!(repo.list().await.expect("Failed to list users").len(), 20);
}
