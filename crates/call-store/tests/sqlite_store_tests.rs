//! Tests for the SQLite call store

use dialwatch_call_core::{Call, CallId, CallStatus};
use dialwatch_call_store::{CallStore, SqliteCallStore, StoreError};
use tempfile::TempDir;

/// Helper to create a test database
async fn create_test_db() -> (SqliteCallStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("calls.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let store = SqliteCallStore::new(&db_url)
        .await
        .expect("Failed to create test database");

    (store, temp_dir)
}

fn call(id: &str, created_at: i64) -> Call {
    Call::initiated(CallId::new(id), "5551234", created_at)
}

#[tokio::test]
async fn test_insert_and_get() {
    let (store, _temp_dir) = create_test_db().await;

    store.insert_or_replace(&call("c1", 1_000)).await.unwrap();

    let stored = store.get(&CallId::new("c1")).await.unwrap().unwrap();
    assert_eq!(stored, call("c1", 1_000));
    assert!(store.get(&CallId::new("nope")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_or_replace_keeps_one_record_per_id() {
    let (store, _temp_dir) = create_test_db().await;

    store.insert_or_replace(&call("c1", 1_000)).await.unwrap();
    let mut replacement = call("c1", 1_000);
    replacement.status = CallStatus::Ringing;
    store.insert_or_replace(&replacement).await.unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, CallStatus::Ringing);
}

#[tokio::test]
async fn test_update_status() {
    let (store, _temp_dir) = create_test_db().await;
    store.insert_or_replace(&call("c1", 1_000)).await.unwrap();

    store
        .update_status(&CallId::new("c1"), &CallStatus::Answered)
        .await
        .unwrap();

    let stored = store.get(&CallId::new("c1")).await.unwrap().unwrap();
    assert_eq!(stored.status, CallStatus::Answered);
}

#[tokio::test]
async fn test_update_status_unknown_call() {
    let (store, _temp_dir) = create_test_db().await;

    let result = store
        .update_status(&CallId::new("ghost"), &CallStatus::Ended)
        .await;

    match result.unwrap_err() {
        StoreError::NotFound { call_id } => assert_eq!(call_id, CallId::new("ghost")),
        other => panic!("Expected NotFound error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_all_newest_first() {
    let (store, _temp_dir) = create_test_db().await;
    store.insert_or_replace(&call("first", 1_000)).await.unwrap();
    store.insert_or_replace(&call("third", 3_000)).await.unwrap();
    store.insert_or_replace(&call("second", 2_000)).await.unwrap();

    let ids: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(ids, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_pass_through_status_survives_storage() {
    let (store, _temp_dir) = create_test_db().await;
    store.insert_or_replace(&call("c1", 1_000)).await.unwrap();
    store
        .update_status(&CallId::new("c1"), &CallStatus::Other("queued".into()))
        .await
        .unwrap();
    store
        .insert_or_replace(&Call {
            status: CallStatus::Unknown,
            ..call("c2", 2_000)
        })
        .await
        .unwrap();

    let c1 = store.get(&CallId::new("c1")).await.unwrap().unwrap();
    assert_eq!(c1.status, CallStatus::Other("queued".into()));
    let c2 = store.get(&CallId::new("c2")).await.unwrap().unwrap();
    assert_eq!(c2.status, CallStatus::Unknown);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_url = format!("sqlite://{}?mode=rwc", temp_dir.path().join("calls.db").display());

    {
        let store = SqliteCallStore::new(&db_url).await.unwrap();
        store.insert_or_replace(&call("c1", 1_000)).await.unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteCallStore::new(&db_url).await.unwrap();
    assert_eq!(reopened.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_updates_for_different_calls() {
    let (store, _temp_dir) = create_test_db().await;
    let store = std::sync::Arc::new(store);
    for i in 0..8 {
        store.insert_or_replace(&call(&format!("c{i}"), i)).await.unwrap();
    }

    let mut tasks = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            store
                .update_status(&CallId::new(format!("c{i}")), &CallStatus::Ringing)
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let all = store.list_all().await.unwrap();
    assert!(all.iter().all(|c| c.status == CallStatus::Ringing));
}
