//! In-memory call store
//!
//! Backed by a `DashMap`, so concurrent writes from different tracking
//! sessions only contend when they touch the same shard.

use async_trait::async_trait;
use dashmap::DashMap;
use dialwatch_call_core::{Call, CallId, CallStatus};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::CallStore;

#[derive(Debug, Default)]
pub struct MemoryCallStore {
    calls: DashMap<CallId, Call>,
}

impl MemoryCallStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[async_trait]
impl CallStore for MemoryCallStore {
    async fn insert_or_replace(&self, call: &Call) -> StoreResult<()> {
        self.calls.insert(call.id.clone(), call.clone());
        debug!(call_id = %call.id, status = %call.status, "Stored call");
        Ok(())
    }

    async fn update_status(&self, call_id: &CallId, status: &CallStatus) -> StoreResult<()> {
        match self.calls.get_mut(call_id) {
            Some(mut call) => {
                call.status = status.clone();
                debug!(call_id = %call_id, status = %status, "Updated call status");
                Ok(())
            }
            None => Err(StoreError::not_found(call_id)),
        }
    }

    async fn get(&self, call_id: &CallId) -> StoreResult<Option<Call>> {
        Ok(self.calls.get(call_id).map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> StoreResult<Vec<Call>> {
        let mut calls: Vec<Call> = self.calls.iter().map(|entry| entry.value().clone()).collect();
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str, created_at: i64) -> Call {
        Call::initiated(CallId::new(id), "5551234", created_at)
    }

    #[tokio::test]
    async fn insert_replaces_existing_record() {
        let store = MemoryCallStore::new();
        store.insert_or_replace(&call("a", 1)).await.unwrap();

        let mut replacement = call("a", 1);
        replacement.destination = "5559999".to_string();
        store.insert_or_replace(&replacement).await.unwrap();

        assert_eq!(store.len(), 1);
        let stored = store.get(&CallId::new("a")).await.unwrap().unwrap();
        assert_eq!(stored.destination, "5559999");
    }

    #[tokio::test]
    async fn update_status_of_missing_call_is_not_found() {
        let store = MemoryCallStore::new();
        let err = store
            .update_status(&CallId::new("missing"), &CallStatus::Ringing)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_status_changes_only_status() {
        let store = MemoryCallStore::new();
        store.insert_or_replace(&call("a", 7)).await.unwrap();
        store
            .update_status(&CallId::new("a"), &CallStatus::Answered)
            .await
            .unwrap();

        let stored = store.get(&CallId::new("a")).await.unwrap().unwrap();
        assert_eq!(stored.status, CallStatus::Answered);
        assert_eq!(stored.created_at, 7);
        assert_eq!(stored.destination, "5551234");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryCallStore::new();
        store.insert_or_replace(&call("old", 100)).await.unwrap();
        store.insert_or_replace(&call("new", 300)).await.unwrap();
        store.insert_or_replace(&call("mid", 200)).await.unwrap();

        let ids: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
