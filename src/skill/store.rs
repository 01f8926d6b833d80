//! Session store — where per-user session records live between turns.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::state::SessionRecord;

/// Backend-agnostic session storage, injected into the dialog engine.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a user's record.
    async fn get(&self, user_id: &str) -> Option<SessionRecord>;

    /// Create or overwrite a user's record.
    async fn put(&self, user_id: &str, record: SessionRecord);

    /// Number of users with a record.
    async fn len(&self) -> usize;
}

/// Process-local store. Records are never evicted, so it grows with the
/// number of distinct users and empties on restart.
///
/// Turns for different users proceed in parallel; two racing turns for the
/// same user are last-write-wins.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(user_id).cloned()
    }

    async fn put(&self, user_id: &str, record: SessionRecord) {
        let replaced = self
            .sessions
            .write()
            .await
            .insert(user_id.to_string(), record)
            .is_some();
        debug!(user_id, replaced, "Session record stored");
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::skill::state::DialogStage;

    #[tokio::test]
    async fn unknown_user_is_absent() {
        let store = InMemorySessionStore::new();
        assert!(store.get("ghost").await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = InMemorySessionStore::new();
        store.put("u1", SessionRecord::new("u1")).await;

        let record = store.get("u1").await.unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemorySessionStore::new();
        let mut ended = SessionRecord::new("u1");
        ended.stage = DialogStage::Ended;
        store.put("u1", ended).await;
        store.put("u1", SessionRecord::new("u1")).await;

        let record = store.get("u1").await.unwrap();
        assert_eq!(record.stage, DialogStage::AwaitingConfirmation);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_users_do_not_clobber_each_other() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let id = format!("user-{i}");
                store.put(&id, SessionRecord::new(id.clone())).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.len().await, 32);
        assert_eq!(store.get("user-17").await.unwrap().user_id, "user-17");
    }
}
