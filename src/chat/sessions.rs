//! In-memory conversation store
//!
//! Sessions live in a bounded `moka` cache: the least recently used session
//! is dropped once the cap is reached, and idle sessions expire. Each session
//! has its own lock, held for the whole reply so overlapping requests in one
//! session append their turns one after the other.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tokio::sync::Mutex;

use super::history::ConversationHistory;
use crate::config::ChatConfig;
use crate::models::ChatMessage;

pub type SharedHistory = Arc<Mutex<ConversationHistory>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<String, SharedHistory>,
}

impl SessionStore {
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(
            config.max_sessions as u64,
            Duration::from_secs(config.idle_minutes * 60),
        )
    }

    /// The session's history, created empty on first use
    pub async fn history(&self, session: &str) -> SharedHistory {
        self.sessions
            .get_with(session.to_string(), async {
                Arc::new(Mutex::new(ConversationHistory::new()))
            })
            .await
    }

    /// Retained messages, empty for unknown sessions
    pub async fn messages(&self, session: &str) -> Vec<ChatMessage> {
        match self.sessions.get(session).await {
            Some(history) => history.lock().await.messages(),
            None => Vec::new(),
        }
    }

    /// Number of live sessions after pending evictions are applied
    pub async fn len(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(cap: u64) -> SessionStore {
        SessionStore::new(cap, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_history_is_shared_per_session() {
        let store = store(10);
        store
            .history("trip")
            .await
            .lock()
            .await
            .push(ChatMessage::user("Where to in May?"));

        assert_eq!(store.messages("trip").await.len(), 1);
        assert!(store.messages("other").await.is_empty());
    }

    #[tokio::test]
    async fn test_session_count_is_capped() {
        let store = store(3);
        for i in 0..20 {
            store.history(&format!("session-{i}")).await;
        }
        assert!(store.len().await <= 3);
    }

    #[tokio::test]
    async fn test_overlapping_turns_are_kept() {
        let store = store(10);
        let first = store.history("trip").await;
        let second = store.history("trip").await;

        let mut guard = first.lock().await;
        guard.push(ChatMessage::user("a"));
        assert!(second.try_lock().is_err());
        drop(guard);

        second.lock().await.push(ChatMessage::user("b"));
        let contents: Vec<_> = store
            .messages("trip")
            .await
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["a", "b"]);
    }
}
