//! In-memory store for wizard sessions.
//!
//! Sessions live only as long as the process (or until deleted). Each one is
//! wrapped in its own async mutex; holding it for the whole of an operation,
//! network call included, keeps operations on one session strictly
//! sequential while different sessions proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::error::ServerError;
use crate::models::{Session, SessionSummary};

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new session, returning a snapshot of it.
    pub async fn create(&self) -> Session {
        let session = Session::new();
        let snapshot = session.clone();
        self.sessions
            .write()
            .await
            .insert(session.session_id().to_string(), Arc::new(Mutex::new(session)));
        tracing::info!("[SessionStore] Created session {}", snapshot.session_id());
        snapshot
    }

    /// Get a session handle by ID. Lock it before reading or mutating.
    pub async fn get(&self, session_id: &str) -> Result<SharedSession, ServerError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| ServerError::NotFound(format!("Session {} not found", session_id)))
    }

    /// List sessions, most recently updated first.
    ///
    /// Waits for any in-flight operation on a session to finish before
    /// reading it.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let handles: Vec<SharedSession> = self.sessions.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            summaries.push(handle.lock().await.summary());
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    /// Destroy a session and everything it holds.
    pub async fn delete(&self, session_id: &str) -> Result<(), ServerError> {
        if self.sessions.write().await.remove(session_id).is_none() {
            return Err(ServerError::NotFound(format!("Session {} not found", session_id)));
        }
        tracing::info!("[SessionStore] Deleted session {}", session_id);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = SessionStore::new();
        let created = store.create().await;

        let handle = store.get(created.session_id()).await.unwrap();
        assert_eq!(handle.lock().await.phase(), Phase::Playbook);
        assert_eq!(store.len().await, 1);

        store.delete(created.session_id()).await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(
            store.get(created.session_id()).await,
            Err(ServerError::NotFound(_))
        ));
        assert!(store.delete(created.session_id()).await.is_err());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a.session_id(), b.session_id());

        store.get(a.session_id()).await.unwrap().lock().await.phase = Phase::Bpmn;

        let b_phase = store.get(b.session_id()).await.unwrap().lock().await.phase();
        assert_eq!(b_phase, Phase::Playbook);
    }

    #[tokio::test]
    async fn test_list_orders_by_last_update() {
        let store = SessionStore::new();
        let older = store.create().await;
        let newer = store.create().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.get(older.session_id()).await.unwrap().lock().await.touch();

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].session_id, older.session_id());
        assert_eq!(listed[1].session_id, newer.session_id());
    }
}
