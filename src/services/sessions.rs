use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::models::Session;

/// A live call and the random source its replies are drawn from.
pub struct SessionEntry {
    pub session: Session,
    pub rng: StdRng,
}

/// Locked for the whole turn, so two requests for one call never interleave.
pub type SessionHandle = Arc<tokio::sync::Mutex<SessionEntry>>;

/// In-memory calls by id. Entries live until removed or the process exits.
pub struct SessionStore {
    inner: Mutex<HashMap<String, SessionHandle>>,
    seed: Option<u64>,
}

impl SessionStore {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            seed,
        }
    }

    /// Starts a fresh session under `id`, replacing any previous one.
    pub fn create(&self, id: &str) -> SessionHandle {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let handle = Arc::new(tokio::sync::Mutex::new(SessionEntry {
            session: Session::new(id),
            rng,
        }));
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if sessions.insert(id.to_string(), Arc::clone(&handle)).is_some() {
            tracing::warn!(session_id = id, "replaced existing session");
        }
        handle
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationState;
    use rand::Rng;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new(None);
        assert!(store.is_empty());

        store.create("call-1");
        store.create("call-2");
        assert_eq!(store.len(), 2);

        let handle = store.get("call-1").unwrap();
        {
            let mut entry = handle.lock().await;
            assert_eq!(entry.session.state, ConversationState::Greeting);
            entry.session.state = ConversationState::CollectName;
        }
        let again = store.get("call-1").unwrap();
        assert_eq!(again.lock().await.session.state, ConversationState::CollectName);

        assert!(store.remove("call-1").is_some());
        assert!(store.get("call-1").is_none());
        assert!(store.remove("call-1").is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_seeded_sessions_draw_the_same_numbers() {
        let store = SessionStore::new(Some(99));
        let a = store.create("a");
        let b = store.create("b");
        let x: u64 = a.lock().await.rng.gen();
        let y: u64 = b.lock().await.rng.gen();
        assert_eq!(x, y);
    }

    #[tokio::test]
    async fn test_create_replaces_existing() {
        let store = SessionStore::new(None);
        let first = store.create("dup");
        first.lock().await.session.state = ConversationState::EndCall;
        store.create("dup");
        assert_eq!(store.len(), 1);
        let current = store.get("dup").unwrap();
        assert_eq!(current.lock().await.session.state, ConversationState::Greeting);
    }
}
