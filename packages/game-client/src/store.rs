use std::sync::Mutex;

/// What survives a dropped connection: which room we were in and the
/// reconnect token proving our seat. The token changes on every successful
/// (re)join, so the store must always hold the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub room_id: String,
    pub reconnect_token: String,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<StoredSession>;
    fn save(&self, session: &StoredSession);
    fn clear(&self);
}

/// Process-local store. A real frontend would put this behind
/// localStorage-style persistence; the trait is the seam for that.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<StoredSession> {
        self.inner.lock().unwrap().clone()
    }

    fn save(&self, session: &StoredSession) {
        *self.inner.lock().unwrap() = Some(session.clone());
    }

    fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }
}
