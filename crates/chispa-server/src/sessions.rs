//! Server-side session store.
//!
//! Browsers hold only an opaque random id in a cookie; the backend access
//! token never leaves the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chispa_core::{LoadGeneration, Session};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "chispa_session";

const PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct StoredSession {
    session: Session,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, StoredSession>>>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores a new session for a signed-in user and returns it.
    pub async fn create(&self, user_id: &str, email: &str, access_token: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            user_id: user_id.to_string(),
            email: email.to_string(),
            access_token: access_token.to_string(),
            loads: LoadGeneration::new(),
        };
        let stored = StoredSession {
            session: session.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        self.inner.write().await.insert(session.id.clone(), stored);
        session
    }

    /// The live session with `id`. Expired sessions are dropped on sight.
    pub async fn get(&self, id: &str) -> Option<Session> {
        {
            let sessions = self.inner.read().await;
            match sessions.get(id) {
                Some(stored) if stored.expires_at > Instant::now() => {
                    return Some(stored.session.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }
        self.inner.write().await.remove(id);
        tracing::debug!("dropped expired session");
        None
    }

    pub async fn remove(&self, id: &str) -> Option<Session> {
        self.inner.write().await.remove(id).map(|s| s.session)
    }

    /// Removes every expired session and returns how many went.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| stored.expires_at > now);
        before - sessions.len()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Periodically purges expired sessions for the life of the process.
pub fn spawn_purge_task(store: SessionStore) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                let live = store.count().await;
                tracing::info!(purged, live, "purged expired sessions");
            }
        }
    })
}

/// `Set-Cookie` value that stores `session_id` for the session lifetime.
#[must_use]
pub fn session_cookie(session_id: &str, ttl: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes the session cookie.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
