use chrono::{DateTime, Utc};
use dashmap::DashMap;
use stash_auth::SessionState;
use std::sync::Arc;
use std::time::Duration;

/// Stored session with the time it was last used
#[derive(Debug, Clone)]
struct VisitorSession {
    state: SessionState,
    last_seen: DateTime<Utc>,
}

/// In-memory visitor sessions keyed by the session cookie.
pub struct SessionStore {
    sessions: Arc<DashMap<String, VisitorSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        let store = Self {
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        };

        // Spawn background cleanup task
        let sessions_clone = store.sessions.clone();
        let ttl_clone = store.ttl;
        tokio::spawn(async move {
            cleanup_idle_sessions(sessions_clone, ttl_clone).await;
        });

        tracing::info!(
            "Session store initialized with idle TTL of {} seconds",
            ttl_seconds
        );
        store
    }

    /// Session for `session_id`, or a fresh one for first-time visitors
    pub fn load(&self, session_id: &str) -> SessionState {
        self.sessions
            .get_mut(session_id)
            .map(|mut s| {
                s.last_seen = Utc::now();
                s.state.clone()
            })
            .unwrap_or_default()
    }

    /// Persist a session. Empty sessions are not kept.
    pub fn save(&self, session_id: &str, state: SessionState) {
        if state == SessionState::default() {
            self.remove(session_id);
            return;
        }

        self.sessions.insert(
            session_id.to_string(),
            VisitorSession {
                state,
                last_seen: Utc::now(),
            },
        );
    }

    pub fn remove(&self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "Session removed");
        }
    }

    /// Get session count (for monitoring)
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Background task that periodically drops sessions idle for longer than `ttl`
async fn cleanup_idle_sessions(sessions: Arc<DashMap<String, VisitorSession>>, ttl: Duration) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        let removed = purge_idle(&sessions, ttl, Utc::now());
        if removed > 0 {
            tracing::info!(
                "Cleaned up {} idle sessions, {} remaining",
                removed,
                sessions.len()
            );
        }
    }
}

fn purge_idle(
    sessions: &DashMap<String, VisitorSession>,
    ttl: Duration,
    now: DateTime<Utc>,
) -> usize {
    let initial_count = sessions.len();

    sessions.retain(|session_id, session| {
        let idle = now
            .signed_duration_since(session.last_seen)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if idle >= ttl {
            tracing::debug!(session_id = %session_id, "Cleaning up idle session");
            false
        } else {
            true
        }
    });

    initial_count.saturating_sub(sessions.len())
}
