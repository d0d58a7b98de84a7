//! In-memory registry of page sessions.
//!
//! Every page load gets a fresh session, so nothing survives a reload.
//! Sessions idle for longer than the TTL are dropped whenever a new one is
//! created. Each session may hold an uploaded file, so the number of live
//! sessions is capped as well; at the cap the least recently seen one is
//! evicted.

use crate::session::Session;
use chrono::{Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Length of the random session id embedded in the page.
pub const SESSION_ID_LEN: usize = 32;

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Duration::minutes(ttl_minutes),
            max_sessions: max_sessions.max(1),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a session for a freshly loaded page.
    pub fn create(&self) -> Arc<Session> {
        let purged = self.purge_expired();
        if purged > 0 {
            log::debug!("purged {} idle sessions", purged);
        }

        let session = Arc::new(Session::new(new_session_id()));
        let mut sessions = self.sessions();
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.last_seen())
                .map(|s| s.id().to_string())
            else {
                break;
            };
            log::info!("session limit reached, evicting {}", oldest);
            sessions.remove(&oldest);
        }
        sessions.insert(session.id().to_string(), session.clone());
        drop(sessions);
        log::debug!("created session {}", session.id());
        session
    }

    /// Look up a live session and mark it as seen.
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        let mut sessions = self.sessions();
        let session = sessions.get(id)?.clone();

        if self.is_expired(&session) {
            sessions.remove(id);
            return None;
        }

        session.touch();
        Some(session)
    }

    /// Drop every idle session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now() - session.last_seen() > self.ttl
    }
}

fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}
