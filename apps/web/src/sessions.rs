//! Per-visitor form state, keyed by the `recruitify_session` cookie.
//!
//! A lost session (restart, expiry) behaves like a page reload: the visitor
//! gets a fresh Idle form.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::form::state::MatchForm;

pub const SESSION_COOKIE: &str = "recruitify_session";

struct SessionEntry {
    form: Arc<Mutex<MatchForm>>,
    last_seen: DateTime<Utc>,
}

/// The form handle for one request.
pub struct Session {
    pub id: Uuid,
    pub form: Arc<Mutex<MatchForm>>,
    /// True when the visitor had no live session and needs a cookie.
    pub created: bool,
}

pub struct SessionStore {
    entries: RwLock<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    /// `max_sessions` is clamped to at least one.
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// The visitor's form if their session is live. Never creates one, so
    /// plain page views cost nothing.
    pub async fn get(&self, id: Option<Uuid>) -> Option<Arc<Mutex<MatchForm>>> {
        let id = id?;
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id)?;
        if now - entry.last_seen > self.ttl {
            return None;
        }
        entry.last_seen = now;
        Some(entry.form.clone())
    }

    /// Looks up the visitor's form, creating one when the id is missing,
    /// unknown or expired. Creating a session prunes expired ones and, at
    /// capacity, evicts the least recently seen.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> Session {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        if let Some(id) = id {
            if let Some(entry) = entries.get_mut(&id) {
                if now - entry.last_seen <= self.ttl {
                    entry.last_seen = now;
                    return Session {
                        id,
                        form: entry.form.clone(),
                        created: false,
                    };
                }
            }
        }

        let before = entries.len();
        entries.retain(|_, entry| now - entry.last_seen <= self.ttl);
        if entries.len() < before {
            debug!("Pruned {} expired sessions", before - entries.len());
        }

        while entries.len() >= self.max_sessions {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    entries.remove(&oldest);
                    warn!("Session limit {} reached, evicted {oldest}", self.max_sessions);
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        let form = Arc::new(Mutex::new(MatchForm::new()));
        debug!("Created session {id} ({} live)", entries.len() + 1);
        entries.insert(
            id,
            SessionEntry {
                form: form.clone(),
                last_seen: now,
            },
        );

        Session {
            id,
            form,
            created: true,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Extracts the session id from the `Cookie` header, if present and valid.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
