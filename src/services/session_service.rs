use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::services::collaborators::Collaborators;
use crate::services::interview_service::InterviewSession;
use crate::utils::token::{sign_session_id, verify_session_token};

pub struct SessionEntry {
    pub interview: InterviewSession,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

/// Live interview sessions, addressed by signed tokens.
///
/// Each session sits behind its own mutex, so requests for one session run
/// one at a time while different sessions never contend.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<SessionEntry>>>>>,
    collaborators: Collaborators,
    secret: Arc<str>,
    ttl: chrono::Duration,
}

impl SessionService {
    pub fn new(collaborators: Collaborators, secret: &str, ttl: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            collaborators,
            secret: Arc::from(secret),
            ttl,
        }
    }

    /// Creates an empty session and returns its token with the locked entry.
    pub async fn create(&self) -> (String, OwnedMutexGuard<SessionEntry>) {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let entry = Arc::new(Mutex::new(SessionEntry {
            interview: InterviewSession::new(self.collaborators.clone()),
            created_at: now,
            last_active_at: now,
        }));
        let guard = entry.clone().lock_owned().await;
        self.sessions.write().await.insert(id, entry);
        tracing::debug!(session_id = %id, "Session created");
        (sign_session_id(&self.secret, id), guard)
    }

    /// Locks the session named by `token`, refreshing its idle timer.
    pub async fn acquire(&self, token: &str) -> Result<OwnedMutexGuard<SessionEntry>> {
        let id = verify_session_token(&self.secret, token)
            .ok_or_else(|| Error::Unauthorized("Invalid session token".to_string()))?;
        let entry = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Session not found or expired".to_string()))?;

        let mut guard = entry.lock_owned().await;
        let now = Utc::now();
        if now - guard.last_active_at > self.ttl {
            drop(guard);
            self.sessions.write().await.remove(&id);
            return Err(Error::NotFound("Session not found or expired".to_string()));
        }
        guard.last_active_at = now;
        Ok(guard)
    }

    /// Drops sessions idle for longer than the TTL. Sessions with a request
    /// in flight are skipped.
    pub async fn evict_expired(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(guard) => guard.last_active_at >= cutoff,
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Expired sessions evicted");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
