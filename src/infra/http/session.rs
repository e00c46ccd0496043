//! In-memory storefront sessions.
//!
//! Tokens are opaque and only their SHA-256 digest is kept at rest. Sessions
//! expire after a fixed TTL (no rolling renewal, matching the cookie's
//! max-age) and a background task sweeps the leftovers.

use std::time::Duration;

use dashmap::DashMap;
use metrics::gauge;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::MenuTreeNode;

/// The user data carried by a session, mirroring the `/api/me` contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub username: String,
    #[serde(rename = "companyID")]
    pub company_id: Option<i64>,
    pub user_menu: Vec<MenuTreeNode>,
}

impl SessionUser {
    /// Menu-based permission check: access to a path is granted by the
    /// presence of a matching node anywhere in the user's menu tree.
    pub fn can(&self, path: &str) -> bool {
        self.user_menu.iter().any(|node| node.grants(path))
    }
}

struct SessionEntry {
    user: SessionUser,
    expires_at: Instant,
}

pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Create a session and return the opaque token handed to the cookie.
    pub fn issue(&self, user: SessionUser) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            Self::digest(&token),
            SessionEntry {
                user,
                expires_at: Instant::now() + self.ttl,
            },
        );
        gauge!("vitrina_session_active").set(self.sessions.len() as f64);
        token
    }

    /// Look up a live session; expired entries are dropped on contact.
    pub fn resolve(&self, token: &str) -> Option<SessionUser> {
        let key = Self::digest(token);
        {
            let entry = self.sessions.get(&key)?;
            if Instant::now() < entry.expires_at {
                return Some(entry.user.clone());
            }
        }
        self.sessions.remove(&key);
        gauge!("vitrina_session_active").set(self.sessions.len() as f64);
        None
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.remove(&Self::digest(token));
        gauge!("vitrina_session_active").set(self.sessions.len() as f64);
    }

    /// Drop sessions past their deadline. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| now < entry.expires_at);
        let removed = before - self.sessions.len();
        if removed > 0 {
            gauge!("vitrina_session_active").set(self.sessions.len() as f64);
            debug!(removed, "expired sessions swept");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn digest(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}
