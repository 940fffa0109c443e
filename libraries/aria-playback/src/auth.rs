//! Access token holder
//!
//! Token acquisition (login, OTP, refresh) happens outside the player; the
//! host hands the resulting bearer token in and every component reads it
//! from here.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// The current session's bearer token, if any
#[derive(Debug, Clone)]
pub struct AuthSession {
    token: Arc<watch::Sender<Option<String>>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AuthSession {
    /// Create a session, optionally already signed in
    pub fn new(token: Option<String>) -> Self {
        let (sender, _) = watch::channel(token);
        Self {
            token: Arc::new(sender),
        }
    }

    /// Current token
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Replace the token
    ///
    /// Empty strings count as signed out. Returns `true` if the token changed.
    pub fn set_token(&self, token: Option<String>) -> bool {
        let token = token.filter(|t| !t.trim().is_empty());
        let changed = self.token.send_if_modified(|current| {
            if *current == token {
                false
            } else {
                *current = token;
                true
            }
        });

        if changed {
            info!(authenticated = self.is_authenticated(), "Access token changed");
        }
        changed
    }

    /// Sign out
    pub fn clear(&self) -> bool {
        self.set_token(None)
    }

    /// Watch token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}
