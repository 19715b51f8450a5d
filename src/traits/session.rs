//! Session handles issued by the authentication collaborator.

use std::sync::Mutex;

/// An authenticated session against one forum.
///
/// Handles are immutable values; only the authentication collaborator ever
/// replaces them (login, logout, refresh), never while a fetch using the
/// handle is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub forum_id: String,
    pub base_url: String,
    pub uid: u64,
    pub username: String,
    /// Auth token some deployments hand back at login, sent along with
    /// every request when present.
    pub auth: Option<String>,
}

/// Source of authenticated sessions.
///
/// Returning `None` means the user is not signed in to that forum; the
/// navigator then refuses to fetch and reports that re-authentication is
/// required.
pub trait SessionProvider: Send + Sync {
    fn session(&self, forum_id: &str) -> Option<SessionHandle>;
}

/// A provider holding one replaceable session, enough for tests and
/// single-account embeddings.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    handle: Mutex<Option<SessionHandle>>,
}

impl StaticSessionProvider {
    pub fn new(handle: SessionHandle) -> Self {
        Self {
            handle: Mutex::new(Some(handle)),
        }
    }

    /// A provider with no session at all.
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn set(&self, handle: Option<SessionHandle>) {
        *self.handle.lock().unwrap() = handle;
    }
}

impl SessionProvider for StaticSessionProvider {
    fn session(&self, forum_id: &str) -> Option<SessionHandle> {
        self.handle
            .lock()
            .unwrap()
            .clone()
            .filter(|h| h.forum_id == forum_id)
    }
}
