use crate::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::storage::session::Session;
use std::fmt;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Key the token is persisted under.
    pub fn key(&self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_TOKEN_KEY,
            TokenKind::Refresh => REFRESH_TOKEN_KEY,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Holder of the current access and refresh tokens.
///
/// Reads and writes are synchronous single values, last write wins. The store
/// is shared by every client built on top of it and is passed in explicitly.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;

    fn set(&self, kind: TokenKind, value: &str);

    fn clear(&self, kind: TokenKind);

    fn session(&self) -> Session {
        Session {
            access_token: self.get(TokenKind::Access),
            refresh_token: self.get(TokenKind::Refresh),
        }
    }

    fn clear_all(&self) {
        self.clear(TokenKind::Access);
        self.clear(TokenKind::Refresh);
    }
}

/// In-process store. Nothing survives the process; use
/// [`crate::storage::FileTokenStore`] when the session has to outlive it.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Session>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

pub(crate) fn slot(session: &mut Session, kind: TokenKind) -> &mut Option<String> {
    match kind {
        TokenKind::Access => &mut session.access_token,
        TokenKind::Refresh => &mut session.refresh_token,
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        match kind {
            TokenKind::Access => session.access_token.clone(),
            TokenKind::Refresh => session.refresh_token.clone(),
        }
    }

    fn set(&self, kind: TokenKind, value: &str) {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot(&mut session, kind) = Some(value.to_string());
    }

    fn clear(&self, kind: TokenKind) {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot(&mut session, kind) = None;
    }
}
