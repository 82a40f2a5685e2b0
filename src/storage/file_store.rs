use crate::error::StorageError;
use crate::storage::session::Session;
use crate::storage::token_store::{slot, TokenKind, TokenStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, error};

/// Token store persisted as a small JSON document so the session survives a
/// restart of the client.
///
/// Every `set`/`clear` rewrites the whole document. A failed write is logged
/// and the in-memory value is kept, so reads never observe an error.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    session: RwLock<Session>,
}

impl FileTokenStore {
    /// Opens the store at `path`, loading any previously persisted tokens.
    /// A missing file is an empty session.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let session = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Session::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No persisted session at {}", path.display());
                Session::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            session: RwLock::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, session: &Session) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, kind: TokenKind, value: Option<String>) {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        *slot(&mut session, kind) = value;
        if let Err(e) = self.persist(&session) {
            error!(
                "Failed to persist {} to {}: {}",
                kind,
                self.path.display(),
                e
            );
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        match kind {
            TokenKind::Access => session.access_token.clone(),
            TokenKind::Refresh => session.refresh_token.clone(),
        }
    }

    fn set(&self, kind: TokenKind, value: &str) {
        self.update(kind, Some(value.to_string()));
    }

    fn clear(&self, kind: TokenKind) {
        self.update(kind, None);
    }
}

#[cfg(test)]
mod tests_file_token_store {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::open(dir.path().join("session.json")).unwrap();
        assert!(store.session().is_empty());
    }

    #[test]
    fn test_tokens_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileTokenStore::open(&path).unwrap();
        store.set(TokenKind::Access, "acc");
        store.set(TokenKind::Refresh, "ref");
        drop(store);

        let reopened = FileTokenStore::open(&path).unwrap();
        assert_eq!(reopened.session(), Session::new("acc", "ref"));
    }

    #[test]
    fn test_clear_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileTokenStore::open(&path).unwrap();
        store.set(TokenKind::Access, "acc");
        store.set(TokenKind::Refresh, "ref");
        store.clear(TokenKind::Access);

        let content = fs::read_to_string(&path).unwrap();
        let on_disk: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(on_disk, serde_json::json!({"refreshToken": "ref"}));
    }

    #[test]
    fn test_reads_document_with_fixed_key_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"accessToken":"a1","refreshToken":"r1"}"#).unwrap();

        let store = FileTokenStore::open(&path).unwrap();
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("a1"));
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("r1"));
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileTokenStore::open(&path),
            Err(StorageError::Json(_))
        ));
    }
}
