use super::{TokenStore, non_empty};
use crate::error::{CoreError, CoreResult};
use crate::tokens::TokenKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Token store persisted as a small JSON document on disk
///
/// The document maps the fixed storage keys (`access_token`, `refresh_token`)
/// to their values, so a session survives process restarts. Every mutation
/// rewrites the whole file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    tokens: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStore {
    /// Open the store at `path`, loading any tokens already persisted there
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file is
    /// reported as a storage error.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let tokens = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                CoreError::storage_error(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), entries = tokens.len(), "Opened token store");
        Ok(Self {
            path,
            tokens: Mutex::new(tokens),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, tokens: &BTreeMap<String, String>) -> CoreResult<()> {
        if tokens.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(tokens)?)?;
        restrict_permissions(&tmp);
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        warn!(path = %path.display(), "Failed to restrict token file permissions: {e}");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        non_empty(tokens.get(kind.storage_key()))
    }

    fn set(&self, kind: TokenKind, value: &str) -> CoreResult<()> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = tokens.clone();
        updated.insert(kind.storage_key().to_string(), value.to_string());
        // Memory only follows the file once the write went through
        self.persist(&updated)?;
        *tokens = updated;
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        self.persist(&BTreeMap::new())?;
        tokens.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenPair;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::open(temp_dir.path().join("session.json")).unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.get(TokenKind::Refresh), None);
    }

    #[test]
    fn test_tokens_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        let store = FileTokenStore::open(&path).unwrap();
        store.store_pair(&TokenPair::new("a1", "r1")).unwrap();
        drop(store);

        let reopened = FileTokenStore::open(&path).unwrap();
        assert_eq!(reopened.get(TokenKind::Access).as_deref(), Some("a1"));
        assert_eq!(reopened.get(TokenKind::Refresh).as_deref(), Some("r1"));
        assert!(reopened.is_authenticated());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["access_token"], "a1");
        assert_eq!(raw["refresh_token"], "r1");
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let store = FileTokenStore::open(&path).unwrap();
        store.store_pair(&TokenPair::new("a1", "r1")).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(store.get(TokenKind::Access), None);

        // Clearing an already empty store is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        let store = FileTokenStore::open(blocker.join("session.json")).unwrap();

        // Parent turns into a regular file after open
        std::fs::write(&blocker, "").unwrap();

        assert!(store.set(TokenKind::Access, "a1").is_err());
        assert_eq!(store.get(TokenKind::Access), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_failed_clear_keeps_tokens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let store = FileTokenStore::open(&path).unwrap();
        store.store_pair(&TokenPair::new("a1", "r1")).unwrap();

        // A directory in place of the file cannot be removed with remove_file
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.clear().is_err());
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("a1"));
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("r1"));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FileTokenStore::open(&path);
        assert!(matches!(result, Err(CoreError::Storage { .. })));
    }
}
