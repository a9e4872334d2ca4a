//! Credential persistence.
//!
//! A [`CredentialStore`] holds the process-wide credential pair under two fixed
//! keys. The session client reads it before every request and writes it when a
//! refresh succeeds or fails, so implementations must be cheap to read and safe
//! to share across tasks.
//!
//! Stores never surface errors. A store that cannot reach its backing storage
//! behaves as if no credentials were stored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::tokens::{AccessToken, CredentialPair, RefreshToken};

/// Storage key of the access credential.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key of the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Capability interface over credential persistence.
pub trait CredentialStore: Send + Sync {
    /// Persist both credentials, replacing whatever was stored.
    fn save(&self, pair: &CredentialPair);

    /// Returns the stored pair.
    ///
    /// A half-present pair is cleared and reported as absent.
    fn read(&self) -> Option<CredentialPair>;

    /// Remove both credentials. Clearing an empty store is a no-op.
    fn clear(&self);

    /// Returns true if an access credential is stored.
    fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}

/// The two named slots as they are persisted.
///
/// Both fields are optional on disk so a damaged document can be detected
/// and normalized instead of failing to parse.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

impl StoredCredentials {
    fn from_pair(pair: &CredentialPair) -> Self {
        Self {
            access: Some(pair.access.as_str().to_string()),
            refresh: Some(pair.refresh.as_str().to_string()),
        }
    }

    fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    /// Returns the pair, or `None` if either half is missing.
    fn into_pair(self) -> Option<CredentialPair> {
        match (self.access, self.refresh) {
            (Some(access), Some(refresh)) => Some(CredentialPair::new(
                AccessToken::new(access),
                RefreshToken::new(refresh),
            )),
            _ => None,
        }
    }
}

/// Credentials persisted to a JSON file, surviving process restarts.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a partially written pair.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the file at `path`.
    ///
    /// The file and its parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> io::Result<Option<StoredCredentials>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, stored: &StoredCredentials) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(stored)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&temp_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&temp_path, perms)?;
        }

        fs::rename(&temp_path, &self.path)
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, pair: &CredentialPair) {
        if let Err(e) = self.write(&StoredCredentials::from_pair(pair)) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist credentials");
        }
    }

    fn read(&self) -> Option<CredentialPair> {
        let stored = match self.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %e, "Malformed credential file, clearing");
                self.clear();
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read credential file");
                return None;
            }
        };

        if stored.is_empty() {
            return None;
        }

        let pair = stored.into_pair();
        if pair.is_none() {
            debug!(path = %self.path.display(), "Half-present credential pair, clearing");
            self.clear();
        }
        pair
    }

    fn clear(&self) {
        if let Err(e) = self.remove() {
            warn!(path = %self.path.display(), error = %e, "Failed to remove credential file");
        }
    }
}

/// Credentials held in process memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slots: RwLock<StoredCredentials>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `pair`.
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            slots: RwLock::new(StoredCredentials::from_pair(&pair)),
        }
    }

    /// Write a single slot, bypassing the pair invariant.
    ///
    /// Exists to reproduce storage left half-written by another writer.
    pub fn set_slot(&self, key: &str, value: Option<&str>) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let value = value.map(str::to_string);
        match key {
            ACCESS_TOKEN_KEY => slots.access = value,
            REFRESH_TOKEN_KEY => slots.refresh = value,
            other => warn!(key = other, "Unknown credential slot"),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, pair: &CredentialPair) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        *slots = StoredCredentials::from_pair(pair);
    }

    fn read(&self) -> Option<CredentialPair> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        match (&slots.access, &slots.refresh) {
            (Some(access), Some(refresh)) => Some(CredentialPair::new(
                AccessToken::new(access.clone()),
                RefreshToken::new(refresh.clone()),
            )),
            _ => {
                *slots = StoredCredentials::default();
                None
            }
        }
    }

    fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        *slots = StoredCredentials::default();
    }
}

/// A store for contexts with no persistent storage.
///
/// Saves are discarded and reads always report no credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCredentialStore;

impl CredentialStore for NoopCredentialStore {
    fn save(&self, _pair: &CredentialPair) {}

    fn read(&self) -> Option<CredentialPair> {
        None
    }

    fn clear(&self) {}

    fn is_authenticated(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pair(access: &str, refresh: &str) -> CredentialPair {
        CredentialPair::new(AccessToken::new(access), RefreshToken::new(refresh))
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.read().is_none());
        assert!(!store.is_authenticated());

        store.save(&pair("a", "r"));
        assert_eq!(store.read(), Some(pair("a", "r")));
        assert!(store.is_authenticated());
    }

    #[test]
    fn memory_store_save_overwrites_both() {
        let store = MemoryCredentialStore::with_pair(pair("a1", "r1"));
        store.save(&pair("a2", "r2"));
        assert_eq!(store.read(), Some(pair("a2", "r2")));
    }

    #[test]
    fn memory_store_clear_is_idempotent() {
        let store = MemoryCredentialStore::with_pair(pair("a", "r"));
        store.clear();
        store.clear();
        assert!(store.read().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn memory_store_normalizes_half_present_pair() {
        let store = MemoryCredentialStore::new();
        store.set_slot(ACCESS_TOKEN_KEY, Some("orphan"));
        assert!(store.read().is_none());

        // The orphaned half is gone, so restoring the other half alone
        // still does not produce a pair.
        store.set_slot(REFRESH_TOKEN_KEY, Some("r"));
        assert!(store.read().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn file_store_round_trip_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileCredentialStore::new(&path).save(&pair("a", "r"));

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.read(), Some(pair("a", "r")));
        assert!(reopened.is_authenticated());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn file_store_uses_fixed_key_names() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.save(&pair("a", "r"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json[ACCESS_TOKEN_KEY], "a");
        assert_eq!(json[REFRESH_TOKEN_KEY], "r");
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.save(&pair("a", "r"));

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store.clear();
        store.save(&pair("a", "r"));
        store.clear();
        store.clear();
        assert!(store.read().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn file_store_normalizes_half_present_pair() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"access_token": "orphan"}"#).unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(store.read().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn file_store_treats_garbage_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(store.read().is_none());
        assert!(!store.is_authenticated());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn file_store_keeps_file_it_cannot_read() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileCredentialStore::new(&path);
        store.save(&pair("a", "r"));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&path).is_ok() {
            // Permission bits do not apply to this user (root).
            return;
        }

        assert!(store.read().is_none());
        assert!(path.exists());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        assert_eq!(store.read(), Some(pair("a", "r")));
    }

    #[test]
    fn noop_store_never_holds_credentials() {
        let store = NoopCredentialStore;
        store.save(&pair("a", "r"));
        assert!(store.read().is_none());
        assert!(!store.is_authenticated());
        store.clear();
    }
}
