//! Pluggable key/value persistence for client-side preferences.
//!
//! The browser keeps these in cookies; other front ends substitute a store
//! with the same expiry semantics. [`CookieOptions`] carries the cookie
//! attributes so every backend (and a server rendering `Set-Cookie`) agrees on
//! them.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub max_age: Duration,
    pub path: String,
    pub same_site: SameSite,
}

impl CookieOptions {
    /// One year, site-wide, never sent cross-site.
    pub fn theme() -> Self {
        Self {
            max_age: Duration::from_secs(60 * 60 * 24 * 365),
            path: "/".to_string(),
            same_site: SameSite::Strict,
        }
    }

    /// Render a `Set-Cookie` header value.
    pub fn to_set_cookie(&self, name: &str, value: &str) -> String {
        format!(
            "{name}={value}; Path={}; Max-Age={}; SameSite={}",
            self.path,
            self.max_age.as_secs(),
            self.same_site
        )
    }

    /// Absolute expiry for a value written at `now`.
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.max_age)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// String values by key, each with an expiry.
pub trait KeyValueStore {
    /// Current value for `key`; expired values read as absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<(), StorageError> {
        (**self).set(key, value, options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredValue {
    fn live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// Process-local store. Clones share the same entries, so a clone handed to a
/// second session sees what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|v| v.live_at(now))
            .map(|v| v.value.clone())
    }

    pub fn set_at(&self, key: &str, value: &str, options: &CookieOptions, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: options.expires_at(now),
            },
        );
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get_at(key, Utc::now()))
    }

    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<(), StorageError> {
        self.set_at(key, value, options, Utc::now());
        Ok(())
    }
}

// ─── JSON file ───────────────────────────────────────────────────────────────

/// Store backed by a small JSON file, for front ends without a cookie jar.
///
/// The file is re-read on every access and rewritten on every `set`; expired
/// entries are pruned on write. Reads of a file that is not valid JSON fail
/// with [`StorageError::Serde`], and the next write replaces it.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, StoredValue>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(HashMap::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>, StorageError> {
        Ok(self
            .load()?
            .remove(key)
            .filter(|v| v.live_at(now))
            .map(|v| v.value))
    }

    pub fn set_at(
        &self,
        key: &str,
        value: &str,
        options: &CookieOptions,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(StorageError::Serde(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "discarding unreadable preferences: {e}"
                );
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.retain(|_, v| v.live_at(now));
        entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: options.expires_at(now),
            },
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), key, "persisted preference");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<(), StorageError> {
        self.set_at(key, value, options, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short(secs: u64) -> CookieOptions {
        CookieOptions {
            max_age: Duration::from_secs(secs),
            ..CookieOptions::theme()
        }
    }

    #[test]
    fn test_theme_cookie_header() {
        assert_eq!(
            CookieOptions::theme().to_set_cookie("fi-theme", "dark"),
            "fi-theme=dark; Path=/; Max-Age=31536000; SameSite=Strict"
        );
    }

    #[test]
    fn test_huge_max_age_saturates() {
        let opts = CookieOptions {
            max_age: Duration::from_secs(u64::MAX),
            ..CookieOptions::theme()
        };
        assert_eq!(opts.expires_at(Utc::now()), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_memory_store_expiry() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.set_at("k", "v", &short(60), t0);

        assert_eq!(store.get_at("k", t0).as_deref(), Some("v"));
        assert_eq!(
            store.get_at("k", t0 + chrono::Duration::seconds(59)).as_deref(),
            Some("v")
        );
        assert_eq!(store.get_at("k", t0 + chrono::Duration::seconds(60)), None);
        assert_eq!(store.get_at("missing", t0), None);
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("fi-theme", "warm", &CookieOptions::theme()).unwrap();
        assert_eq!(b.get("fi-theme").unwrap().as_deref(), Some("warm"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope.json"));
        assert_eq!(store.get("fi-theme").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_parents_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pantry").join("preferences.json");
        let store = FileStore::new(&path);
        store.set("fi-theme", "glass", &CookieOptions::theme()).unwrap();
        assert!(path.exists());

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("fi-theme").unwrap().as_deref(), Some("glass"));
    }

    #[test]
    fn test_file_store_expiry_and_pruning() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        let t0 = Utc::now();
        store.set_at("old", "1", &short(10), t0).unwrap();

        let later = t0 + chrono::Duration::seconds(11);
        assert_eq!(store.get_at("old", later).unwrap(), None);

        store.set_at("new", "2", &short(10), later).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("\"old\""));
        assert!(raw.contains("\"new\""));
    }

    #[test]
    fn test_file_store_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("fi-theme"), Err(StorageError::Serde(_))));
    }

    #[test]
    fn test_file_store_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);

        store.set("fi-theme", "dark", &CookieOptions::theme()).unwrap();
        assert_eq!(store.get("fi-theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_write_propagates_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a file.
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("fi-theme", "dark", &CookieOptions::theme()),
            Err(StorageError::Io(_))
        ));
    }
}
