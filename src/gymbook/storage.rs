//! Key-value storage for client state that outlives a single submission.
//!
//! The browser's local storage becomes the [`KeyValueStore`] capability: the login
//! form writes the access token through it and never reads it back. [`FileStore`]
//! persists entries as a flat JSON object so the token survives between runs of
//! the terminal client; [`MemoryStore`] lives for the process only.

use anyhow::{anyhow, Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::debug;

pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never set.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Well-known storage keys. Only one access token is held at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKey {
    AccessToken,
}

impl StorageKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
        }
    }
}

/// # Errors
/// Propagates the store's write error.
pub fn set_local_storage<S: KeyValueStore + ?Sized>(
    store: &S,
    key: StorageKey,
    value: &str,
) -> Result<()> {
    store.set(key.as_str(), value)
}

/// # Errors
/// Propagates the store's read error.
pub fn get_local_storage<S: KeyValueStore + ?Sized>(
    store: &S,
    key: StorageKey,
) -> Result<Option<String>> {
    store.get(key.as_str())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-object file store. Writes go through a sibling temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<data dir>/gymbook/storage.json`, or `None` when the platform has no data dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("storage.json"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).with_context(|| format!("parsing {}", self.path.display()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(entries)?;
        let replaced = write_owner_only(&tmp_path, contents.as_bytes()).and_then(|()| {
            fs::rename(&tmp_path, &self.path)
                .with_context(|| format!("replacing {}", self.path.display()))
        });
        if replaced.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        replaced?;

        debug!("storage written to {}", self.path.display());

        Ok(())
    }
}

/// Creates `path` readable by the owner only and writes `contents` to it. A stale
/// file at `path` is removed first so the mode applies to a fresh inode.
fn write_owner_only(path: &Path, contents: &[u8]) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err).with_context(|| format!("removing {}", path.display())),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("creating {}", path.display()))?;
    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .with_context(|| format!("writing {}", path.display()))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("file store lock poisoned"))?;

        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_is_well_known() {
        assert_eq!(StorageKey::AccessToken.as_str(), "accessToken");
    }

    #[test]
    fn memory_store_overwrites_previous_value() {
        let store = MemoryStore::new();
        assert_eq!(get_local_storage(&store, StorageKey::AccessToken).unwrap(), None);

        set_local_storage(&store, StorageKey::AccessToken, "T1").unwrap();
        set_local_storage(&store, StorageKey::AccessToken, "T2").unwrap();

        assert_eq!(
            get_local_storage(&store, StorageKey::AccessToken).unwrap(),
            Some("T2".to_string())
        );
    }

    #[test]
    fn file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get("accessToken").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStore::new(&path).set("accessToken", "T1").unwrap();
        FileStore::new(&path).set("theme", "dark").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("accessToken").unwrap(), Some("T1".to_string()));
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::new(&path).get("accessToken").unwrap_err();
        assert!(err.to_string().contains("parsing"));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        FileStore::new(&path).set("accessToken", "T1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn stale_temp_file_does_not_leak_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, "{}").unwrap();
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStore::new(&path).set("accessToken", "T1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!tmp_path.exists());
    }

    #[test]
    fn failed_replace_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        // A non-empty directory cannot be replaced by a file.
        fs::create_dir_all(path.join("occupied")).unwrap();

        let store = FileStore::new(&path);
        let entries = BTreeMap::from([("accessToken".to_string(), "T1".to_string())]);
        let err = store.write_entries(&entries).unwrap_err();

        assert!(err.to_string().contains("replacing"), "{err:#}");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
