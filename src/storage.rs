// Key-value persistence backends

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory created under the store root
pub const STORE_DIR: &str = ".taskboard";

const CURRENT_VERSION: u32 = 1;

/// String-keyed store of JSON-encoded values
///
/// Every `set_item`/`remove_item` must be durable before it returns.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Volatile storage, mostly for tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `<root>/.taskboard`
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open or create file storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_store_dir(path.as_ref())?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(value))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        let tmp_path = self.base_path.join(format!("{}.json.tmp", key));
        let lock_path = self.base_path.join(format!("{}.lock", key));

        // Serializes writers of this key; the temp file name is only safe while held
        let lock = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open {}", lock_path.display()))?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);

        // Rename is atomic, so readers see either the old value or the new one
        fs::rename(&tmp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!(key, bytes = value.len(), "set_item: written");
        // Lock is released when the lock file is dropped
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

/// Create `<root>/.taskboard` with its `.gitignore` and `.version` files
pub(crate) fn prepare_store_dir(root: &Path) -> Result<PathBuf> {
    let base_path = root.join(STORE_DIR);
    fs::create_dir_all(&base_path).context("Failed to create store directory")?;

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "taskboard.db\ntaskboard.db-shm\ntaskboard.db-wal\n*.lock\n*.tmp\n")?;
    }

    let version_path = base_path.join(".version");
    if !version_path.exists() {
        fs::write(version_path, CURRENT_VERSION.to_string())?;
    }

    Ok(base_path)
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("tasks").unwrap(), None);

        storage.set_item("tasks", "[]").unwrap();
        assert_eq!(storage.get_item("tasks").unwrap().as_deref(), Some("[]"));

        storage.remove_item("tasks").unwrap();
        assert_eq!(storage.get_item("tasks").unwrap(), None);
    }

    #[test]
    fn test_file_storage_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();

        let store_path = temp.path().join(".taskboard");
        assert_eq!(storage.base_path(), store_path.as_path());
        assert!(store_path.join(".gitignore").exists());
        assert!(store_path.join(".version").exists());
    }

    #[test]
    fn test_file_storage_overwrite_shorter_value() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();

        storage.set_item("theme", "\"light-theme\"").unwrap();
        storage.set_item("theme", "x").unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("x"));

        let on_disk = fs::read_to_string(temp.path().join(".taskboard/theme.json")).unwrap();
        assert_eq!(on_disk, "x");
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut storage = FileStorage::open(temp.path()).unwrap();
            storage.set_item("activeBoard", "\"Roadmap\"").unwrap();
        }
        let storage = FileStorage::open(temp.path()).unwrap();
        assert_eq!(storage.get_item("activeBoard").unwrap().as_deref(), Some("\"Roadmap\""));
    }

    #[test]
    fn test_file_storage_remove_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();
        storage.remove_item("tasks").unwrap();
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("showSideBar").is_ok());
        assert!(validate_key("active-board_2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_file_storage_concurrent_reader_never_sees_partial_value() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        let temp = TempDir::new().unwrap();
        let mut writer_storage = FileStorage::open(temp.path()).unwrap();
        let reader_storage = FileStorage::open(temp.path()).unwrap();

        let big = |n: usize| serde_json::to_string(&vec![format!("entry-{}", n); 20_000]).unwrap();
        writer_storage.set_item("tasks", &big(0)).unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let writer_done = Arc::clone(&done);
        let writer = thread::spawn(move || {
            for i in 1..=200 {
                writer_storage.set_item("tasks", &big(i)).unwrap();
            }
            writer_done.store(true, Ordering::SeqCst);
        });

        let mut reads = 0;
        let mut torn = 0;
        while !done.load(Ordering::SeqCst) {
            let raw = reader_storage.get_item("tasks").unwrap().unwrap();
            if serde_json::from_str::<Vec<String>>(&raw).is_err() {
                torn += 1;
            }
            reads += 1;
        }
        writer.join().unwrap();

        assert!(reads > 0);
        assert_eq!(torn, 0, "{} of {} reads were partial", torn, reads);
        assert!(!temp.path().join(".taskboard/tasks.json.tmp").exists());
    }
}
