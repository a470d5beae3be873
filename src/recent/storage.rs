use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const RECENT_DIR: &str = "typeahead";
const RECENT_FILE: &str = "recent_searches.json";

/// Where recent searches live by default: `<data dir>/typeahead/recent_searches.json`.
pub fn recent_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(RECENT_DIR).join(RECENT_FILE))
}

/// Persistence collaborator for recent searches.
///
/// Callers treat every failure as best-effort: a failed load means an empty
/// list and a failed save leaves the in-memory list as it is.
pub trait RecentStore: Send {
    fn load(&self) -> io::Result<Vec<String>>;
    fn save(&self, entries: &[String]) -> io::Result<()>;
}

/// Stores the list as a JSON array of strings.
///
/// No file locking - last writer wins if multiple instances run simultaneously.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`recent_path`], if the platform has a data directory.
    pub fn default_location() -> Option<Self> {
        recent_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentStore for FileStore {
    fn load(&self) -> io::Result<Vec<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&self, entries: &[String]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }
}

/// In-memory store, for `--no-history` sessions and tests.
///
/// Clones share the same backing list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

impl RecentStore for MemoryStore {
    fn load(&self) -> io::Result<Vec<String>> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|_| io::Error::other("recent searches lock poisoned"))
    }

    fn save(&self, entries: &[String]) -> io::Result<()> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("recent searches lock poisoned"))?;
        *stored = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("recent.json"));

        assert_eq!(store.load().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_file_store_creates_parent_dirs_and_reloads() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("recent.json"));
        let entries = vec!["rick".to_string(), "morty".to_string()];

        store.save(&entries).unwrap();

        assert_eq!(store.load().unwrap(), entries);
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["rick","morty"]"#);
    }

    #[test]
    fn test_file_store_corrupt_file_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(path).load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.save(&["x".to_string()]).unwrap();

        assert_eq!(other.load().unwrap(), vec!["x".to_string()]);
    }

    #[test]
    fn test_recent_path_ends_with_file_name() {
        if let Some(path) = recent_path() {
            assert!(path.ends_with("typeahead/recent_searches.json"));
        }
    }
}
