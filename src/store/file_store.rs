use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{SessionStore, StoreError};

/// Durable session storage backed by a small JSON key-value file.
///
/// The file may hold other keys; only `key` is read or written. Writes go
/// through a sibling temporary file and a rename, so a reader sees either
/// the old or the new contents, never a partial file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    key: String,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>, key: &str) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            key: key.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the key-value map. `Ok(None)` means the file does not exist.
    fn load(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Some(Map::new()));
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn load_or_empty(&self) -> Map<String, Value> {
        match self.load() {
            Ok(map) => map.unwrap_or_default(),
            Err(e) => {
                warn!(
                    "Session file '{}' is unreadable, starting fresh: {}",
                    self.path.display(),
                    e
                );
                Map::new()
            }
        }
    }

    fn persist(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.tmp_path();
        let serialized = serde_json::to_vec_pretty(map)?;
        {
            let mut tmp = fs::File::create(&tmp_path)?;
            tmp.write_all(&serialized)?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "session".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

impl SessionStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self) -> Option<String> {
        let map = match self.load() {
            Ok(Some(map)) => map,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    "Could not read session file '{}': {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };
        match map.get(&self.key) {
            Some(Value::String(token)) => Some(token.clone()),
            Some(_) => {
                warn!(
                    "Session key '{}' in '{}' is not a string; ignoring it.",
                    self.key,
                    self.path.display()
                );
                None
            }
            None => None,
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.load_or_empty();
        map.insert(self.key.clone(), Value::from(token));
        self.persist(&map)?;
        debug!("Session token written to '{}'.", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let map = match self.load() {
            Ok(None) => return Ok(()),
            Ok(Some(mut map)) => {
                if map.remove(&self.key).is_none() {
                    return Ok(());
                }
                map
            }
            // A corrupt file cannot hold a usable token; replace it.
            Err(StoreError::Encode(_)) => Map::new(),
            Err(e) => return Err(e),
        };
        self.persist(&map)?;
        debug!("Session token cleared from '{}'.", self.path.display());
        Ok(())
    }
}
