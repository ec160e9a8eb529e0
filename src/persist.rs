use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StudyError};

/// Fixed key under which the puzzle mode keeps its best score.
pub const HIGH_SCORE_KEY: &str = "blocks-game-highscore";

/// Minimal string key-value capability (localStorage-shaped).
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file. A missing file reads as empty;
/// every `set` rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StudyError::Io(e)),
        }
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        let data = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Stored high score; missing key, unparsable value or store failure all read as 0.
pub fn load_high_score(store: &dyn KvStore) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(v)) => v.trim().parse().unwrap_or(0),
        Ok(None) => 0,
        Err(e) => {
            warn!("[persist] high score unavailable: {e}");
            0
        }
    }
}

/// Write the high score; failures are logged and otherwise ignored.
pub fn save_high_score(store: &mut dyn KvStore, score: u32) {
    if let Err(e) = store.set(HIGH_SCORE_KEY, &score.to_string()) {
        warn!("[persist] failed to save high score {score}: {e}");
    }
}
