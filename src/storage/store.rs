//! Keyed tournament stores: in-memory and JSON files on disk.

use crate::models::Tournament;
use std::collections::HashMap;
use std::path::PathBuf;

/// Errors from loading or saving tournament state.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage I/O failed: {}", e),
            StoreError::Json(e) => write!(f, "Stored tournament is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Persistence for tournament state, one JSON blob per key within the store's namespace.
pub trait TournamentStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<Tournament>, StoreError>;
    fn save(&mut self, key: &str, tournament: &Tournament) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Store that keeps serialized blobs in a map. State is lost when dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    namespace: String,
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
        }
    }

    fn slot(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Store a raw blob as-is (e.g. state written by an older version).
    pub fn insert_raw(&mut self, key: &str, blob: impl Into<String>) {
        let slot = self.slot(key);
        self.entries.insert(slot, blob.into());
    }
}

impl TournamentStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Tournament>, StoreError> {
        match self.entries.get(&self.slot(key)) {
            Some(blob) => Ok(Some(serde_json::from_str(blob)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, key: &str, tournament: &Tournament) -> Result<(), StoreError> {
        let blob = serde_json::to_string(tournament)?;
        let slot = self.slot(key);
        self.entries.insert(slot, blob);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(&self.slot(key));
        Ok(())
    }
}

/// Store that writes `<dir>/<namespace>-<key>.json`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    namespace: String,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            namespace: namespace.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.json", self.namespace, key))
    }
}

impl TournamentStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Tournament>, StoreError> {
        let contents = match std::fs::read_to_string(self.path_for(key)) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, key: &str, tournament: &Tournament) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(tournament)?;
        std::fs::write(self.path_for(key), json)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
