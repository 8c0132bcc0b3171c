//! Durable client-side storage for the artifacts that must survive a hard
//! navigation to the results pages.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    InterviewFeedback,
    TechnicalFeedback,
    TechnicalFeedbackPayload,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::InterviewFeedback => "interviewFeedback",
            StorageKey::TechnicalFeedback => "technicalFeedback",
            StorageKey::TechnicalFeedbackPayload => "technicalFeedbackPayload",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String key/value store with the semantics of browser local storage.
pub trait ClientStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError>;
}

/// A stored value plus the moment it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub saved_at: DateTime<Utc>,
    pub value: T,
}

pub fn save_snapshot<T: Serialize>(
    storage: &mut dyn ClientStorage,
    key: StorageKey,
    value: &T,
) -> Result<(), StorageError> {
    let snapshot = Snapshot {
        saved_at: Utc::now(),
        value,
    };
    let json = serde_json::to_string(&snapshot)?;
    debug!(key = key.as_str(), bytes = json.len(), "Saving snapshot");
    storage.set(key, json)
}

pub fn load_snapshot<T: DeserializeOwned>(
    storage: &dyn ClientStorage,
    key: StorageKey,
) -> Result<Option<Snapshot<T>>, StorageError> {
    match storage.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<StorageKey, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        self.entries.remove(&key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: StorageKey, value: String) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
