use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub const PROJECTS_KEY: &str = "projects";
pub const TASKS_KEY: &str = "tasks";
pub const DAILY_REPORTS_KEY: &str = "dailyReports";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read storage file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write storage file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse storage document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("storage document must be a JSON object")]
    NotAnObject,
    #[error("malformed collection `{key}`: {source}")]
    Collection {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to encode collection `{key}`: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to encode storage document: {0}")]
    EncodeDocument(#[source] serde_json::Error),
}

/// Key-value store of JSON arrays, mirroring the tracker's browser storage.
///
/// Values may be stored either as JSON arrays or, as in a raw browser
/// storage dump, as strings containing JSON arrays. Absent keys, `null` and
/// empty strings all read as an empty collection.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    path: Option<PathBuf>,
    entries: Map<String, Value>,
}

impl Storage {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store backed by `path`; a file that does not exist yet is
    /// an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "storage file missing, starting empty");
            return Ok(Self {
                path: Some(path.to_path_buf()),
                entries: Map::new(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|source| StorageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut storage = Self::from_json_str(&contents)?;
        storage.path = Some(path.to_path_buf());
        Ok(storage)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, StorageError> {
        if contents.trim().is_empty() {
            return Ok(Self::in_memory());
        }
        match serde_json::from_str(contents).map_err(StorageError::Parse)? {
            Value::Object(entries) => Ok(Self {
                path: None,
                entries,
            }),
            _ => Err(StorageError::NotAnObject),
        }
    }

    pub fn collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        let malformed = |source| StorageError::Collection {
            key: key.to_string(),
            source,
        };
        let items: Vec<T> = match self.entries.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(raw)) if raw.trim().is_empty() => Vec::new(),
            Some(Value::String(raw)) => serde_json::from_str(raw).map_err(malformed)?,
            Some(value) => Vec::<T>::deserialize(value).map_err(malformed)?,
        };
        debug!(key, count = items.len(), "loaded collection");
        Ok(items)
    }

    /// Replaces the whole collection under `key`; other keys are untouched.
    pub fn replace_collection<T: Serialize>(
        &mut self,
        key: &str,
        items: &[T],
    ) -> Result<(), StorageError> {
        let value = serde_json::to_value(items).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Writes the document back to its file. In-memory stores have nothing
    /// to write.
    pub fn save(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents =
            serde_json::to_string_pretty(&self.entries).map_err(StorageError::EncodeDocument)?;
        std::fs::write(path, contents).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })
    }
}
