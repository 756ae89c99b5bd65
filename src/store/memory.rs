use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::{
    foundation::error::{PanoError, PanoResult},
    store::artifact::{PanoramaArtifact, validate_filename},
    store::sink::{
        DEFAULT_LOCATOR_PREFIX, DeleteOutcome, Locator, PanoramaStore, StoredPanorama,
        sort_newest_first,
    },
};

#[derive(Debug)]
struct Entry {
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
}

/// In-memory store for tests and embedding.
#[derive(Debug)]
pub struct InMemoryStore {
    locator_prefix: String,
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Empty store using [`DEFAULT_LOCATOR_PREFIX`].
    pub fn new() -> Self {
        Self {
            locator_prefix: DEFAULT_LOCATOR_PREFIX.to_string(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Number of stored panoramas.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PanoramaStore for InMemoryStore {
    fn save(&self, artifact: &PanoramaArtifact) -> PanoResult<Locator> {
        let name = validate_filename(&artifact.filename)?;
        let mut entries = self.lock();
        if entries.contains_key(name) {
            return Err(PanoError::storage(
                format!("save panorama '{name}'"),
                std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            ));
        }
        entries.insert(
            name.to_string(),
            Entry {
                bytes: artifact.bytes.clone(),
                created_at: artifact.created_at,
            },
        );
        Ok(Locator::new(&self.locator_prefix, name))
    }

    fn list(&self) -> PanoResult<Vec<StoredPanorama>> {
        let mut out: Vec<StoredPanorama> = self
            .lock()
            .iter()
            .map(|(name, entry)| StoredPanorama {
                filename: name.clone(),
                locator: Locator::new(&self.locator_prefix, name),
                size: entry.bytes.len() as u64,
                created_at: entry.created_at,
                modified_at: entry.created_at,
            })
            .collect();
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn delete(&self, filename: &str) -> PanoResult<DeleteOutcome> {
        let name = validate_filename(filename)?;
        Ok(match self.lock().remove(name) {
            Some(_) => DeleteOutcome::Removed,
            None => DeleteOutcome::NotFound,
        })
    }

    fn exists(&self, filename: &str) -> PanoResult<bool> {
        let name = validate_filename(filename)?;
        Ok(self.lock().contains_key(name))
    }

    fn read(&self, filename: &str) -> PanoResult<Option<Vec<u8>>> {
        let name = validate_filename(filename)?;
        Ok(self.lock().get(name).map(|e| e.bytes.clone()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/memory.rs"]
mod tests;
