use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};

use crate::{
    foundation::error::{PanoError, PanoResult},
    store::artifact::{PanoramaArtifact, is_panorama_filename, validate_filename},
    store::sink::{
        DEFAULT_LOCATOR_PREFIX, DeleteOutcome, Locator, PanoramaStore, StoredPanorama,
        sort_newest_first,
    },
};

/// Store backed by one flat directory; the directory listing is the index.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    locator_prefix: String,
}

impl DirectoryStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> PanoResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            PanoError::storage(format!("create output dir '{}'", root.display()), e)
        })?;
        Ok(Self {
            root,
            locator_prefix: DEFAULT_LOCATOR_PREFIX.to_string(),
        })
    }

    /// Use `prefix` instead of [`DEFAULT_LOCATOR_PREFIX`] when building locators.
    pub fn with_locator_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.locator_prefix = prefix.into();
        self
    }

    /// Directory the panoramas live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> PanoResult<PathBuf> {
        Ok(self.root.join(validate_filename(filename)?))
    }

    fn entry_for(&self, path: &Path, name: String) -> std::io::Result<Option<StoredPanorama>> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            // Deleted between read_dir and stat.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if !meta.is_file() {
            return Ok(None);
        }
        let modified_at: DateTime<Utc> = meta.modified()?.into();
        let created_at = meta.created().map(DateTime::<Utc>::from).unwrap_or(modified_at);
        Ok(Some(StoredPanorama {
            locator: Locator::new(&self.locator_prefix, &name),
            filename: name,
            size: meta.len(),
            created_at,
            modified_at,
        }))
    }
}

impl PanoramaStore for DirectoryStore {
    fn save(&self, artifact: &PanoramaArtifact) -> PanoResult<Locator> {
        let path = self.path_for(&artifact.filename)?;
        let mut f = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| PanoError::storage(format!("create '{}'", path.display()), e))?;

        if let Err(e) = f.write_all(&artifact.bytes).and_then(|()| f.flush()) {
            drop(f);
            let _ = fs::remove_file(&path);
            return Err(PanoError::storage(
                format!("write '{}'", path.display()),
                e,
            ));
        }

        tracing::info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            "panorama saved"
        );
        Ok(Locator::new(&self.locator_prefix, &artifact.filename))
    }

    fn list(&self) -> PanoResult<Vec<StoredPanorama>> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PanoError::storage(
                    format!("list '{}'", self.root.display()),
                    e,
                ));
            }
        };

        let mut out = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| {
                PanoError::storage(format!("list '{}'", self.root.display()), e)
            })?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_panorama_filename(&name) {
                continue;
            }
            let path = entry.path();
            if let Some(stored) = self
                .entry_for(&path, name)
                .map_err(|e| PanoError::storage(format!("stat '{}'", path.display()), e))?
            {
                out.push(stored);
            }
        }
        sort_newest_first(&mut out);
        Ok(out)
    }

    fn delete(&self, filename: &str) -> PanoResult<DeleteOutcome> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "panorama deleted");
                Ok(DeleteOutcome::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DeleteOutcome::NotFound),
            Err(e) => Err(PanoError::storage(
                format!("delete '{}'", path.display()),
                e,
            )),
        }
    }

    fn exists(&self, filename: &str) -> PanoResult<bool> {
        Ok(self.path_for(filename)?.is_file())
    }

    fn read(&self, filename: &str) -> PanoResult<Option<Vec<u8>>> {
        let path = self.path_for(filename)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PanoError::storage(format!("read '{}'", path.display()), e)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/directory.rs"]
mod tests;
