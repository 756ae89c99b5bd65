use std::fmt;

use chrono::{DateTime, Utc};

use crate::{foundation::error::PanoResult, store::artifact::PanoramaArtifact};

/// Download path under which collaborators serve stored panoramas.
pub const DEFAULT_LOCATOR_PREFIX: &str = "/api/download/";

/// String by which a stored panorama is retrieved later.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locator(String);

impl Locator {
    /// Locator for `filename` under `prefix`.
    pub fn new(prefix: &str, filename: &str) -> Self {
        Self(format!("{prefix}{filename}"))
    }

    /// Borrow the locator text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename part, if the locator ends in one.
    pub fn filename(&self) -> Option<&str> {
        self.0.rsplit_once('/').map_or(Some(self.0.as_str()), |(_, name)| {
            (!name.is_empty()).then_some(name)
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a store listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredPanorama {
    /// Stored filename.
    pub filename: String,
    /// Where collaborators fetch it from.
    pub locator: Locator,
    /// Encoded size in bytes.
    pub size: u64,
    /// Creation time (modification time where the backing store has no birth time).
    pub created_at: DateTime<Utc>,
    /// Last modification time; listings sort on this.
    pub modified_at: DateTime<Utc>,
}

/// Result of a delete request. A missing file is not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The panorama existed and was removed.
    Removed,
    /// Nothing was stored under that name.
    NotFound,
}

impl DeleteOutcome {
    /// `true` for [`DeleteOutcome::Removed`].
    pub fn removed(self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// Persistence boundary for finished panoramas.
///
/// Filenames are unique by construction, so implementations need no cross-writer locking.
/// Listings are best-effort snapshots.
pub trait PanoramaStore: Send + Sync {
    /// Persist an artifact; fails if its filename is already taken.
    fn save(&self, artifact: &PanoramaArtifact) -> PanoResult<Locator>;
    /// Stored panoramas, newest modification first.
    fn list(&self) -> PanoResult<Vec<StoredPanorama>>;
    /// Remove a panorama by filename.
    fn delete(&self, filename: &str) -> PanoResult<DeleteOutcome>;
    /// Whether a panorama is stored under `filename`.
    fn exists(&self, filename: &str) -> PanoResult<bool>;
    /// Stored bytes, or `None` when nothing is stored under `filename`.
    fn read(&self, filename: &str) -> PanoResult<Option<Vec<u8>>>;
}

/// Newest modification first; equal times fall back to filename, newest name first.
pub(crate) fn sort_newest_first(entries: &mut [StoredPanorama]) {
    entries.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| b.filename.cmp(&a.filename))
    });
}
