use chrono::{DateTime, Utc};

use crate::{
    compose::canvas::PanoramaCanvas,
    foundation::core::Coordinates,
    foundation::error::{PanoError, PanoResult},
};

/// Prefix shared by every panorama filename.
pub const FILENAME_PREFIX: &str = "panorama_";
/// Extension of the encoded output.
pub const FILENAME_EXTENSION: &str = "png";

/// Encoded panorama plus the name it is stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanoramaArtifact {
    /// `panorama_<lat>_<lng>_<timestamp>.png`.
    pub filename: String,
    /// PNG bytes.
    pub bytes: Vec<u8>,
    /// Generation instant encoded in the filename.
    pub created_at: DateTime<Utc>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl PanoramaArtifact {
    /// Encode `canvas` and name it after `coords` and `at`.
    pub fn from_canvas(
        canvas: &PanoramaCanvas,
        coords: &Coordinates,
        at: DateTime<Utc>,
    ) -> PanoResult<Self> {
        Ok(Self {
            filename: panorama_filename(coords, at),
            bytes: canvas.encode_png()?,
            created_at: at,
            width: canvas.width,
            height: canvas.height,
        })
    }

    /// Re-derive the filename and creation time for another instant.
    pub fn restamp(&mut self, coords: &Coordinates, at: DateTime<Utc>) {
        self.filename = panorama_filename(coords, at);
        self.created_at = at;
    }
}

/// Sortable, colon-free UTC timestamp: `YYYY-MM-DDTHH-MM-SS-mmmZ`.
pub fn timestamp_fragment(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// `panorama_<lat>_<lng>_<timestamp>.png` with the coordinates' decimal text verbatim.
pub fn panorama_filename(coords: &Coordinates, at: DateTime<Utc>) -> String {
    format!(
        "{FILENAME_PREFIX}{}_{}_{}.{FILENAME_EXTENSION}",
        coords.lat_text(),
        coords.lng_text(),
        timestamp_fragment(at)
    )
}

/// `true` for names this crate generates (`panorama_*.png`).
pub fn is_panorama_filename(name: &str) -> bool {
    name.starts_with(FILENAME_PREFIX)
        && name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext == FILENAME_EXTENSION)
}

/// Reject names that could escape the store root.
pub(crate) fn validate_filename(name: &str) -> PanoResult<&str> {
    if name.is_empty() {
        return Err(PanoError::validation("filename must be non-empty"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(PanoError::validation(format!(
            "filename '{name}' must not contain path separators"
        )));
    }
    if name == "." || name.contains("..") {
        return Err(PanoError::validation(format!(
            "filename '{name}' must not contain '..'"
        )));
    }
    Ok(name)
}

#[cfg(test)]
#[path = "../../tests/unit/store/artifact.rs"]
mod tests;
