use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    assets::directional::DirectionalImage,
    compose::compositor::compose,
    compose::config::CompositorConfig,
    foundation::core::Coordinates,
    foundation::error::PanoResult,
    store::artifact::PanoramaArtifact,
    store::sink::{Locator, PanoramaStore},
};

/// Instants tried after the first before a filename collision is reported.
const MAX_RESTAMPS: i64 = 1000;

/// Summary of one stored panorama.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedPanorama {
    /// Stored filename.
    pub filename: String,
    /// Where the panorama can be fetched from.
    pub locator: Locator,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of directional images that went into it.
    pub strip_count: usize,
}

/// Compose, encode, name and persist a panorama, stamped with the current time.
pub fn generate_panorama(
    images: &[DirectionalImage],
    coords: &Coordinates,
    config: &CompositorConfig,
    store: &dyn PanoramaStore,
) -> PanoResult<GeneratedPanorama> {
    generate_panorama_at(images, coords, config, store, Utc::now())
}

/// [`generate_panorama`] with an explicit generation instant.
#[tracing::instrument(skip_all, fields(lat = coords.lat_text(), lng = coords.lng_text()))]
pub fn generate_panorama_at(
    images: &[DirectionalImage],
    coords: &Coordinates,
    config: &CompositorConfig,
    store: &dyn PanoramaStore,
    at: DateTime<Utc>,
) -> PanoResult<GeneratedPanorama> {
    tracing::info!(images = images.len(), "generating panorama");

    let canvas = compose(images, config)?;
    let mut artifact = PanoramaArtifact::from_canvas(&canvas, coords, at)?;
    let locator = save_unique(store, &mut artifact, coords, at)?;

    tracing::info!(%locator, width = artifact.width, height = artifact.height, "panorama ready");
    Ok(GeneratedPanorama {
        filename: artifact.filename,
        locator,
        width: artifact.width,
        height: artifact.height,
        strip_count: images.len(),
    })
}

/// Save `artifact`, moving its timestamp forward one millisecond per name already taken.
///
/// Stores refuse to overwrite, so concurrent writers at the same coordinates each end up
/// with their own filename.
fn save_unique(
    store: &dyn PanoramaStore,
    artifact: &mut PanoramaArtifact,
    coords: &Coordinates,
    at: DateTime<Utc>,
) -> PanoResult<Locator> {
    let mut step = 0;
    loop {
        match store.save(artifact) {
            Err(e) if e.is_already_exists() && step < MAX_RESTAMPS => {
                step += 1;
                tracing::debug!(taken = %artifact.filename, "filename taken, restamping");
                artifact.restamp(coords, at + TimeDelta::milliseconds(step));
            }
            saved => return saved,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
