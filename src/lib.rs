//! panoweave stitches directional photographs into one cylindrical panorama strip.
//!
//! A capture is a set of square photos taken at evenly spaced headings around one point (8 photos
//! at 45° steps is typical). panoweave:
//!
//! 1. **Orders** the photos by heading; caller order never matters.
//! 2. **Crops** the centered vertical strip of each photo.
//! 3. **Composites** the strips left to right, edge to edge ([`OverlapPolicy::Disjoint`]) or with
//!    a linear alpha feather across each seam ([`OverlapPolicy::Feathered`]).
//! 4. **Persists** the PNG under a name derived from coordinates and time via a
//!    [`PanoramaStore`].
//!
//! Compositing is pure: [`compose`] takes images and a [`CompositorConfig`] and returns a
//! [`PanoramaCanvas`]. [`generate_panorama`] wires composition, naming and persistence together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod foundation;
mod pipeline;
mod store;

pub use assets::decode::decode_directional;
pub use assets::directional::DirectionalImage;
pub use compose::blend::{PremulRgba8, feather_ramp, over};
pub use compose::canvas::PanoramaCanvas;
pub use compose::compositor::compose;
pub use compose::config::{CompositorConfig, OverlapPolicy};
pub use compose::crop::{CropStrip, crop_left_offset};
pub use compose::layout::PanoramaLayout;
pub use foundation::core::{Coordinates, Heading, standard_headings};
pub use foundation::error::{PanoError, PanoResult};
pub use pipeline::{GeneratedPanorama, generate_panorama, generate_panorama_at};
pub use store::artifact::{
    FILENAME_EXTENSION, FILENAME_PREFIX, PanoramaArtifact, is_panorama_filename,
    panorama_filename, timestamp_fragment,
};
pub use store::directory::DirectoryStore;
pub use store::memory::InMemoryStore;
pub use store::sink::{DEFAULT_LOCATOR_PREFIX, DeleteOutcome, Locator, PanoramaStore, StoredPanorama};
