use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::error::{PanoError, PanoResult};

/// How adjacent strips meet on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Strips are placed edge to edge.
    Disjoint,
    /// Adjacent strips overlap by `overlap` pixels, blended with a linear alpha ramp.
    Feathered {
        /// Overlap width in pixels, `0 < overlap < crop_width`.
        overlap: u32,
    },
}

impl OverlapPolicy {
    /// Overlap width in pixels (0 for [`OverlapPolicy::Disjoint`]).
    pub fn overlap(self) -> u32 {
        match self {
            Self::Disjoint => 0,
            Self::Feathered { overlap } => overlap,
        }
    }

    /// Straight RGBA8 background used when none is configured explicitly.
    ///
    /// Disjoint canvases are opaque white; feathered canvases start fully transparent.
    pub fn default_background(self) -> [u8; 4] {
        match self {
            Self::Disjoint => [255, 255, 255, 255],
            Self::Feathered { .. } => [0, 0, 0, 0],
        }
    }

    /// Check the policy against a crop width.
    pub fn validate(self, crop_width: u32) -> PanoResult<()> {
        match self {
            Self::Disjoint => Ok(()),
            Self::Feathered { overlap } if overlap == 0 || overlap >= crop_width => {
                Err(PanoError::InvalidOverlap {
                    overlap,
                    crop_width,
                })
            }
            Self::Feathered { .. } => Ok(()),
        }
    }
}

/// Compositor settings, passed by value to every [`compose`](fn@crate::compose) call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Width `W` of the centered strip kept from each image.
    pub crop_width: u32,
    /// Seam treatment between neighbouring strips.
    pub overlap: OverlapPolicy,
    /// When set, inputs that are not `side x side` are stretched to fill that square first.
    /// When unset, all inputs must already be square and equally sized.
    pub resample_side: Option<u32>,
    /// Straight RGBA8 background; `None` uses [`OverlapPolicy::default_background`].
    pub background: Option<[u8; 4]>,
    /// Number of headings a complete capture has. Fewer inputs are still composited.
    pub sample_count: u32,
    /// Crop inputs on a rayon pool.
    pub parallel: bool,
    /// Override rayon worker threads (parallel mode only).
    pub threads: Option<usize>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            crop_width: 320,
            overlap: OverlapPolicy::Disjoint,
            resample_side: None,
            background: None,
            sample_count: 8,
            parallel: false,
            threads: None,
        }
    }
}

impl CompositorConfig {
    /// Edge-to-edge layout with the given crop width.
    pub fn disjoint(crop_width: u32) -> Self {
        Self {
            crop_width,
            ..Self::default()
        }
    }

    /// Feathered layout with the given crop width and overlap.
    pub fn feathered(crop_width: u32, overlap: u32) -> Self {
        Self {
            crop_width,
            overlap: OverlapPolicy::Feathered { overlap },
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document. The result is validated.
    pub fn from_json(json: &str) -> PanoResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PanoError::validation(format!("parse compositor config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> PanoResult<Self> {
        let cfg = Self::read_path(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON configuration file without validating it.
    ///
    /// For callers that layer overrides on top of the file; they must call
    /// [`validate`](Self::validate) once the overrides are applied.
    pub fn read_path(path: impl AsRef<Path>) -> PanoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PanoError::storage(format!("open compositor config '{}'", path.display()), e)
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            PanoError::validation(format!("parse compositor config '{}': {e}", path.display()))
        })
    }

    /// Reject settings that can never produce a panorama.
    pub fn validate(&self) -> PanoResult<()> {
        if self.crop_width == 0 {
            return Err(PanoError::validation("crop_width must be > 0"));
        }
        self.overlap.validate(self.crop_width)?;
        if let Some(side) = self.resample_side
            && side < self.crop_width
        {
            return Err(PanoError::validation(format!(
                "resample_side {side} is narrower than crop_width {}",
                self.crop_width
            )));
        }
        if self.sample_count == 0 {
            return Err(PanoError::validation("sample_count must be > 0"));
        }
        if self.threads == Some(0) {
            return Err(PanoError::validation("threads must be > 0 when set"));
        }
        Ok(())
    }

    /// Background actually used for the canvas, straight RGBA8.
    pub fn background_rgba(&self) -> [u8; 4] {
        self.background
            .unwrap_or_else(|| self.overlap.default_background())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/config.rs"]
mod tests;
