use image::DynamicImage;

use crate::foundation::core::Heading;
use crate::foundation::error::{PanoError, PanoResult};

/// One photograph captured at a known heading.
///
/// Pixels are always 8-bit RGB or RGBA; other color types are converted on construction so the
/// compositor only ever sees 3 or 4 channels.
#[derive(Clone, Debug)]
pub struct DirectionalImage {
    heading: Heading,
    pixels: DynamicImage,
}

impl DirectionalImage {
    /// Wrap a decoded raster, normalizing it to RGB8 or RGBA8.
    pub fn new(heading: Heading, pixels: DynamicImage) -> PanoResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(PanoError::validation(format!(
                "image at {heading} has zero area ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        let pixels = match pixels {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => pixels,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Ok(Self { heading, pixels })
    }

    /// Heading the image was captured at.
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Channel count, 3 or 4.
    pub fn channels(&self) -> u8 {
        self.pixels.color().channel_count()
    }

    /// Borrow the normalized raster.
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/directional.rs"]
mod tests;
