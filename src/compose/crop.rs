use image::imageops::FilterType;

use crate::{
    assets::directional::DirectionalImage,
    compose::blend::premultiply_rgba8_in_place,
    foundation::core::Heading,
    foundation::error::{PanoError, PanoResult},
};

/// Centered vertical slice of a directional image, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropStrip {
    /// Heading of the source image.
    pub heading: Heading,
    /// Strip width `W` in pixels.
    pub width: u32,
    /// Strip height, the full source side `S`.
    pub height: u32,
    /// Row-major premultiplied RGBA8 pixels.
    pub rgba8_premul: Vec<u8>,
}

/// Left edge of a centered crop: `floor((side - width) / 2)`.
pub fn crop_left_offset(side: u32, width: u32) -> u32 {
    side.saturating_sub(width) / 2
}

/// Cut the centered `crop_width x side` strip out of `image`.
///
/// Images already `side x side` are used as-is. Anything else is stretched to fill the square
/// first; aspect ratio is not preserved.
pub(crate) fn crop_strip(
    image: &DirectionalImage,
    side: u32,
    crop_width: u32,
) -> PanoResult<CropStrip> {
    if crop_width == 0 || crop_width > side {
        return Err(PanoError::geometry(format!(
            "crop width {crop_width} does not fit image side {side}"
        )));
    }

    let left = crop_left_offset(side, crop_width);
    let pixels = image.pixels();
    let strip = if pixels.width() == side && pixels.height() == side {
        pixels.crop_imm(left, 0, crop_width, side)
    } else {
        tracing::debug!(
            heading = image.heading().degrees(),
            from_w = pixels.width(),
            from_h = pixels.height(),
            side,
            "resampling to fill square"
        );
        pixels
            .resize_exact(side, side, FilterType::Triangle)
            .crop_imm(left, 0, crop_width, side)
    };

    let mut rgba8_premul = strip.to_rgba8().into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(CropStrip {
        heading: image.heading(),
        width: crop_width,
        height: side,
        rgba8_premul,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/crop.rs"]
mod tests;
