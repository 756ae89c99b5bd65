use std::io::Cursor;

use crate::{
    compose::blend::{over_rows_at, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    compose::crop::CropStrip,
    foundation::error::{PanoError, PanoResult},
};

/// The composited panorama as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanoramaCanvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl PanoramaCanvas {
    /// Canvas of the given size filled with a straight-alpha RGBA8 background.
    pub(crate) fn filled(width: u32, height: u32, background: [u8; 4]) -> PanoResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PanoError::validation("canvas buffer size overflow"))?;

        let mut px = background;
        premultiply_rgba8_in_place(&mut px);
        let data = px.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Paint `strip` source-over at column `left`, returning the updated canvas.
    pub(crate) fn paint(mut self, strip: &CropStrip, left: u32) -> PanoResult<Self> {
        if strip.height != self.height {
            return Err(PanoError::geometry(format!(
                "strip at {} is {}px tall, canvas is {}px",
                strip.heading, strip.height, self.height
            )));
        }
        over_rows_at(
            &mut self.data,
            self.width,
            &strip.rgba8_premul,
            strip.width,
            left,
        )?;
        Ok(self)
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// `true` when every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }

    /// Convert to a straight-alpha [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> PanoResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| PanoError::encode("canvas buffer does not match its dimensions"))
    }

    /// Encode as PNG: RGB when fully opaque, RGBA otherwise.
    pub fn encode_png(&self) -> PanoResult<Vec<u8>> {
        let rgba = self.to_rgba_image()?;
        let img = if self.is_opaque() {
            image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(rgba).to_rgb8())
        } else {
            image::DynamicImage::ImageRgba8(rgba)
        };

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| PanoError::encode(format!("write png: {e}")))?;
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
