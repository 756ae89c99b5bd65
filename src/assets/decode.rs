use crate::{
    assets::directional::DirectionalImage,
    foundation::core::Heading,
    foundation::error::{PanoError, PanoResult},
};

/// Decode encoded image bytes (PNG, JPEG, ...) into a [`DirectionalImage`].
///
/// Failures surface as [`PanoError::Decode`]; callers are expected to drop undecodable captures
/// before compositing.
pub fn decode_directional(heading: Heading, bytes: &[u8]) -> PanoResult<DirectionalImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PanoError::decode(format!("decode image at {heading}: {e}")))?;
    DirectionalImage::new(heading, dyn_img)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
