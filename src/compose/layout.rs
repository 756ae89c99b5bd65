use crate::{
    compose::config::OverlapPolicy,
    foundation::error::{PanoError, PanoResult},
};

/// Closed-form placement of `strip_count` strips on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanoramaLayout {
    /// Number of strips actually composited.
    pub strip_count: u32,
    /// Strip width `W`.
    pub crop_width: u32,
    /// Overlap `O` between neighbours (0 when disjoint).
    pub overlap: u32,
    /// Horizontal advance per strip, `W - O`.
    pub effective_width: u32,
    /// `effective_width * N + O`.
    pub canvas_width: u32,
    /// Source side `S`.
    pub canvas_height: u32,
}

impl PanoramaLayout {
    /// Compute the layout, validating the policy against `crop_width`.
    pub fn new(
        strip_count: u32,
        crop_width: u32,
        side: u32,
        policy: OverlapPolicy,
    ) -> PanoResult<Self> {
        if strip_count == 0 {
            return Err(PanoError::EmptyInput);
        }
        if crop_width == 0 || crop_width > side {
            return Err(PanoError::geometry(format!(
                "crop width {crop_width} does not fit image side {side}"
            )));
        }
        policy.validate(crop_width)?;

        let overlap = policy.overlap();
        let effective_width = crop_width - overlap;
        let canvas_width = effective_width
            .checked_mul(strip_count)
            .and_then(|w| w.checked_add(overlap))
            .ok_or_else(|| PanoError::validation("canvas width overflows u32"))?;

        Ok(Self {
            strip_count,
            crop_width,
            overlap,
            effective_width,
            canvas_width,
            canvas_height: side,
        })
    }

    /// Left column of the strip at sorted position `index`.
    pub fn left(&self, index: u32) -> u32 {
        index * self.effective_width
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod tests;
