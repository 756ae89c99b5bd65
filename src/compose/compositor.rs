use rayon::prelude::*;

use crate::{
    assets::directional::DirectionalImage,
    compose::blend::{apply_column_mask, feather_ramp},
    compose::canvas::PanoramaCanvas,
    compose::config::{CompositorConfig, OverlapPolicy},
    compose::crop::{CropStrip, crop_strip},
    compose::layout::PanoramaLayout,
    foundation::error::{PanoError, PanoResult},
};

/// Composite directional images into one panorama canvas.
///
/// Pipeline:
/// 1. sort by heading (input order is ignored)
/// 2. crop the centered strip of each image, optionally in parallel
/// 3. fold the strips left to right onto the canvas; in feathered mode every strip after the
///    first is faded in over its leading `overlap` columns before it is painted
///
/// The result is pixel-identical for any permutation of `images`.
#[tracing::instrument(skip(images, config), fields(images = images.len(), crop_width = config.crop_width))]
pub fn compose(
    images: &[DirectionalImage],
    config: &CompositorConfig,
) -> PanoResult<PanoramaCanvas> {
    config.validate()?;
    if images.is_empty() {
        return Err(PanoError::EmptyInput);
    }

    let mut sorted: Vec<&DirectionalImage> = images.iter().collect();
    sorted.sort_by_key(|img| img.heading());
    if let Some(pair) = sorted.windows(2).find(|w| w[0].heading() == w[1].heading()) {
        return Err(PanoError::validation(format!(
            "duplicate heading {}",
            pair[0].heading()
        )));
    }

    let side = resolve_side(&sorted, config)?;
    let strip_count = u32::try_from(sorted.len())
        .map_err(|_| PanoError::validation("too many directional images"))?;
    if strip_count < config.sample_count {
        tracing::warn!(
            received = strip_count,
            expected = config.sample_count,
            "compositing partial capture"
        );
    }
    let layout = PanoramaLayout::new(strip_count, config.crop_width, side, config.overlap)?;

    let strips = crop_all(&sorted, side, config)?;
    let ramp = match config.overlap {
        OverlapPolicy::Disjoint => None,
        OverlapPolicy::Feathered { overlap } => Some(feather_ramp(layout.crop_width, overlap)),
    };

    let canvas = PanoramaCanvas::filled(
        layout.canvas_width,
        layout.canvas_height,
        config.background_rgba(),
    )?;
    let canvas = strips
        .into_iter()
        .zip(0u32..)
        .try_fold(canvas, |acc, (mut strip, index)| {
            if let Some(ramp) = ramp.as_deref()
                && index > 0
            {
                apply_column_mask(&mut strip.rgba8_premul, strip.width, ramp)?;
            }
            acc.paint(&strip, layout.left(index))
        })?;

    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        strips = strip_count,
        "panorama composited"
    );
    Ok(canvas)
}

/// Side length `S` every strip is cut from.
fn resolve_side(sorted: &[&DirectionalImage], config: &CompositorConfig) -> PanoResult<u32> {
    let first = sorted[0];
    if let Some(odd) = sorted.iter().find(|img| img.channels() != first.channels()) {
        return Err(PanoError::geometry(format!(
            "image at {} has {} channels, image at {} has {}",
            odd.heading(),
            odd.channels(),
            first.heading(),
            first.channels()
        )));
    }

    if let Some(side) = config.resample_side {
        return Ok(side);
    }

    let side = first.width();
    for img in sorted {
        if img.width() != side || img.height() != side {
            return Err(PanoError::geometry(format!(
                "image at {} is {}x{}, expected {side}x{side}",
                img.heading(),
                img.width(),
                img.height()
            )));
        }
    }
    Ok(side)
}

fn crop_all(
    sorted: &[&DirectionalImage],
    side: u32,
    config: &CompositorConfig,
) -> PanoResult<Vec<CropStrip>> {
    if !config.parallel {
        return sorted
            .iter()
            .map(|img| crop_strip(img, side, config.crop_width))
            .collect();
    }

    let pool = build_thread_pool(config.threads)?;
    pool.install(|| {
        sorted
            .par_iter()
            .map(|img| crop_strip(img, side, config.crop_width))
            .collect()
    })
}

fn build_thread_pool(threads: Option<usize>) -> PanoResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
