use crate::foundation::error::{PanoError, PanoResult};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels: `src + dst * (1 - src.a)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    std::array::from_fn(|i| add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv)))
}

/// Per-column weights of the feather mask for a strip of `width` columns.
///
/// Columns `[0, overlap)` rise linearly as `col / overlap`; the rest are `1.0`.
pub fn feather_ramp(width: u32, overlap: u32) -> Vec<f32> {
    (0..width)
        .map(|col| {
            if col < overlap {
                col as f32 / overlap as f32
            } else {
                1.0
            }
        })
        .collect()
}

/// Multiply every pixel of a premultiplied RGBA8 buffer by its column weight.
///
/// Scaling all four premultiplied channels is the same as scaling straight alpha, so an existing
/// alpha channel is attenuated rather than replaced.
pub(crate) fn apply_column_mask(
    rgba8_premul: &mut [u8],
    width: u32,
    weights: &[f32],
) -> PanoResult<()> {
    let row_len = (width as usize) * 4;
    if weights.len() != width as usize
        || row_len == 0
        || !rgba8_premul.len().is_multiple_of(row_len)
    {
        return Err(PanoError::geometry(
            "column mask expects one weight per column of a whole-row rgba8 buffer",
        ));
    }

    for row in rgba8_premul.chunks_exact_mut(row_len) {
        for (px, &w) in row.chunks_exact_mut(4).zip(weights) {
            if w >= 1.0 {
                continue;
            }
            let w = w.clamp(0.0, 1.0);
            for c in px.iter_mut() {
                *c = (f32::from(*c) * w).round() as u8;
            }
        }
    }
    Ok(())
}

/// Paint `src` (`src_width` columns) over `dst` (`dst_width` columns) starting at column `left`.
///
/// Both buffers are premultiplied RGBA8 with the same height.
pub(crate) fn over_rows_at(
    dst: &mut [u8],
    dst_width: u32,
    src: &[u8],
    src_width: u32,
    left: u32,
) -> PanoResult<()> {
    let dst_row = (dst_width as usize) * 4;
    let src_row = (src_width as usize) * 4;
    if src_row == 0 || dst_row == 0 {
        return Err(PanoError::geometry("cannot paint zero-width buffers"));
    }
    if left.checked_add(src_width).is_none_or(|right| right > dst_width) {
        return Err(PanoError::geometry(format!(
            "strip at column {left} with width {src_width} overruns canvas width {dst_width}"
        )));
    }
    if dst.len() / dst_row != src.len() / src_row
        || !dst.len().is_multiple_of(dst_row)
        || !src.len().is_multiple_of(src_row)
    {
        return Err(PanoError::geometry(
            "over_rows_at expects equal-height rgba8 buffers",
        ));
    }

    let offset = (left as usize) * 4;
    for (d_row, s_row) in dst.chunks_exact_mut(dst_row).zip(src.chunks_exact(src_row)) {
        let d_span = &mut d_row[offset..offset + src_row];
        for (d, s) in d_span.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255(u16::from(*c), a);
        }
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
