use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use super::*;
use crate::foundation::core::Heading;

/// Square RGB image: red = column, green = row, blue = `tag`.
fn coded(side: u32, heading: f64, tag: u8) -> DirectionalImage {
    let img = RgbImage::from_fn(side, side, |x, y| Rgb([x as u8, y as u8, tag]));
    DirectionalImage::new(Heading::new(heading).unwrap(), DynamicImage::ImageRgb8(img)).unwrap()
}

fn solid(side: u32, heading: f64, rgb: [u8; 3]) -> DirectionalImage {
    let img = RgbImage::from_pixel(side, side, Rgb(rgb));
    DirectionalImage::new(Heading::new(heading).unwrap(), DynamicImage::ImageRgb8(img)).unwrap()
}

#[test]
fn empty_input_is_rejected() {
    let err = compose(&[], &CompositorConfig::disjoint(4)).unwrap_err();
    assert!(matches!(err, PanoError::EmptyInput));
}

#[test]
fn invalid_overlap_is_rejected_before_work() {
    let images = vec![coded(8, 0.0, 0)];
    let err = compose(&images, &CompositorConfig::feathered(4, 4)).unwrap_err();
    assert!(matches!(
        err,
        PanoError::InvalidOverlap {
            overlap: 4,
            crop_width: 4
        }
    ));
}

#[test]
fn mismatched_side_is_inconsistent_geometry() {
    let images = vec![coded(8, 0.0, 0), coded(10, 45.0, 1)];
    let err = compose(&images, &CompositorConfig::disjoint(4)).unwrap_err();
    assert!(matches!(err, PanoError::InconsistentGeometry(_)));
}

#[test]
fn mismatched_channels_is_inconsistent_geometry() {
    let rgba = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
    let images = vec![
        coded(8, 0.0, 0),
        DirectionalImage::new(Heading::new(90.0).unwrap(), DynamicImage::ImageRgba8(rgba))
            .unwrap(),
    ];
    let err = compose(&images, &CompositorConfig::disjoint(4)).unwrap_err();
    assert!(matches!(err, PanoError::InconsistentGeometry(_)));
}

#[test]
fn non_square_without_resample_is_inconsistent_geometry() {
    let img = RgbImage::from_pixel(8, 6, Rgb([0, 0, 0]));
    let images = vec![
        DirectionalImage::new(Heading::new(0.0).unwrap(), DynamicImage::ImageRgb8(img)).unwrap(),
    ];
    let err = compose(&images, &CompositorConfig::disjoint(4)).unwrap_err();
    assert!(matches!(err, PanoError::InconsistentGeometry(_)));
}

#[test]
fn resample_side_accepts_mixed_sizes() {
    let images = vec![solid(8, 0.0, [10, 10, 10]), solid(12, 90.0, [20, 20, 20])];
    let cfg = CompositorConfig {
        resample_side: Some(8),
        ..CompositorConfig::disjoint(4)
    };
    let canvas = compose(&images, &cfg).unwrap();
    assert_eq!((canvas.width, canvas.height), (8, 8));
    assert_eq!(canvas.pixel(0, 0).unwrap()[3], 255);
    assert!(canvas.pixel(5, 3).unwrap()[0].abs_diff(20) <= 1);
}

#[test]
fn duplicate_heading_is_rejected() {
    let images = vec![coded(8, 45.0, 0), coded(8, 45.0, 1)];
    let err = compose(&images, &CompositorConfig::disjoint(4)).unwrap_err();
    assert!(matches!(err, PanoError::Validation(_)));
}

#[test]
fn signed_zero_headings_are_duplicates() {
    let images = vec![solid(8, 0.0, [10, 0, 0]), solid(8, -0.0, [200, 0, 0])];
    let err = compose(&images, &CompositorConfig::disjoint(4)).unwrap_err();
    assert!(matches!(err, PanoError::Validation(_)), "{err:?}");
}

#[test]
fn single_image_equals_its_crop() {
    let images = vec![coded(10, 180.0, 3)];
    for cfg in [
        CompositorConfig::disjoint(4),
        CompositorConfig::feathered(4, 2),
    ] {
        let canvas = compose(&images, &cfg).unwrap();
        let strip = crop_strip(&images[0], 10, 4).unwrap();
        assert_eq!((canvas.width, canvas.height), (4, 10));
        assert_eq!(canvas.data, strip.rgba8_premul);
    }
}

#[test]
fn disjoint_regions_match_source_crops_in_heading_order() {
    let headings = [0.0, 90.0, 180.0, 270.0];
    let images: Vec<_> = headings
        .iter()
        .zip(0u8..)
        .map(|(&h, tag)| coded(10, h, tag))
        .collect();

    let canvas = compose(&images, &CompositorConfig::disjoint(4)).unwrap();
    assert_eq!((canvas.width, canvas.height), (16, 10));
    for (i, img) in images.iter().enumerate() {
        let strip = crop_strip(img, 10, 4).unwrap();
        for y in 0..10u32 {
            for x in 0..4u32 {
                let got = canvas.pixel(i as u32 * 4 + x, y).unwrap();
                let idx = ((y * 4 + x) * 4) as usize;
                assert_eq!(&got, &strip.rgba8_premul[idx..idx + 4]);
            }
        }
    }
}

#[test]
fn any_input_order_gives_identical_canvas() {
    let mut images: Vec<_> = (0..8u8)
        .map(|i| coded(12, f64::from(i) * 45.0, i * 30))
        .collect();
    let cfg = CompositorConfig::feathered(6, 2);
    let reference = compose(&images, &cfg).unwrap();

    images.reverse();
    assert_eq!(compose(&images, &cfg).unwrap(), reference);

    images.swap(1, 5);
    images.swap(0, 3);
    assert_eq!(compose(&images, &cfg).unwrap(), reference);
}

#[test]
fn feathered_seam_blends_linearly() {
    // W=8, O=4: second strip starts at column 4 and is fully opaque from column 8.
    let images = vec![solid(8, 0.0, [255, 0, 0]), solid(8, 45.0, [0, 0, 255])];
    let canvas = compose(&images, &CompositorConfig::feathered(8, 4)).unwrap();
    assert_eq!((canvas.width, canvas.height), (12, 8));

    assert_eq!(canvas.pixel(3, 0), Some([255, 0, 0, 255]));
    // Outer edge of the seam: the later strip is fully transparent.
    assert_eq!(canvas.pixel(4, 0), Some([255, 0, 0, 255]));
    // Middle of the seam: ~50/50.
    let mid = canvas.pixel(6, 5).unwrap();
    assert!(mid[0].abs_diff(127) <= 1, "{mid:?}");
    assert!(mid[2].abs_diff(128) <= 1, "{mid:?}");
    assert_eq!(mid[3], 255);
    // Past the seam only the later strip is visible.
    assert_eq!(canvas.pixel(8, 0), Some([0, 0, 255, 255]));
    assert_eq!(canvas.pixel(11, 7), Some([0, 0, 255, 255]));
    assert!(canvas.is_opaque());
}

#[test]
fn feathered_first_strip_is_unmasked() {
    let images = vec![solid(8, 10.0, [0, 255, 0]), solid(8, 200.0, [0, 0, 255])];
    let canvas = compose(&images, &CompositorConfig::feathered(8, 4)).unwrap();
    assert_eq!(canvas.pixel(0, 0), Some([0, 255, 0, 255]));
}

#[test]
fn partial_capture_shrinks_canvas() {
    let images = vec![coded(10, 0.0, 0), coded(10, 135.0, 1), coded(10, 270.0, 2)];
    let canvas = compose(&images, &CompositorConfig::feathered(6, 2)).unwrap();
    assert_eq!(canvas.width, 4 * 3 + 2);
}

#[test]
fn parallel_crop_matches_sequential() {
    let images: Vec<_> = (0..8u8)
        .map(|i| coded(16, f64::from(i) * 45.0, i))
        .collect();
    let seq = CompositorConfig::feathered(8, 3);
    let par = CompositorConfig {
        parallel: true,
        threads: Some(2),
        ..seq.clone()
    };
    assert_eq!(compose(&images, &seq).unwrap(), compose(&images, &par).unwrap());
}

#[test]
fn disjoint_background_is_white_and_fully_covered() {
    let images = vec![coded(10, 0.0, 0), coded(10, 180.0, 1)];
    let canvas = compose(&images, &CompositorConfig::disjoint(5)).unwrap();
    assert_eq!(canvas.width, 10);
    assert!(canvas.is_opaque());
}
