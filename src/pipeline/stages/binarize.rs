use image::{GrayImage, Luma};

/// Compute the global Otsu threshold of a grayscale image.
///
/// Scans all 256 candidate thresholds and keeps the one with the strictly
/// greatest between-class variance; on ties the earlier threshold wins.
pub fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u32; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = gray.width() as u64 * gray.height() as u64;

    let mut sum = 0u64;
    for (i, &count) in histogram.iter().enumerate() {
        sum += i as u64 * count as u64;
    }

    let mut sum_background = 0u64;
    let mut weight_background = 0u64;
    let mut max_variance = 0.0f64;
    let mut threshold = 0u8;

    for (i, &count) in histogram.iter().enumerate() {
        weight_background += count as u64;
        if weight_background == 0 {
            continue;
        }

        let weight_foreground = total - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += i as u64 * count as u64;

        let mean_background = sum_background as f64 / weight_background as f64;
        let mean_foreground = (sum - sum_background) as f64 / weight_foreground as f64;

        let variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if variance > max_variance {
            max_variance = variance;
            threshold = i as u8;
        }
    }

    threshold
}

/// Binarize against a threshold: `v > threshold` becomes foreground (255).
pub fn apply(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_is_strictly_binary() {
        let img = GrayImage::from_fn(50, 50, |x, _| Luma([(x * 5).min(255) as u8]));

        let threshold = otsu_level(&img);
        let mask = apply(&img, threshold);

        for pixel in mask.pixels() {
            assert!(
                pixel.0[0] == 0 || pixel.0[0] == 255,
                "Expected binary pixel, got {}",
                pixel.0[0]
            );
        }
    }

    #[test]
    fn test_bimodal_histogram_splits_the_modes() {
        // 500 pixels at 50, 500 pixels at 200
        let img = GrayImage::from_fn(25, 40, |_, y| if y < 20 { Luma([50]) } else { Luma([200]) });

        let threshold = otsu_level(&img);

        assert!(
            threshold >= 50 && threshold < 200,
            "threshold {} should separate the modes",
            threshold
        );

        let mask = apply(&img, threshold);
        assert_eq!(mask.get_pixel(0, 0).0[0], 0);
        assert_eq!(mask.get_pixel(0, 39).0[0], 255);
    }

    #[test]
    fn test_single_mode_stops_at_zero() {
        // With one occupied bin the foreground class empties immediately and
        // the scan stops without ever updating the threshold.
        let img = GrayImage::from_pixel(10, 10, Luma([128]));
        assert_eq!(otsu_level(&img), 0);
    }

    #[test]
    fn test_all_black_yields_empty_mask() {
        let img = GrayImage::from_pixel(10, 10, Luma([0]));

        let threshold = otsu_level(&img);
        let mask = apply(&img, threshold);

        assert!(mask.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let img = GrayImage::from_pixel(4, 4, Luma([100]));
        let mask = apply(&img, 100);
        assert!(mask.pixels().all(|p| p.0[0] == 0));

        let mask = apply(&img, 99);
        assert!(mask.pixels().all(|p| p.0[0] == 255));
    }
}
