use image::GrayImage;

/// Width/height ratio above which a region is assumed to hold two fused
/// digits (e.g. "1" written against "1").
const SPLIT_ASPECT: f32 = 1.3;

/// The split column is searched in the central band [0.3*w, 0.7*w).
const BAND_START: f32 = 0.3;
const BAND_END: f32 = 0.7;

/// Sub-regions narrower than this are degenerate and silently dropped.
const MIN_SUB_WIDTH: u32 = 5;

/// Split a region ROI into independently classifiable glyphs.
///
/// Returns `(x offset within the ROI, sub-ROI)` pairs in left-to-right
/// order. A region that does not look fused comes back unchanged as a
/// single entry.
pub fn split(roi: GrayImage) -> Vec<(u32, GrayImage)> {
    let (width, height) = roi.dimensions();

    if width as f32 <= height as f32 * SPLIT_ASPECT {
        return vec![(0, roi)];
    }

    let split_x = match split_column(&roi) {
        Some(x) => x,
        None => return vec![(0, roi)],
    };

    let mut parts = Vec::with_capacity(2);
    if split_x >= MIN_SUB_WIDTH {
        parts.push((0, crop(&roi, 0, split_x)));
    }
    if width - split_x >= MIN_SUB_WIDTH {
        parts.push((split_x, crop(&roi, split_x, width - split_x)));
    }

    if parts.is_empty() {
        // Both halves degenerate; keep the original rather than lose the glyph
        return vec![(0, roi)];
    }

    parts
}

/// Column with the minimum vertical projection inside the central band;
/// the first minimum wins on ties.
fn split_column(roi: &GrayImage) -> Option<u32> {
    let (width, height) = roi.dimensions();

    let band_start = (width as f32 * BAND_START).floor() as u32;
    let band_end = (width as f32 * BAND_END).floor() as u32;
    if band_start >= band_end {
        return None;
    }

    let mut best_x = band_start;
    let mut best_count = u32::MAX;

    for x in band_start..band_end {
        let mut count = 0;
        for y in 0..height {
            if roi.get_pixel(x, y).0[0] == 255 {
                count += 1;
            }
        }
        if count < best_count {
            best_count = count;
            best_x = x;
        }
    }

    Some(best_x)
}

fn crop(roi: &GrayImage, x: u32, width: u32) -> GrayImage {
    GrayImage::from_fn(width, roi.height(), |dx, y| *roi.get_pixel(x + dx, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Two solid blocks joined by a one-pixel bridge at mid height.
    fn fused_pair() -> GrayImage {
        let mut roi = GrayImage::new(20, 10);
        for y in 0..10 {
            for x in 0..8 {
                roi.put_pixel(x, y, Luma([255]));
            }
            for x in 12..20 {
                roi.put_pixel(x, y, Luma([255]));
            }
        }
        for x in 8..12 {
            roi.put_pixel(x, 5, Luma([255]));
        }
        roi
    }

    #[test]
    fn test_tall_region_is_not_split() {
        let mut roi = GrayImage::new(10, 20);
        for y in 0..20 {
            for x in 0..10 {
                roi.put_pixel(x, y, Luma([255]));
            }
        }

        let parts = split(roi);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].0, 0);
    }

    #[test]
    fn test_trigger_requires_wide_aspect() {
        // 13x10: exactly at the 1.3 boundary, must not trigger
        let roi = GrayImage::from_pixel(13, 10, Luma([255]));
        assert_eq!(split(roi).len(), 1);

        // 17x10: over the boundary; uniform projection splits at the band
        // start (first minimum wins) and both halves clear the width floor
        let roi = GrayImage::from_pixel(17, 10, Luma([255]));
        let parts = split(roi);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].0, 5);
    }

    #[test]
    fn test_fused_pair_splits_at_the_bridge() {
        let parts = split(fused_pair());

        assert_eq!(parts.len(), 2);
        let (left_off, left) = &parts[0];
        let (right_off, right) = &parts[1];

        // First projection minimum in the band [6, 14) is the bridge at x=8
        assert_eq!(*left_off, 0);
        assert_eq!(*right_off, 8);
        assert_eq!(left.width(), 8);
        assert_eq!(right.width(), 12);
    }

    #[test]
    fn test_sub_widths_sum_to_original() {
        let roi = fused_pair();
        let original = roi.width();

        let parts = split(roi);
        let total: u32 = parts.iter().map(|(_, p)| p.width()).sum();
        assert_eq!(total, original);
    }

    #[test]
    fn test_degenerate_half_is_dropped() {
        // 14x4 bar: triggers (14 > 5.2), band [4.2 -> 4, 9.8 -> 9); make
        // column 4 empty so the left half is 4 wide and degenerate.
        let mut roi = GrayImage::from_pixel(14, 4, Luma([255]));
        for y in 0..4 {
            roi.put_pixel(4, y, Luma([0]));
        }

        let parts = split(roi);

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].0, 4);
        assert_eq!(parts[0].1.width(), 10);
    }

    #[test]
    fn test_heights_are_preserved() {
        for (_, part) in split(fused_pair()) {
            assert_eq!(part.height(), 10);
        }
    }
}
