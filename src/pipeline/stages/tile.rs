use image::{imageops, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

/// Classifier input edge length.
pub const TILE_SIZE: u32 = 28;

/// Margin factor applied around the glyph before resizing, mirroring the
/// framing convention of standard digit datasets.
const PAD_FACTOR: f32 = 0.45;

/// Fixed 28x28 float tile with values in [0, 1], ready for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    values: Vec<f32>,
}

impl Tile {
    fn from_gray(img: &GrayImage) -> Self {
        debug_assert_eq!(img.dimensions(), (TILE_SIZE, TILE_SIZE));
        Self {
            values: img.pixels().map(|p| p.0[0] as f32 / 255.0).collect(),
        }
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y * TILE_SIZE + x) as usize]
    }

    /// Row-major values, `TILE_SIZE * TILE_SIZE` long.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Intensity-weighted center of mass, or `None` for an empty tile.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        let (m00, m10, m01) = moments(&self.values);
        if m00 == 0.0 {
            None
        } else {
            Some((m10 / m00, m01 / m00))
        }
    }
}

fn moments(values: &[f32]) -> (f32, f32, f32) {
    let mut m00 = 0.0;
    let mut m10 = 0.0;
    let mut m01 = 0.0;
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            let v = values[(y * TILE_SIZE + x) as usize];
            m00 += v;
            m10 += x as f32 * v;
            m01 += y as f32 * v;
        }
    }
    (m00, m10, m01)
}

/// Turn one region's mask ROI of arbitrary size into a normalized tile.
///
/// Steps: re-binarize, dilate (3x3 max filter thickens thin strokes toward
/// what digit classifiers were trained on), pad proportionally, resize to
/// 28x28 with nearest-neighbor (deterministic, introduces no intermediate
/// gray values), then shift so the centroid sits on the tile center.
pub fn normalize(roi: &GrayImage) -> Tile {
    // Upstream resampling can leave sub-255 values in the ROI
    let binary = GrayImage::from_fn(roi.width(), roi.height(), |x, y| {
        if roi.get_pixel(x, y).0[0] >= 128 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    let dilated = dilate(&binary, Norm::LInf, 1);

    let (w, h) = dilated.dimensions();
    let pad = (w.max(h) as f32 * PAD_FACTOR).floor() as u32;
    let mut canvas = GrayImage::new(w + 2 * pad, h + 2 * pad);
    imageops::replace(&mut canvas, &dilated, pad as i64, pad as i64);

    let scaled = imageops::resize(&canvas, TILE_SIZE, TILE_SIZE, imageops::FilterType::Nearest);

    let recentered = recenter(&scaled);
    Tile::from_gray(&recentered)
}

/// Translate the tile so its center of mass lands on the tile center,
/// rounded to whole pixels. An empty tile is returned unshifted.
fn recenter(tile: &GrayImage) -> GrayImage {
    let values: Vec<f32> = tile.pixels().map(|p| p.0[0] as f32 / 255.0).collect();
    let (m00, m10, m01) = moments(&values);
    if m00 == 0.0 {
        return tile.clone();
    }

    let center = (TILE_SIZE / 2) as f32;
    let dx = (center - m10 / m00).round() as i32;
    let dy = (center - m01 / m00).round() as i32;

    GrayImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| {
        let sx = x as i32 - dx;
        let sy = y as i32 - dy;
        if sx >= 0 && sx < TILE_SIZE as i32 && sy >= 0 && sy < TILE_SIZE as i32 {
            *tile.get_pixel(sx as u32, sy as u32)
        } else {
            Luma([0u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_roi(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([255]))
    }

    #[test]
    fn test_tile_is_always_28x28_in_unit_range() {
        for (w, h) in [(3, 40), (40, 3), (1, 1), (200, 150), (28, 28)] {
            let tile = normalize(&solid_roi(w, h));
            assert_eq!(tile.values().len(), (TILE_SIZE * TILE_SIZE) as usize);
            assert!(tile.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_nonzero_mass_is_centered() {
        // Glyph mass far from center before normalization
        let mut roi = GrayImage::new(30, 30);
        for y in 0..8 {
            for x in 0..8 {
                roi.put_pixel(x, y, Luma([255]));
            }
        }

        let tile = normalize(&roi);
        let (cx, cy) = tile.centroid().expect("tile has mass");

        assert!((cx - 14.0).abs() <= 1.0, "cx = {}", cx);
        assert!((cy - 14.0).abs() <= 1.0, "cy = {}", cy);
    }

    #[test]
    fn test_empty_roi_yields_empty_tile() {
        let roi = GrayImage::new(20, 20);
        let tile = normalize(&roi);

        assert!(tile.centroid().is_none());
        assert!(tile.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_faint_roi_values_are_rebinarized() {
        // Sub-255 foreground from upstream resampling still counts
        let roi = GrayImage::from_pixel(10, 10, Luma([140]));
        let tile = normalize(&roi);

        assert!(tile.centroid().is_some());
        assert!(tile.values().iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_sub_threshold_roi_is_background() {
        let roi = GrayImage::from_pixel(10, 10, Luma([100]));
        let tile = normalize(&roi);
        assert!(tile.centroid().is_none());
    }

    #[test]
    fn test_aspect_ratio_is_preserved_by_padding() {
        // A tall thin bar must stay tall and thin, not fill the tile
        let tile = normalize(&solid_roi(4, 40));

        let mut occupied_cols = 0;
        for x in 0..TILE_SIZE {
            if (0..TILE_SIZE).any(|y| tile.get(x, y) > 0.0) {
                occupied_cols += 1;
            }
        }

        assert!(occupied_cols < TILE_SIZE / 2, "cols = {}", occupied_cols);
    }
}
