use image::GrayImage;

/// 3x3 near-binomial smoothing kernel, weights sum to 16.
const KERNEL: [u32; 9] = [1, 2, 1, 2, 4, 2, 1, 2, 1];

/// Smooth sensor noise before thresholding.
///
/// The kernel is convolved over interior pixels only; border pixels (row/col
/// 0 and max) are copied unchanged rather than padded or reflected. That is
/// a deliberate simplification to avoid edge artifacts, not a bug.
pub fn apply(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = gray.clone();

    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0u32;
            let mut k = 0;
            for dy in 0..3 {
                for dx in 0..3 {
                    let v = gray.get_pixel(x + dx - 1, y + dy - 1).0[0] as u32;
                    acc += v * KERNEL[k];
                    k += 1;
                }
            }
            out.get_pixel_mut(x, y).0[0] = (acc / 16) as u8;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_uniform_image_is_unchanged() {
        let img = GrayImage::from_pixel(8, 8, Luma([200]));
        let result = apply(&img);
        assert!(result.pixels().all(|p| p.0[0] == 200));
    }

    #[test]
    fn test_isolated_speck_is_attenuated() {
        let mut img = GrayImage::from_pixel(9, 9, Luma([0]));
        img.put_pixel(4, 4, Luma([255]));

        let result = apply(&img);

        // Center weight is 4/16, so a lone bright pixel drops sharply
        assert_eq!(result.get_pixel(4, 4).0[0], (255 * 4 / 16) as u8);
        assert!(result.get_pixel(4, 4).0[0] < 255);
    }

    #[test]
    fn test_border_pixels_are_copied_unchanged() {
        let mut img = GrayImage::from_pixel(6, 6, Luma([0]));
        img.put_pixel(0, 0, Luma([255]));
        img.put_pixel(5, 3, Luma([180]));

        let result = apply(&img);

        assert_eq!(result.get_pixel(0, 0).0[0], 255);
        assert_eq!(result.get_pixel(5, 3).0[0], 180);
    }

    #[test]
    fn test_tiny_image_is_returned_as_is() {
        let img = GrayImage::from_pixel(2, 2, Luma([77]));
        let result = apply(&img);
        assert!(result.pixels().all(|p| p.0[0] == 77));
    }
}
