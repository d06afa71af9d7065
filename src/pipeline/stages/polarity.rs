use crate::error::PipelineError;
use image::GrayImage;

/// Mean gray level above which the frame is considered light-background.
const LIGHT_BACKGROUND_MEAN: f32 = 120.0;

/// Convert an RGBA frame to grayscale and normalize its polarity.
///
/// Downstream stages assume handwriting is bright-on-dark. A paper scan
/// (dark ink on a light page) and a canvas drawing (light strokes on a dark
/// canvas) both converge to that convention: if the mean gray level exceeds
/// 120 the whole frame is inverted.
pub fn apply(rgba: &[u8], width: u32, height: u32) -> Result<GrayImage, PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidInput(format!(
            "zero-area frame: {}x{}",
            width, height
        )));
    }

    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(PipelineError::InvalidInput(format!(
            "buffer length {} does not match {}x{} RGBA frame ({} bytes)",
            rgba.len(),
            width,
            height,
            expected
        )));
    }

    let mut gray = Vec::with_capacity(width as usize * height as usize);
    let mut sum = 0u64;

    for px in rgba.chunks_exact(4) {
        // BT.601 luma weights
        let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        let v = luma.round() as u8;
        sum += v as u64;
        gray.push(v);
    }

    let mean = sum as f32 / gray.len() as f32;
    if mean > LIGHT_BACKGROUND_MEAN {
        for v in &mut gray {
            *v = 255 - *v;
        }
    }

    GrayImage::from_raw(width, height, gray)
        .ok_or_else(|| PipelineError::Internal("grayscale buffer construction failed".to_string()))
}
