use serde::Serialize;

use crate::classifier::{Classification, DigitClassifier};
use crate::error::PipelineError;
use crate::pipeline::profile::ProcessingProfile;
use crate::pipeline::stages::{binarize, denoise, filter, label, polarity, split, tile};

/// One recognized digit with its location in the source frame.
#[derive(Debug, Clone, Serialize)]
pub struct DigitDetection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub digit: u8,
    pub confidence: f32,
}

/// Full result for one frame: detections in left-to-right reading order and
/// the digit string they spell.
#[derive(Debug, Clone, Serialize)]
pub struct DigitReadout {
    pub text: String,
    pub detections: Vec<DigitDetection>,
}

impl DigitReadout {
    fn empty() -> Self {
        Self {
            text: String::new(),
            detections: Vec::new(),
        }
    }
}

/// Run the full analysis pipeline over one RGBA frame.
///
/// Stages: polarity normalization, denoising, Otsu binarization, component
/// labeling, region filtering, touching-digit splitting, tile normalization,
/// classification. The frame buffer is only read; nothing is retained after
/// returning. An input with no recognizable digits is a valid terminal state
/// and yields an empty readout, not an error.
pub fn recognize_frame(
    rgba: &[u8],
    width: u32,
    height: u32,
    profile: &ProcessingProfile,
    classifier: &dyn DigitClassifier,
) -> Result<DigitReadout, PipelineError> {
    let gray = polarity::apply(rgba, width, height)?;
    let smoothed = denoise::apply(&gray);

    let threshold = binarize::otsu_level(&smoothed);
    let mask = binarize::apply(&smoothed, threshold);
    tracing::debug!("binarized at threshold {}", threshold);

    let map = label::find_components(&mask);
    let regions = filter::select_regions(&map.components, width, height, profile);
    tracing::debug!(
        "{} of {} components survived filtering",
        regions.len(),
        map.components.len()
    );

    if regions.is_empty() {
        return Ok(DigitReadout::empty());
    }

    let mut detections = Vec::new();

    // Regions are sorted by x and splits come back in x order, so a plain
    // sequential loop preserves reading order.
    for region in &regions {
        let roi = map.extract(region);

        for (offset, glyph) in split::split(roi) {
            let glyph_width = glyph.width();
            let normalized = tile::normalize(&glyph);

            let probabilities = classifier.classify(&normalized)?;
            let classification = Classification::from_probabilities(&probabilities);

            if classification.confidence < profile.confidence_floor {
                tracing::debug!(
                    "dropped digit {} at x={} below confidence floor ({:.2} < {:.2})",
                    classification.digit,
                    region.x + offset,
                    classification.confidence,
                    profile.confidence_floor
                );
                continue;
            }

            detections.push(DigitDetection {
                x: region.x + offset,
                y: region.y,
                width: glyph_width,
                height: region.height,
                digit: classification.digit,
                confidence: classification.confidence,
            });
        }
    }

    let text: String = detections
        .iter()
        .map(|d| char::from(b'0' + d.digit))
        .collect();

    tracing::info!(
        "recognized \"{}\" from {} region(s) in a {}x{} frame",
        text,
        regions.len(),
        width,
        height
    );

    Ok(DigitReadout { text, detections })
}
