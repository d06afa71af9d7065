//! rten classifier backend
//!
//! Pure Rust inference over a digit model in the .rten format. The model
//! takes a 1x1x28x28 float tensor and produces 10 logits, one per digit.

use crate::classifier::DigitClassifier;
use crate::config::Config;
use crate::error::PipelineError;
use crate::pipeline::stages::tile::{Tile, TILE_SIZE};
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use std::path::PathBuf;

/// File the model is looked up under when no explicit path is configured.
const MODEL_FILE_NAME: &str = "digit-classifier.rten";

/// Digit classifier wrapping an rten model
pub struct RtenClassifier {
    model: Model,
}

impl RtenClassifier {
    /// Load the model from the configured path, or from the user data
    /// directory (`<data_dir>/digitscan/digit-classifier.rten`).
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let path = config
            .model_path
            .clone()
            .or_else(default_model_path)
            .ok_or_else(|| {
                PipelineError::ClassifierUnavailable(
                    "no model path configured and no user data directory found".to_string(),
                )
            })?;

        if !path.exists() {
            return Err(PipelineError::ClassifierUnavailable(format!(
                "digit model not found at {}. Set --model-path or DIGITSCAN_MODEL_PATH",
                path.display()
            )));
        }

        let model = Model::load_file(&path).map_err(|e| {
            PipelineError::InitializationError(format!(
                "Failed to load digit model {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!("rten classifier initialized from {}", path.display());

        Ok(Self { model })
    }
}

impl DigitClassifier for RtenClassifier {
    fn name(&self) -> &'static str {
        "rten"
    }

    fn description(&self) -> &'static str {
        "Pure Rust digit classifier - no system dependencies required"
    }

    fn classify(&self, tile: &Tile) -> Result<[f32; 10], PipelineError> {
        let size = TILE_SIZE as usize;
        let mut input = NdTensor::<f32, 4>::zeros([1, 1, size, size]);
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                input[[0, 0, y as usize, x as usize]] = tile.get(x, y);
            }
        }

        let input: Tensor<f32> = input.into();
        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| PipelineError::ProcessingError(format!("Model run failed: {}", e)))?;

        let logits: Tensor<f32> = output.try_into().map_err(|_| {
            PipelineError::ProcessingError("Unexpected model output type".to_string())
        })?;

        let values = logits.to_vec();
        if values.len() < 10 {
            return Err(PipelineError::ProcessingError(format!(
                "Model produced {} outputs, expected 10",
                values.len()
            )));
        }

        Ok(softmax(&values[..10]))
    }
}

fn default_model_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("digitscan").join(MODEL_FILE_NAME))
}

fn softmax(logits: &[f32]) -> [f32; 10] {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut probs = [0.0f32; 10];
    let mut sum = 0.0f32;
    for (p, &l) in probs.iter_mut().zip(logits) {
        *p = (l - max).exp();
        sum += *p;
    }
    for p in &mut probs {
        *p /= sum;
    }
    probs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_is_a_distribution() {
        let probs = softmax(&[1.0, 2.0, 3.0, 0.0, -1.0, 0.5, 0.0, 0.0, 0.0, 0.0]);

        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|&p| p > 0.0));

        // Largest logit keeps the largest probability
        let max_idx = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(max_idx, 2);
    }

    #[test]
    fn test_softmax_survives_large_logits() {
        let probs = softmax(&[1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((probs[0] - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| p.is_finite()));
    }
}
