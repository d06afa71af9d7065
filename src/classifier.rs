use crate::error::PipelineError;
use crate::pipeline::stages::tile::Tile;

/// One classified tile
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    /// Recognized digit, 0-9
    pub digit: u8,
    /// Probability of that digit, 0-1
    pub confidence: f32,
}

impl Classification {
    /// Argmax over the per-class probabilities; the first maximum wins.
    pub fn from_probabilities(probabilities: &[f32; 10]) -> Self {
        let mut digit = 0u8;
        let mut confidence = probabilities[0];
        for (i, &p) in probabilities.iter().enumerate().skip(1) {
            if p > confidence {
                confidence = p;
                digit = i as u8;
            }
        }
        Self { digit, confidence }
    }
}

/// Trait that all digit classifier backends must implement
pub trait DigitClassifier: Send + Sync {
    /// Returns the backend identifier (e.g. "rten")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the backend
    fn description(&self) -> &'static str;

    /// Score one normalized tile; returns probabilities for digits 0-9
    fn classify(&self, tile: &Tile) -> Result<[f32; 10], PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_the_peak() {
        let mut probs = [0.02f32; 10];
        probs[7] = 0.82;

        let c = Classification::from_probabilities(&probs);
        assert_eq!(c.digit, 7);
        assert!((c.confidence - 0.82).abs() < 1e-6);
    }

    #[test]
    fn test_first_maximum_wins_on_tie() {
        let mut probs = [0.0f32; 10];
        probs[3] = 0.5;
        probs[8] = 0.5;

        let c = Classification::from_probabilities(&probs);
        assert_eq!(c.digit, 3);
    }
}
