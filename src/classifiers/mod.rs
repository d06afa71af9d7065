//! Digit classifier backends
//!
//! Implementations of the DigitClassifier trait, conditionally compiled
//! based on feature flags. The pipeline never falls back to a guess: if no
//! backend is available, construction fails and the caller can tell "no
//! digits found" apart from "could not classify".

#[cfg(feature = "classifier-rten")]
pub mod rten;

use crate::classifier::DigitClassifier;
use crate::config::Config;
use crate::error::PipelineError;
use std::sync::Arc;

/// Build the configured classifier backend.
#[allow(unused_variables, unreachable_code)]
pub fn create_classifier(config: &Config) -> Result<Arc<dyn DigitClassifier>, PipelineError> {
    #[cfg(feature = "classifier-rten")]
    {
        tracing::info!("Initializing rten classifier...");
        let classifier = rten::RtenClassifier::new(config)?;
        return Ok(Arc::new(classifier));
    }

    Err(PipelineError::ClassifierUnavailable(
        "no classifier backend compiled in. Build with --features classifier-rten".to_string(),
    ))
}
