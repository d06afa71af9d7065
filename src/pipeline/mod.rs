//! Image-analysis pipeline: RGBA frame -> ordered digit readout
//!
//! One consolidated, parameterized implementation of the capture-to-tile
//! analysis, stage by stage under [`stages`], tuned through a
//! [`ProcessingProfile`].

pub mod profile;
pub mod recognizer;
pub mod stages;

pub use profile::{Preset, ProcessingProfile};
pub use recognizer::{recognize_frame, DigitDetection, DigitReadout};
