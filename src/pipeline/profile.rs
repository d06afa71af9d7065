use serde::{Deserialize, Serialize};

/// Processing preset names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Live camera or canvas frames: noisier input, stricter thresholds
    Interactive,
    /// One-off uploads and scans: cleaner input, looser thresholds
    #[default]
    SingleShot,
}

impl Preset {
    /// Parse from a CLI flag or request field
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interactive" => Some(Self::Interactive),
            "single-shot" | "single_shot" => Some(Self::SingleShot),
            _ => None,
        }
    }

    /// Get the preset name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::SingleShot => "single-shot",
        }
    }

    /// The tunables this preset stands for
    pub fn profile(&self) -> ProcessingProfile {
        match self {
            Self::Interactive => ProcessingProfile::interactive(),
            Self::SingleShot => ProcessingProfile::single_shot(),
        }
    }
}

/// Every tunable of the analysis pipeline in one place.
///
/// These were historically scattered magic numbers toggled by an
/// "is realtime" boolean; both presets below are configuration defaults, and
/// every field can be overridden from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingProfile {
    /// Components below this pixel count are rejected as noise specks.
    pub min_area: u32,
    /// Accepted bounding-box width/height range. Rejects hairline scratches
    /// and very wide smears.
    pub min_aspect_ratio: f32,
    pub max_aspect_ratio: f32,
    /// Minimum area / bounding-box area. Rejects sparse scattered pixels
    /// masquerading as one blob.
    pub min_solidity: f32,
    /// Bounding boxes within this many pixels of an image edge are rejected,
    /// unless the component clears `border_bypass_area`.
    pub border_margin: u32,
    /// A border-touching component at least this large is treated as a
    /// legitimately cropped digit rather than partial noise.
    pub border_bypass_area: u32,
    /// Classifications below this confidence are dropped from the readout.
    pub confidence_floor: f32,
}

impl ProcessingProfile {
    /// Preset for live camera/canvas frames. Higher `min_area` suppresses
    /// sensor noise; a higher confidence floor suppresses jittery guesses.
    pub fn interactive() -> Self {
        Self {
            min_area: 80,
            min_aspect_ratio: 0.15,
            max_aspect_ratio: 2.5,
            min_solidity: 0.15,
            border_margin: 3,
            border_bypass_area: 320,
            confidence_floor: 0.85,
        }
    }

    /// Preset for one-off uploads and scans of clean strokes.
    pub fn single_shot() -> Self {
        Self {
            min_area: 24,
            min_aspect_ratio: 0.15,
            max_aspect_ratio: 2.5,
            min_solidity: 0.15,
            border_margin: 2,
            border_bypass_area: 96,
            confidence_floor: 0.70,
        }
    }
}

impl Default for ProcessingProfile {
    fn default() -> Self {
        Self::single_shot()
    }
}
