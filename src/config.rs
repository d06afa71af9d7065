use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{Preset, ProcessingProfile};

#[derive(Parser, Debug)]
#[command(name = "digitscan-server")]
#[command(about = "Handwritten digit recognition server")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "DIGITSCAN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "DIGITSCAN_PORT", default_value = "9292")]
    pub port: u16,

    /// Default processing profile ("interactive" or "single-shot")
    #[arg(long, env = "DIGITSCAN_PROFILE", default_value = "single-shot")]
    pub profile: String,

    /// Path to the digit classifier model (.rten)
    #[arg(long, env = "DIGITSCAN_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Maximum upload size in bytes (default: 16MB)
    #[arg(long, env = "DIGITSCAN_MAX_FILE_SIZE", default_value = "16777216")]
    pub max_file_size: usize,

    /// Override the profile's minimum component area
    #[arg(long, env = "DIGITSCAN_MIN_AREA")]
    pub min_area: Option<u32>,

    /// Override the profile's confidence floor
    #[arg(long, env = "DIGITSCAN_MIN_CONFIDENCE")]
    pub min_confidence: Option<f32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub preset: Preset,
    pub profile: ProcessingProfile,
    pub model_path: Option<PathBuf>,
}

impl Config {
    /// Resolve CLI arguments into a configuration, applying profile
    /// overrides on top of the chosen preset.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let preset = Preset::from_str(&args.profile).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown profile \"{}\" (expected \"interactive\" or \"single-shot\")",
                args.profile
            )
        })?;

        let mut profile = preset.profile();
        if let Some(min_area) = args.min_area {
            profile.min_area = min_area;
        }
        if let Some(min_confidence) = args.min_confidence {
            if !(0.0..=1.0).contains(&min_confidence) {
                anyhow::bail!("--min-confidence must be within 0..=1");
            }
            profile.confidence_floor = min_confidence;
        }

        Ok(Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            preset,
            profile,
            model_path: args.model_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(profile: &str) -> Args {
        Args::parse_from(["digitscan-server", "--profile", profile])
    }

    #[test]
    fn test_preset_resolves_to_its_profile() {
        let config = Config::from_args(args("interactive")).unwrap();
        assert_eq!(config.profile, ProcessingProfile::interactive());
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        assert!(Config::from_args(args("turbo")).is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let mut raw = args("single-shot");
        raw.min_area = Some(50);
        raw.min_confidence = Some(0.9);

        let config = Config::from_args(raw).unwrap();
        assert_eq!(config.profile.min_area, 50);
        assert!((config.profile.confidence_floor - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_confidence_is_rejected() {
        let mut raw = args("single-shot");
        raw.min_confidence = Some(1.5);
        assert!(Config::from_args(raw).is_err());
    }
}
