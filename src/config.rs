//! Pipeline construction parameters
//!
//! Values come from `Default`, a JSON file, or `BARCODE_*` environment
//! variables layered on top of either.

use crate::DetectError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default binarisation threshold applied to the smoothed std-dev map
pub const DEFAULT_THRESHOLD: f64 = 20.0;
/// Default number of erosion passes
pub const DEFAULT_EROSION_PASSES: usize = 3;
/// Default number of dilation passes
pub const DEFAULT_DILATION_PASSES: usize = 2;
/// Default number of smoothing passes
pub const DEFAULT_SMOOTHING_PASSES: usize = 2;

fn parse_env_usize(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
}

fn parse_env_f64(name: &str) -> Option<f64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
}

/// Tunable parameters of the detection pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Smoothed std-dev values at or above this become foreground
    pub threshold: f64,
    /// How many times erosion runs
    pub erosion_passes: usize,
    /// How many times dilation runs after erosion
    pub dilation_passes: usize,
    /// How many times the 3x3 blur runs
    pub smoothing_passes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            erosion_passes: DEFAULT_EROSION_PASSES,
            dilation_passes: DEFAULT_DILATION_PASSES,
            smoothing_passes: DEFAULT_SMOOTHING_PASSES,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DetectError> {
        let data = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `BARCODE_THRESHOLD`, `BARCODE_EROSIONS`,
    /// `BARCODE_DILATIONS` and `BARCODE_SMOOTHING` when set and parseable
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(threshold) = parse_env_f64("BARCODE_THRESHOLD") {
            self.threshold = threshold;
        }
        if let Some(n) = parse_env_usize("BARCODE_EROSIONS") {
            self.erosion_passes = n;
        }
        if let Some(n) = parse_env_usize("BARCODE_DILATIONS") {
            self.dilation_passes = n;
        }
        if let Some(n) = parse_env_usize("BARCODE_SMOOTHING") {
            self.smoothing_passes = n;
        }
        self
    }

    /// Reject parameters the pipeline cannot run with
    ///
    /// Any finite threshold is accepted; a negative one marks every pixel
    /// as foreground.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !self.threshold.is_finite() {
            return Err(DetectError::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
